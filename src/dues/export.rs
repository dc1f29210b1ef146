use rust_decimal::prelude::ToPrimitive;
use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};
use std::path::Path;
use tracing::info;

use crate::decimal::Money;
use crate::errors::{LendingError, Result};
use crate::models::Due;
use crate::receipt::output::write_atomic;

const HEADERS: [&str; 10] = [
    "S.No",
    "Loan No",
    "Customer",
    "Mobile",
    "City",
    "Due Date",
    "Due Amount",
    "Paid",
    "Pending",
    "Status",
];

const WIDTHS: [f64; 10] = [6.0, 12.0, 24.0, 13.0, 14.0, 12.0, 13.0, 13.0, 13.0, 10.0];

fn xlsx_error(e: XlsxError) -> LendingError {
    LendingError::Spreadsheet { message: e.to_string() }
}

fn amount(m: Money) -> f64 {
    m.as_decimal().to_f64().unwrap_or_default()
}

/// workbook with a header row, one row per due and a totals row
pub fn dues_workbook(dues: &[Due]) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    fill_sheet(sheet, dues).map_err(xlsx_error)?;
    workbook.save_to_buffer().map_err(xlsx_error)
}

/// write the workbook next to `path` and move it into place
pub fn save_dues_workbook(dues: &[Due], path: &Path) -> Result<()> {
    let bytes = dues_workbook(dues)?;
    write_atomic(path, &bytes)?;
    info!(path = %path.display(), rows = dues.len(), "due export written");
    Ok(())
}

fn fill_sheet(sheet: &mut Worksheet, dues: &[Due]) -> std::result::Result<(), XlsxError> {
    let bold = Format::new().set_bold();
    let money = Format::new().set_num_format("#,##0.00");
    let money_bold = Format::new().set_bold().set_num_format("#,##0.00");

    sheet.set_name("Dues")?;
    for (col, (title, width)) in HEADERS.iter().zip(WIDTHS).enumerate() {
        let col = col as u16;
        sheet.write_string_with_format(0, col, *title, &bold)?;
        sheet.set_column_width(col, width)?;
    }

    let (mut due_total, mut paid_total, mut pending_total) = (Money::ZERO, Money::ZERO, Money::ZERO);
    for (i, due) in dues.iter().enumerate() {
        let row = i as u32 + 1;
        let pending = due.outstanding();
        sheet.write_number(row, 0, row as f64)?;
        sheet.write_string(row, 1, due.loan_number.as_deref().unwrap_or("-"))?;
        sheet.write_string(row, 2, due.customer_name.as_deref().unwrap_or("-"))?;
        sheet.write_string(row, 3, due.customer_mobile.as_deref().unwrap_or("-"))?;
        sheet.write_string(row, 4, due.city_name.as_deref().unwrap_or("-"))?;
        sheet.write_string(row, 5, due.due_date.format("%d-%m-%Y").to_string())?;
        sheet.write_number_with_format(row, 6, amount(due.due_amount), &money)?;
        sheet.write_number_with_format(row, 7, amount(due.paid_amount), &money)?;
        sheet.write_number_with_format(row, 8, amount(pending), &money)?;
        sheet.write_string(row, 9, due.status.label())?;

        due_total += due.due_amount;
        paid_total += due.paid_amount;
        pending_total += pending;
    }

    let totals_row = dues.len() as u32 + 1;
    sheet.write_string_with_format(totals_row, 5, "Total", &bold)?;
    sheet.write_number_with_format(totals_row, 6, amount(due_total), &money_bold)?;
    sheet.write_number_with_format(totals_row, 7, amount(paid_total), &money_bold)?;
    sheet.write_number_with_format(totals_row, 8, amount(pending_total), &money_bold)?;
    Ok(())
}
