use genpdf::elements::{Break, FrameCellDecorator, LinearLayout, Paragraph, TableLayout};
use genpdf::fonts::{FontData, FontFamily};
use genpdf::style::{Color, Style};
use genpdf::{Alignment, Document, Element, Margins, SimplePageDecorator};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::config::{CompanyProfile, ReceiptConfig};
use crate::errors::{LendingError, Result};
use crate::receipt::prepare::{DueLine, PreparedReceipt};

fn pdf_error(e: genpdf::error::Error) -> LendingError {
    LendingError::Pdf { message: e.to_string() }
}

fn font_path(config: &ReceiptConfig, weight: &str) -> PathBuf {
    config.font_dir.join(format!("{}-{}.ttf", config.font_name, weight))
}

fn load_font(path: &Path) -> Result<FontData> {
    if !path.is_file() {
        return Err(LendingError::Asset {
            message: format!("font not found: {}", path.display()),
        });
    }
    FontData::load(path, None).map_err(|e| LendingError::Asset {
        message: format!("cannot load font {}: {e}", path.display()),
    })
}

/// regular and bold weights; the italic slots reuse them
pub fn load_fonts(config: &ReceiptConfig) -> Result<FontFamily<FontData>> {
    let regular = load_font(&font_path(config, "Regular"))?;
    let bold = load_font(&font_path(config, "Bold"))?;
    debug!(font = %config.font_name, dir = %config.font_dir.display(), "receipt fonts loaded");
    Ok(FontFamily {
        italic: regular.clone(),
        bold_italic: bold.clone(),
        regular,
        bold,
    })
}

fn cell(text: &str, style: Style) -> impl Element {
    Paragraph::new(text).styled(style).padded(Margins::trbl(1, 1, 1, 2))
}

fn centered(text: &str, style: Style) -> impl Element {
    Paragraph::new(text).aligned(Alignment::Center).styled(style)
}

/// lay out a prepared receipt on one A4 page and return the PDF bytes
pub fn render_pdf(
    receipt: &PreparedReceipt,
    company: &CompanyProfile,
    fonts: FontFamily<FontData>,
) -> Result<Vec<u8>> {
    let mut doc = Document::new(fonts);
    doc.set_title(format!("Receipt {}", receipt.receipt_no));
    doc.set_font_size(10);

    let mut decorator = SimplePageDecorator::new();
    decorator.set_margins(Margins::trbl(15, 15, 15, 15));
    doc.set_page_decorator(decorator);

    let s_normal = Style::new().with_font_size(10);
    let s_label = Style::new().with_font_size(10).bold();
    let s_small = Style::new().with_font_size(8);
    let s_small_bold = Style::new().with_font_size(8).bold();
    let s_company = Style::new().with_font_size(18).bold();
    let s_title = Style::new().with_font_size(13).bold();
    let s_footer = Style::new().with_font_size(8).with_color(Color::Greyscale(110));

    // letterhead
    let mut header = LinearLayout::vertical();
    header.push(centered(&company.name, s_company));
    for line in &company.address_lines {
        header.push(centered(line, s_small));
    }
    if !company.phone.is_empty() {
        header.push(centered(&format!("Phone: {}", company.phone), s_small));
    }
    if let Some(tagline) = &company.tagline {
        header.push(centered(tagline, s_small_bold));
    }
    doc.push(header.padded(Margins::trbl(0, 0, 3, 0)));
    doc.push(centered("PAYMENT RECEIPT", s_title));
    doc.push(Break::new(1.0));

    // fixed fields, two label/value pairs per row
    let mut fields = TableLayout::new(vec![2, 3, 2, 3]);
    fields.set_cell_decorator(FrameCellDecorator::new(true, true, false));
    let pairs: [(&str, &str, &str, &str); 6] = [
        ("Receipt No", &receipt.receipt_no, "Date", &receipt.issued_on),
        ("Loan No", &receipt.loan_number, "Vehicle No", &receipt.vehicle_number),
        ("Customer", &receipt.customer_name, "Mobile", &receipt.customer_mobile),
        ("Principal", &receipt.principal, "Monthly EMI", &receipt.monthly_installment),
        ("Paid Amount", &receipt.paid_amount, "Paid Date", &receipt.paid_date),
        ("Balance", &receipt.balance_amount, "Collected By", &receipt.collected_by),
    ];
    for (l1, v1, l2, v2) in pairs {
        fields
            .row()
            .element(cell(l1, s_label))
            .element(cell(v1, s_normal))
            .element(cell(l2, s_label))
            .element(cell(v2, s_normal))
            .push()
            .map_err(pdf_error)?;
    }
    doc.push(fields);
    doc.push(cell(&format!("Address: {}", receipt.customer_address), s_normal));
    doc.push(Break::new(1.0));

    if !receipt.dues.is_empty() {
        doc.push(Paragraph::new("Dues").styled(s_label));
        let mut dues = TableLayout::new(vec![3, 3, 2, 3, 3, 2]);
        dues.set_cell_decorator(FrameCellDecorator::new(true, true, false));
        ["Due Date", "Amount", "Status", "Due Date", "Amount", "Status"]
            .into_iter()
            .fold(dues.row(), |row, title| row.element(cell(title, s_small_bold)))
            .push()
            .map_err(pdf_error)?;

        let blank = DueLine { date: String::new(), amount: String::new(), status: String::new() };
        for i in 0..receipt.dues.height() {
            let left = receipt.dues.left.get(i).unwrap_or(&blank);
            let right = receipt.dues.right.get(i).unwrap_or(&blank);
            dues.row()
                .element(cell(&left.date, s_small))
                .element(cell(&left.amount, s_small))
                .element(cell(&left.status, s_small))
                .element(cell(&right.date, s_small))
                .element(cell(&right.amount, s_small))
                .element(cell(&right.status, s_small))
                .push()
                .map_err(pdf_error)?;
        }
        doc.push(dues);
        if receipt.dues.omitted > 0 {
            doc.push(Paragraph::new(format!("+{} more dues not shown", receipt.dues.omitted)).styled(s_small));
        }
        doc.push(Break::new(1.0));
    }

    doc.push(Break::new(2.0));
    doc.push(Paragraph::new("Authorised Signatory").aligned(Alignment::Right).styled(s_label));
    doc.push(Break::new(1.0));
    doc.push(centered("This is a computer generated receipt.", s_footer));

    let mut buffer = Vec::new();
    doc.render(&mut buffer).map_err(pdf_error)?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use crate::receipt::prepare::prepare;
    use crate::testing::{receipt_payload, use_fixture_fonts};
    use chrono::{TimeZone, Utc};
    use hourglass_rs::{SafeTimeProvider, TimeSource};

    #[test]
    fn test_missing_fonts_are_asset_errors() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = ClientConfig::local().receipt;
        config.font_dir = dir.path().to_path_buf();

        let err = load_fonts(&config).unwrap_err();
        assert!(matches!(err, LendingError::Asset { ref message } if message.contains("Regular")));
    }

    #[test]
    fn test_unreadable_font_is_asset_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = ClientConfig::local().receipt;
        config.font_dir = dir.path().to_path_buf();
        std::fs::write(font_path(&config, "Regular"), b"not a font").unwrap();
        std::fs::write(font_path(&config, "Bold"), b"not a font").unwrap();

        assert!(matches!(load_fonts(&config), Err(LendingError::Asset { .. })));
    }

    #[test]
    fn test_renders_receipt_with_dues() {
        let mut config = ClientConfig::local();
        use_fixture_fonts(&mut config.receipt);
        let time = SafeTimeProvider::new(TimeSource::Test(Utc.with_ymd_and_hms(2024, 5, 5, 11, 20, 0).unwrap()));

        let mut payload = receipt_payload();
        // 15 rows: two full columns plus an omitted-rows note
        let repeat = payload.dues.clone();
        payload.dues.extend(repeat);
        payload.dues.truncate(15);
        let receipt = prepare(payload, &time, &config.receipt.currency_label).unwrap();
        assert_eq!(receipt.dues.omitted, 3);

        let fonts = load_fonts(&config.receipt).unwrap();
        let bytes = render_pdf(&receipt, &config.company, fonts).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        assert!(bytes.len() > 1000);
    }
}
