use chrono::NaiveDate;
use hourglass_rs::SafeTimeProvider;

use crate::decimal::Money;
use crate::errors::{LendingError, Result};
use crate::models::{ReceiptDueRow, ReceiptPayload};

pub const NOT_AVAILABLE: &str = "N/A";
pub const ROWS_PER_COLUMN: usize = 6;
pub const MAX_DUE_ROWS: usize = ROWS_PER_COLUMN * 2;

/// one printed line of the dues table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DueLine {
    pub date: String,
    pub amount: String,
    pub status: String,
}

/// dues split over two side-by-side columns of six rows
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DuesTable {
    pub left: Vec<DueLine>,
    pub right: Vec<DueLine>,
    /// rows beyond the twelve that fit on the page
    pub omitted: usize,
}

impl DuesTable {
    pub fn from_rows(rows: &[ReceiptDueRow], currency: &str) -> Self {
        let lines: Vec<DueLine> = rows
            .iter()
            .take(MAX_DUE_ROWS)
            .map(|row| DueLine {
                date: text_date(row.due_date),
                amount: text_money(row.paid_amount.or(row.due_amount), currency),
                status: row
                    .status
                    .map(|s| s.label().to_string())
                    .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            })
            .collect();
        let split = lines.len().min(ROWS_PER_COLUMN);
        let mut left = lines;
        let right = left.split_off(split);
        Self {
            left,
            right,
            omitted: rows.len().saturating_sub(MAX_DUE_ROWS),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.left.is_empty()
    }

    /// rows to draw: the taller of the two columns
    pub fn height(&self) -> usize {
        self.left.len().max(self.right.len())
    }
}

/// every printed field resolved to text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedReceipt {
    pub receipt_no: String,
    pub issued_on: String,
    pub loan_number: String,
    pub customer_name: String,
    pub customer_mobile: String,
    pub customer_address: String,
    pub vehicle_number: String,
    pub principal: String,
    pub monthly_installment: String,
    pub paid_amount: String,
    pub paid_date: String,
    pub balance_amount: String,
    pub collected_by: String,
    pub dues: DuesTable,
}

impl PreparedReceipt {
    /// safe for a file name: letters, digits and dashes only
    pub fn file_stem(&self) -> String {
        let raw = format!("receipt-{}-{}", self.loan_number, self.receipt_no);
        raw.chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
            .collect()
    }
}

/// Resolve a backend payload into printable text.
///
/// Missing fields print as "N/A" and a missing receipt number is generated
/// from the clock. Only a payload with neither a customer name nor a loan id
/// is refused.
pub fn prepare(
    payload: ReceiptPayload,
    time: &SafeTimeProvider,
    currency: &str,
) -> Result<PreparedReceipt> {
    let has_name = payload
        .customer_name
        .as_deref()
        .is_some_and(|n| !n.trim().is_empty());
    if !has_name && payload.loan_id.is_none() {
        return Err(LendingError::InsufficientData {
            message: "receipt payload has neither customer name nor loan id".to_string(),
        });
    }

    let now = time.now();
    let receipt_no = non_blank(payload.receipt_no)
        .unwrap_or_else(|| format!("RCPT-{}", now.format("%Y%m%d%H%M%S")));
    let loan_number = non_blank(payload.loan_number)
        .or_else(|| payload.loan_id.map(|id| format!("LN{id:05}")))
        .unwrap_or_else(|| NOT_AVAILABLE.to_string());

    Ok(PreparedReceipt {
        receipt_no,
        issued_on: now.format("%d-%m-%Y").to_string(),
        loan_number,
        customer_name: text(payload.customer_name),
        customer_mobile: text(payload.customer_mobile),
        customer_address: text(payload.customer_address),
        vehicle_number: text(payload.vehicle_number),
        principal: text_money(payload.principal, currency),
        monthly_installment: text_money(payload.monthly_installment, currency),
        paid_amount: text_money(payload.paid_amount, currency),
        paid_date: text_date(payload.paid_date),
        balance_amount: text_money(payload.balance_amount, currency),
        collected_by: text(payload.collected_by),
        dues: DuesTable::from_rows(&payload.dues, currency),
    })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn text(value: Option<String>) -> String {
    non_blank(value).unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

fn text_money(value: Option<Money>, currency: &str) -> String {
    value
        .map(|m| m.format_with_symbol(currency))
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

fn text_date(value: Option<NaiveDate>) -> String {
    value
        .map(|d| d.format("%d-%m-%Y").to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}
