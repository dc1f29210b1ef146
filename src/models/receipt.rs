use chrono::{DateTime, NaiveDate};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::decimal::Money;
use crate::types::{DueStatus, LoanId};

/// Receipt data as returned by the backend.
///
/// Any field may be missing or arrive in an unexpected shape; such fields
/// decode as `None` so the receipt still renders with its fallbacks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReceiptPayload {
    #[serde(default, deserialize_with = "lenient_text")]
    pub receipt_no: Option<String>,
    #[serde(default, deserialize_with = "lenient_id")]
    pub loan_id: Option<LoanId>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub loan_number: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub customer_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub customer_mobile: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub customer_address: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub vehicle_number: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub principal: Option<Money>,
    #[serde(default, deserialize_with = "lenient")]
    pub monthly_installment: Option<Money>,
    #[serde(default, deserialize_with = "lenient")]
    pub paid_amount: Option<Money>,
    #[serde(default, deserialize_with = "lenient_date")]
    pub paid_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient")]
    pub balance_amount: Option<Money>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub collected_by: Option<String>,
    #[serde(default, deserialize_with = "lenient_rows")]
    pub dues: Vec<ReceiptDueRow>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReceiptDueRow {
    #[serde(default, deserialize_with = "lenient_date")]
    pub due_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient")]
    pub due_amount: Option<Money>,
    #[serde(default, deserialize_with = "lenient")]
    pub paid_amount: Option<Money>,
    #[serde(default, deserialize_with = "lenient")]
    pub status: Option<DueStatus>,
}

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).ok())
}

/// strings as-is, numbers printed; blanks and anything else are missing
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// integer ids, also when sent as digit strings
fn lenient_id<'de, D>(deserializer: D) -> Result<Option<LoanId>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

/// `2024-06-05`, `05-06-2024`, `05/06/2024` or a full RFC 3339 timestamp
fn lenient_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let Value::String(raw) = Value::deserialize(deserializer)? else {
        return Ok(None);
    };
    let raw = raw.trim();
    let parsed = ["%Y-%m-%d", "%d-%m-%Y", "%d/%m/%Y"]
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()));
    Ok(parsed)
}

/// rows that are not objects are dropped; a non-list is an empty list
fn lenient_rows<'de, D>(deserializer: D) -> Result<Vec<ReceiptDueRow>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(rows) => rows
            .into_iter()
            .filter_map(|row| ReceiptDueRow::deserialize(row).ok())
            .collect(),
        _ => Vec::new(),
    })
}
