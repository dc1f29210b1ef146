use chrono::NaiveDate;

use crate::api::dues::Collection;
use crate::decimal::Money;
use crate::errors::{LendingError, Result};
use crate::models::{Due, DueUpdate};
use crate::types::{DueStatus, PaymentMode};
use crate::validation;

/// only dues with nothing collected yet may be rescheduled or resized
pub fn ensure_editable(due: &Due) -> Result<()> {
    if due.status != DueStatus::Unpaid {
        return Err(LendingError::DueNotEditable { status: due.status });
    }
    Ok(())
}

/// build an edit from raw form input; blank amount keeps the current one
pub fn edit_due(due: &Due, due_date: Option<NaiveDate>, amount: &str) -> Result<DueUpdate> {
    ensure_editable(due)?;
    let due_amount = if amount.trim().is_empty() {
        None
    } else {
        Some(validation::parse_positive_amount("due_amount", amount)?)
    };
    let update = DueUpdate {
        due_date: due_date.filter(|d| *d != due.due_date),
        due_amount: due_amount.filter(|a| *a != due.due_amount),
    };
    Ok(update)
}

/// what a due will look like once `amount` is collected against it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectionPreview {
    pub paid_amount: Money,
    pub pending_amount: Money,
    pub status: DueStatus,
}

pub fn preview_collection(due: &Due, amount: Money) -> Result<CollectionPreview> {
    if due.status == DueStatus::Paid {
        return Err(LendingError::DueNotEditable { status: due.status });
    }
    if !amount.is_positive() {
        return Err(LendingError::InvalidAmount { amount });
    }
    let pending = due.outstanding();
    if amount > pending {
        return Err(LendingError::PaymentExceedsPending { pending, provided: amount });
    }
    let remaining = pending - amount;
    Ok(CollectionPreview {
        paid_amount: due.paid_amount + amount,
        pending_amount: remaining,
        status: if remaining.is_zero() { DueStatus::Paid } else { DueStatus::Pending },
    })
}

/// validated body for `ApiClient::collect_due`
pub fn prepare_collection(
    due: &Due,
    amount: &str,
    paid_date: NaiveDate,
    payment_mode: PaymentMode,
    remarks: &str,
) -> Result<Collection> {
    let amount = validation::parse_positive_amount("paid_amount", amount)?;
    preview_collection(due, amount)?;
    let remarks = remarks.trim();
    Ok(Collection {
        paid_amount: amount,
        paid_date,
        payment_mode,
        remarks: (!remarks.is_empty()).then(|| remarks.to_string()),
    })
}
