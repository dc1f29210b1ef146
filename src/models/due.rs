use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::types::{CityId, CustomerId, DueId, DueStatus, EmployeeId, LoanId};

/// one scheduled installment, generated by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Due {
    pub id: DueId,
    pub loan_id: LoanId,
    #[serde(default)]
    pub installment_no: Option<u32>,
    pub due_date: NaiveDate,
    pub due_amount: Money,
    #[serde(default)]
    pub paid_amount: Money,
    #[serde(default)]
    pub pending_amount: Money,
    pub status: DueStatus,
    #[serde(default)]
    pub collected_by: Option<EmployeeId>,
    #[serde(default)]
    pub paid_date: Option<NaiveDate>,
    #[serde(default)]
    pub loan_number: Option<String>,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub customer_mobile: Option<String>,
    #[serde(default)]
    pub city_name: Option<String>,
}

impl Due {
    /// amount still to collect; derived when the backend omits `pending_amount`
    pub fn outstanding(&self) -> Money {
        if self.status == DueStatus::Paid {
            return Money::ZERO;
        }
        if self.pending_amount.is_positive() {
            self.pending_amount
        } else {
            (self.due_amount - self.paid_amount).max(Money::ZERO)
        }
    }

    /// past its due date and not fully collected
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.status != DueStatus::Paid && self.due_date < today
    }

    pub fn days_late(&self, today: NaiveDate) -> u32 {
        if !self.is_overdue(today) {
            return 0;
        }
        (today - self.due_date).num_days().max(0) as u32
    }
}

/// edit applied to a single unpaid due
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DueUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_amount: Option<Money>,
}

impl DueUpdate {
    pub fn is_empty(&self) -> bool {
        self.due_date.is_none() && self.due_amount.is_none()
    }
}

/// narrowing applied to every due-list page request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DueFilter {
    pub city_id: Option<CityId>,
    pub customer_id: Option<CustomerId>,
}
