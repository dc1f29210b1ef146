use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::models::{Customer, Due, Loan};
use crate::types::DueStatus;

/// a loan with its customer and full due history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanReport {
    pub loan: Loan,
    #[serde(default)]
    pub customer: Option<Customer>,
    #[serde(default)]
    pub dues: Vec<Due>,
}

impl LoanReport {
    pub fn total_paid(&self) -> Money {
        self.dues.iter().map(|d| d.paid_amount).sum()
    }

    pub fn total_outstanding(&self) -> Money {
        self.dues.iter().map(|d| d.outstanding()).sum()
    }

    pub fn paid_count(&self) -> usize {
        self.dues.iter().filter(|d| d.status == DueStatus::Paid).count()
    }

    pub fn overdue<'a>(&'a self, today: NaiveDate) -> impl Iterator<Item = &'a Due> + 'a {
        self.dues.iter().filter(move |d| d.is_overdue(today))
    }

    /// next due not yet fully collected
    pub fn next_due(&self) -> Option<&Due> {
        self.dues
            .iter()
            .filter(|d| d.status != DueStatus::Paid)
            .min_by_key(|d| d.due_date)
    }
}
