use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::types::LoanId;

/// read-only payoff view the backend computes for a loan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettlementSummary {
    #[serde(default)]
    pub loan_id: Option<LoanId>,
    pub paid_months: u32,
    pub total_paid: Money,
    pub pending_months: u32,
    pub balance_due: Money,
    /// days the oldest unpaid due is past its date
    #[serde(default)]
    pub late_days: u32,
}

/// body sent to close a loan by settlement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettlementRequest {
    pub paid_amount: Money,
    pub settlement_paid_date: NaiveDate,
    pub additional_charge: Money,
    pub adjustment: Money,
}
