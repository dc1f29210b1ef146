use serde::{Deserialize, Serialize};

/// backend-assigned identifiers
pub type LoanId = u64;
pub type DueId = u64;
pub type CustomerId = u64;
pub type EmployeeId = u64;
pub type CityId = u64;
pub type NotificationId = u64;

/// loan status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoanStatus {
    /// submitted, awaiting approval or disbursement
    Pending,
    /// disbursed and collecting dues
    #[serde(alias = "in-progress", alias = "inprogress")]
    InProgress,
    /// balance reached zero
    Completed,
    Cancelled,
    /// closed early through settlement
    Preclosed,
}

impl LoanStatus {
    /// statuses that still accept payments and settlement
    pub fn is_open(&self) -> bool {
        matches!(self, LoanStatus::Pending | LoanStatus::InProgress)
    }

    pub fn label(&self) -> &'static str {
        match self {
            LoanStatus::Pending => "Pending",
            LoanStatus::InProgress => "In Progress",
            LoanStatus::Completed => "Completed",
            LoanStatus::Cancelled => "Cancelled",
            LoanStatus::Preclosed => "Preclosed",
        }
    }
}

/// status of a single installment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DueStatus {
    /// fully collected
    Paid,
    /// partially collected
    Pending,
    /// nothing collected yet
    Unpaid,
}

impl DueStatus {
    pub fn label(&self) -> &'static str {
        match self {
            DueStatus::Paid => "Paid",
            DueStatus::Pending => "Pending",
            DueStatus::Unpaid => "Unpaid",
        }
    }
}

/// signed-in user role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Employee,
}

/// how a collection was received
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMode {
    #[default]
    Cash,
    Upi,
    BankTransfer,
    Cheque,
}
