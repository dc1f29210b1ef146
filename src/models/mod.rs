pub mod customer;
pub mod due;
pub mod employee;
pub mod loan;
pub mod notification;
pub mod receipt;
pub mod report;
pub mod settlement;

use serde::{Deserialize, Serialize};

pub use customer::{Customer, CustomerForm, NewCustomer};
pub use due::{Due, DueFilter, DueUpdate};
pub use employee::{City, Employee, EmployeeForm, NewEmployee};
pub use loan::{Loan, LoanForm, NewLoan, Vehicle};
pub use notification::{NewNotification, Notification};
pub use receipt::{ReceiptDueRow, ReceiptPayload};
pub use report::LoanReport;
pub use settlement::{SettlementRequest, SettlementSummary};

/// one page of a listing endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    #[serde(alias = "data", alias = "results")]
    pub items: Vec<T>,
    /// total rows across all pages
    #[serde(alias = "count")]
    pub total: u64,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub limit: u32,
}

impl<T> Page<T> {
    /// `ceil(total / limit)`; zero when nothing matched
    pub fn total_pages(&self, limit: u32) -> u32 {
        if limit == 0 {
            return 0;
        }
        u32::try_from(self.total.div_ceil(u64::from(limit))).unwrap_or(u32::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages() {
        let page: Page<u8> = Page { items: vec![], total: 41, page: 1, limit: 20 };
        assert_eq!(page.total_pages(20), 3);
        let page: Page<u8> = Page { items: vec![], total: 40, page: 1, limit: 20 };
        assert_eq!(page.total_pages(20), 2);
        let page: Page<u8> = Page { items: vec![], total: 0, page: 1, limit: 20 };
        assert_eq!(page.total_pages(20), 0);
        let page: Page<u8> = Page { items: vec![], total: u64::MAX, page: 1, limit: 20 };
        assert_eq!(page.total_pages(20), u32::MAX);
        assert_eq!(page.total_pages(u32::MAX), u32::MAX);
    }

    #[test]
    fn test_page_aliases() {
        let page: Page<u32> = serde_json::from_str(r#"{"data": [1, 2], "count": 2}"#).unwrap();
        assert_eq!(page.items, vec![1, 2]);
        assert_eq!(page.total, 2);
        assert_eq!(page.page, 0);
    }
}
