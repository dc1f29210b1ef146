//! in-memory backend shared by the workflow tests

use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::Mutex;

use crate::api::LendingBackend;
use crate::config::ReceiptConfig;
use crate::decimal::Money;
use crate::errors::{LendingError, Result};
use crate::models::{
    Due, DueFilter, Page, ReceiptDueRow, ReceiptPayload, SettlementRequest, SettlementSummary,
};
use crate::types::{DueStatus, LoanId};

#[derive(Default)]
pub struct FakeBackend {
    pub dues: Vec<Due>,
    /// page number whose fetch fails
    pub fail_page: Option<u32>,
    pub summary: Option<SettlementSummary>,
    /// status returned by settle; `None` succeeds
    pub settle_failure: Option<u16>,
    pub receipt: Option<ReceiptPayload>,
    pub calls: Mutex<Vec<String>>,
    pub settled: Mutex<Vec<SettlementRequest>>,
}

impl FakeBackend {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

pub fn due(id: u64, amount: i64, status: DueStatus) -> Due {
    let paid = if status == DueStatus::Paid { amount } else { 0 };
    Due {
        id,
        loan_id: 100 + id,
        installment_no: Some(1),
        due_date: NaiveDate::from_ymd_opt(2024, 6, 5).unwrap(),
        due_amount: Money::from_major(amount),
        paid_amount: Money::from_major(paid),
        pending_amount: Money::from_major(amount - paid),
        status,
        collected_by: None,
        paid_date: None,
        loan_number: Some(format!("LN{:05}", 100 + id)),
        customer_name: Some(format!("Customer {id}")),
        customer_mobile: Some("9876543210".to_string()),
        city_name: Some("Salem".to_string()),
    }
}

/// DejaVu Sans checked in under `test-assets/fonts`
pub fn use_fixture_fonts(config: &mut ReceiptConfig) {
    config.font_dir = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("test-assets/fonts");
    config.font_name = "DejaVuSans".to_string();
}

/// loan 42 with eight monthly dues, five of them paid
pub fn receipt_payload() -> ReceiptPayload {
    let dues = (1..=8)
        .map(|month| ReceiptDueRow {
            due_date: NaiveDate::from_ymd_opt(2024, month, 5),
            due_amount: Some(Money::from_major(1120)),
            paid_amount: (month <= 5).then(|| Money::from_major(1120)),
            status: Some(if month <= 5 { DueStatus::Paid } else { DueStatus::Unpaid }),
        })
        .collect();
    ReceiptPayload {
        loan_id: Some(42),
        customer_name: Some("Karthik R".into()),
        customer_mobile: Some("9876543210".into()),
        vehicle_number: Some("TN30AB1234".into()),
        principal: Some(Money::from_major(10_000)),
        monthly_installment: Some(Money::from_major(1120)),
        paid_amount: Some(Money::from_major(1120)),
        paid_date: NaiveDate::from_ymd_opt(2024, 5, 5),
        balance_amount: Some(Money::from_major(3360)),
        dues,
        ..Default::default()
    }
}

pub fn summary(balance: i64) -> SettlementSummary {
    SettlementSummary {
        loan_id: Some(7),
        paid_months: 4,
        total_paid: Money::from_major(3668),
        pending_months: 6,
        balance_due: Money::from_major(balance),
        late_days: 12,
    }
}

#[async_trait]
impl LendingBackend for FakeBackend {
    async fn fetch_dues(
        &self,
        date: NaiveDate,
        page: u32,
        limit: u32,
        filter: &DueFilter,
    ) -> Result<Page<Due>> {
        self.record(format!("dues {date} page={page} city={:?}", filter.city_id));
        if self.fail_page == Some(page) {
            return Err(LendingError::Api { status: 500, message: "Server error".into() });
        }
        let start = ((page.saturating_sub(1)) * limit) as usize;
        let items = self.dues.iter().skip(start).take(limit as usize).cloned().collect();
        Ok(Page { items, total: self.dues.len() as u64, page, limit })
    }

    async fn fetch_settlement_summary(&self, loan_id: LoanId) -> Result<SettlementSummary> {
        self.record(format!("summary {loan_id}"));
        self.summary.clone().ok_or(LendingError::Api {
            status: 404,
            message: "Loan not found".into(),
        })
    }

    async fn settle_loan(&self, loan_id: LoanId, request: &SettlementRequest) -> Result<()> {
        self.record(format!("settle {loan_id}"));
        if let Some(status) = self.settle_failure {
            return Err(LendingError::Api { status, message: "Settlement rejected".into() });
        }
        self.settled.lock().unwrap().push(request.clone());
        Ok(())
    }

    async fn fetch_receipt(
        &self,
        loan_id: LoanId,
        due_date: Option<NaiveDate>,
    ) -> Result<ReceiptPayload> {
        self.record(format!("receipt {loan_id} {due_date:?}"));
        self.receipt.clone().ok_or(LendingError::Api {
            status: 404,
            message: "Receipt not found".into(),
        })
    }
}
