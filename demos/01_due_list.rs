/// due list - page through a day's dues, preview a collection, export to xlsx
use async_trait::async_trait;
use chrono::NaiveDate;
use srivari_lending::dues::{preview_collection, save_dues_workbook};
use srivari_lending::models::{Due, DueFilter, Page, ReceiptPayload, SettlementRequest, SettlementSummary};
use srivari_lending::{DueListAggregator, DueStatus, LendingBackend, LendingError, LoanId, Money, Result};

/// stands in for the REST backend: 45 dues on one day
struct DemoBackend {
    dues: Vec<Due>,
}

impl DemoBackend {
    fn new(date: NaiveDate) -> Self {
        let dues = (1..=45u64)
            .map(|id| Due {
                id,
                loan_id: 500 + id,
                installment_no: Some((id % 10) as u32 + 1),
                due_date: date,
                due_amount: Money::from_major(917),
                paid_amount: Money::ZERO,
                pending_amount: Money::from_major(917),
                status: DueStatus::Unpaid,
                collected_by: None,
                paid_date: None,
                loan_number: Some(format!("LN{:05}", 500 + id)),
                customer_name: Some(format!("Customer {id}")),
                customer_mobile: Some("9876543210".to_string()),
                city_name: Some("Salem".to_string()),
            })
            .collect();
        Self { dues }
    }
}

#[async_trait]
impl LendingBackend for DemoBackend {
    async fn fetch_dues(&self, _date: NaiveDate, page: u32, limit: u32, _filter: &DueFilter) -> Result<Page<Due>> {
        let start = ((page - 1) * limit) as usize;
        let items = self.dues.iter().skip(start).take(limit as usize).cloned().collect();
        Ok(Page { items, total: self.dues.len() as u64, page, limit })
    }

    async fn fetch_settlement_summary(&self, _loan_id: LoanId) -> Result<SettlementSummary> {
        Err(LendingError::Api { status: 404, message: "not part of this demo".into() })
    }

    async fn settle_loan(&self, _loan_id: LoanId, _request: &SettlementRequest) -> Result<()> {
        Err(LendingError::Api { status: 404, message: "not part of this demo".into() })
    }

    async fn fetch_receipt(&self, _loan_id: LoanId, _due_date: Option<NaiveDate>) -> Result<ReceiptPayload> {
        Err(LendingError::Api { status: 404, message: "not part of this demo".into() })
    }
}

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let date = NaiveDate::from_ymd_opt(2024, 6, 5).ok_or("bad date")?;
    let backend = DemoBackend::new(date);
    let mut list = DueListAggregator::new(date, 20);

    list.load(&backend, date).await?;
    println!("page 1: {} rows of {}", list.items().len(), list.total());
    while list.load_more(&backend).await? {
        println!("page {}: {} rows loaded", list.page(), list.items().len());
    }

    let totals = list.totals();
    println!("\n{} dues, pending {}", totals.count, totals.pending.format_with_symbol("₹"));

    let first = &list.items()[0];
    let preview = preview_collection(first, Money::from_major(500))?;
    println!("collect ₹500 on {:?}: status -> {:?}, pending {}", first.loan_number, preview.status, preview.pending_amount);

    let path = std::env::temp_dir().join(format!("dues-{date}.xlsx"));
    save_dues_workbook(list.items(), &path)?;
    println!("exported to {}", path.display());

    Ok(())
}
