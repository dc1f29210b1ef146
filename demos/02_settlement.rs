/// settlement - fetch the payoff summary, adjust, confirm and settle
use async_trait::async_trait;
use chrono::{NaiveDate, TimeZone, Utc};
use srivari_lending::models::{Due, DueFilter, Page, ReceiptPayload, SettlementRequest, SettlementSummary};
use srivari_lending::{
    LendingBackend, LendingError, LoanId, Money, Result, SafeTimeProvider, SettlementPrompt,
    SettlementReconciler, TimeSource,
};

struct DemoBackend;

#[async_trait]
impl LendingBackend for DemoBackend {
    async fn fetch_dues(&self, _date: NaiveDate, page: u32, limit: u32, _filter: &DueFilter) -> Result<Page<Due>> {
        Ok(Page { items: Vec::new(), total: 0, page, limit })
    }

    async fn fetch_settlement_summary(&self, loan_id: LoanId) -> Result<SettlementSummary> {
        Ok(SettlementSummary {
            loan_id: Some(loan_id),
            paid_months: 4,
            total_paid: Money::from_major(3668),
            pending_months: 6,
            balance_due: Money::from_major(5000),
            late_days: 12,
        })
    }

    async fn settle_loan(&self, loan_id: LoanId, request: &SettlementRequest) -> Result<()> {
        println!("backend: settling loan {loan_id} with {}", request.paid_amount);
        Ok(())
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

    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2024, 7, 1, 10, 0, 0).unwrap()
    ));
    let backend = DemoBackend;
    let mut settlement = SettlementReconciler::new();

    settlement.open(&backend, 12, &time).await?;
    if let Some(form) = settlement.form() {
        println!("balance due {}, late by {} days", form.summary().balance_due, form.late_days());
    }

    settlement.set_additional_charge("200")?;
    settlement.set_adjustment("100")?;
    println!("final settle amount: {:?}", settlement.final_settle_amount());

    // an operator who says no: nothing is sent
    let decline = |_: &SettlementPrompt| false;
    if let Err(err) = settlement.submit(&backend, &decline).await {
        println!("declined: {}", err.user_message());
    }

    let approve = |prompt: &SettlementPrompt| {
        println!("confirm settling loan {} for {}?", prompt.loan_id, prompt.final_amount);
        true
    };
    let request = settlement.submit(&backend, &approve).await?;
    println!("settled on {} ({:?})", request.settlement_paid_date, settlement.state());

    Ok(())
}
