/// receipt - render a payment receipt to PDF and hand it to a share target
///
/// needs `LiberationSans-Regular.ttf` and `LiberationSans-Bold.ttf` under
/// `assets/fonts` (or set `SRIVARI_FONT_DIR`).
use async_trait::async_trait;
use chrono::{NaiveDate, TimeZone, Utc};
use srivari_lending::models::{
    Due, DueFilter, Page, ReceiptDueRow, ReceiptPayload, SettlementRequest, SettlementSummary,
};
use srivari_lending::{
    ClientConfig, DueStatus, LendingBackend, LendingError, LoanId, Money, ReceiptArtifact,
    ReceiptOutput, ReceiptRenderer, Result, SafeTimeProvider, ShareTarget, TimeSource,
};
use std::path::Path;

struct DemoBackend;

#[async_trait]
impl LendingBackend for DemoBackend {
    async fn fetch_dues(&self, _date: NaiveDate, page: u32, limit: u32, _filter: &DueFilter) -> Result<Page<Due>> {
        Ok(Page { items: Vec::new(), total: 0, page, limit })
    }

    async fn fetch_settlement_summary(&self, _loan_id: LoanId) -> Result<SettlementSummary> {
        Err(LendingError::Api { status: 404, message: "not part of this demo".into() })
    }

    async fn settle_loan(&self, _loan_id: LoanId, _request: &SettlementRequest) -> Result<()> {
        Err(LendingError::Api { status: 404, message: "not part of this demo".into() })
    }

    async fn fetch_receipt(&self, loan_id: LoanId, due_date: Option<NaiveDate>) -> Result<ReceiptPayload> {
        let dues = (1..=8)
            .map(|month| ReceiptDueRow {
                due_date: NaiveDate::from_ymd_opt(2024, month, 5),
                due_amount: Some(Money::from_major(1120)),
                paid_amount: (month <= 5).then(|| Money::from_major(1120)),
                status: Some(if month <= 5 { DueStatus::Paid } else { DueStatus::Unpaid }),
            })
            .collect();
        Ok(ReceiptPayload {
            loan_id: Some(loan_id),
            customer_name: Some("Karthik R".into()),
            customer_mobile: Some("9876543210".into()),
            vehicle_number: Some("TN30AB1234".into()),
            principal: Some(Money::from_major(10_000)),
            monthly_installment: Some(Money::from_major(1120)),
            paid_amount: Some(Money::from_major(1120)),
            paid_date: due_date,
            balance_amount: Some(Money::from_major(3360)),
            dues,
            ..Default::default()
        })
    }
}

struct PrintShare;

#[async_trait]
impl ShareTarget for PrintShare {
    async fn share(&self, path: &Path, mime_type: &str) -> Result<()> {
        println!("sharing {} ({mime_type})", path.display());
        Ok(())
    }
}

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut config = ClientConfig::default();
    if let Ok(dir) = std::env::var("SRIVARI_FONT_DIR") {
        config.receipt.font_dir = dir.into();
    }
    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2024, 5, 5, 11, 20, 0).unwrap()
    ));
    let renderer = ReceiptRenderer::new(&config);
    let due_date = NaiveDate::from_ymd_opt(2024, 5, 5);

    match renderer.generate(&DemoBackend, 42, due_date, &time, ReceiptOutput::Download).await {
        Ok(ReceiptArtifact::Download { file_name, bytes }) => {
            println!("rendered {file_name}: {} bytes", bytes.len());
        }
        Ok(other) => println!("unexpected output: {other:?}"),
        Err(err) => {
            // alert text the app would show
            println!("receipt failed: {}", err.user_message());
            return Ok(());
        }
    }

    let shared = renderer
        .generate(&DemoBackend, 42, due_date, &time, ReceiptOutput::SaveAndShare(&PrintShare))
        .await?;
    println!("{shared:?}");

    Ok(())
}
