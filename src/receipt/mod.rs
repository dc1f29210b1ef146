//! PDF payment receipts.
//!
//! Generation runs in a fixed order: fonts, payload fetch, field resolution,
//! layout, output. Any step failing aborts the rest, so a missing font never
//! costs a network round trip and a failed render never leaves a file behind.

pub mod output;
pub mod prepare;
pub mod render;

use chrono::NaiveDate;
use hourglass_rs::SafeTimeProvider;
use tracing::{info, instrument, warn};

use crate::api::LendingBackend;
use crate::config::{ClientConfig, CompanyProfile, ReceiptConfig};
use crate::errors::Result;
use crate::types::LoanId;

pub use output::{ReceiptArtifact, ReceiptOutput, ShareTarget};
pub use prepare::{prepare, DueLine, DuesTable, PreparedReceipt};

#[derive(Debug, Clone)]
pub struct ReceiptRenderer {
    company: CompanyProfile,
    config: ReceiptConfig,
}

impl ReceiptRenderer {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            company: config.company.clone(),
            config: config.receipt.clone(),
        }
    }

    /// receipt for a loan, or for one partially paid due when `due_date` is set
    #[instrument(skip(self, backend, time, output))]
    pub async fn generate(
        &self,
        backend: &dyn LendingBackend,
        loan_id: LoanId,
        due_date: Option<NaiveDate>,
        time: &SafeTimeProvider,
        output: ReceiptOutput<'_>,
    ) -> Result<ReceiptArtifact> {
        let result = self.generate_inner(backend, loan_id, due_date, time, output).await;
        if let Err(err) = &result {
            warn!(loan_id, kind = ?err.kind(), error = %err, "receipt generation failed");
        }
        result
    }

    async fn generate_inner(
        &self,
        backend: &dyn LendingBackend,
        loan_id: LoanId,
        due_date: Option<NaiveDate>,
        time: &SafeTimeProvider,
        output: ReceiptOutput<'_>,
    ) -> Result<ReceiptArtifact> {
        let fonts = render::load_fonts(&self.config)?;
        let payload = backend.fetch_receipt(loan_id, due_date).await?;
        let receipt = prepare(payload, time, &self.config.currency_label)?;
        let bytes = render::render_pdf(&receipt, &self.company, fonts)?;
        info!(receipt_no = %receipt.receipt_no, bytes = bytes.len(), "receipt rendered");

        let file_name = format!("{}.pdf", receipt.file_stem());
        output::deliver(output, &self.config.output_dir, file_name, bytes).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{ErrorKind, LendingError};
    use crate::testing::{receipt_payload, use_fixture_fonts, FakeBackend};
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use hourglass_rs::TimeSource;
    use std::path::{Path, PathBuf};
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingShare {
        shared: Mutex<Vec<(PathBuf, String)>>,
    }

    #[async_trait]
    impl ShareTarget for RecordingShare {
        async fn share(&self, path: &Path, mime_type: &str) -> Result<()> {
            self.shared.lock().unwrap().push((path.to_path_buf(), mime_type.to_string()));
            Ok(())
        }
    }

    fn clock() -> SafeTimeProvider {
        SafeTimeProvider::new(TimeSource::Test(Utc.with_ymd_and_hms(2024, 5, 5, 11, 20, 0).unwrap()))
    }

    #[tokio::test]
    async fn test_save_and_share_writes_one_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = ClientConfig::local();
        use_fixture_fonts(&mut config.receipt);
        config.receipt.output_dir = dir.path().join("out");

        let backend = FakeBackend { receipt: Some(receipt_payload()), ..Default::default() };
        let share = RecordingShare::default();
        let due_date = NaiveDate::from_ymd_opt(2024, 5, 5);
        let artifact = ReceiptRenderer::new(&config)
            .generate(&backend, 42, due_date, &clock(), ReceiptOutput::SaveAndShare(&share))
            .await
            .unwrap();

        let expected = config.receipt.output_dir.join("receipt-LN00042-RCPT-20240505112000.pdf");
        assert_eq!(artifact, ReceiptArtifact::Shared { path: expected.clone() });
        let files: Vec<_> = std::fs::read_dir(&config.receipt.output_dir)
            .unwrap()
            .map(|entry| entry.unwrap().path())
            .collect();
        assert_eq!(files, vec![expected.clone()]);
        assert!(std::fs::read(&expected).unwrap().starts_with(b"%PDF"));
        assert_eq!(*share.shared.lock().unwrap(), vec![(expected, output::PDF_MIME.to_string())]);
        assert_eq!(backend.calls(), vec!["receipt 42 Some(2024-05-05)".to_string()]);
    }

    #[tokio::test]
    async fn test_download_returns_bytes_only() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = ClientConfig::local();
        use_fixture_fonts(&mut config.receipt);
        config.receipt.output_dir = dir.path().join("out");

        let backend = FakeBackend { receipt: Some(receipt_payload()), ..Default::default() };
        match ReceiptRenderer::new(&config)
            .generate(&backend, 42, None, &clock(), ReceiptOutput::Download)
            .await
            .unwrap()
        {
            ReceiptArtifact::Download { file_name, bytes } => {
                assert_eq!(file_name, "receipt-LN00042-RCPT-20240505112000.pdf");
                assert!(bytes.starts_with(b"%PDF"));
            }
            other => panic!("expected download, got {other:?}"),
        }
        assert!(!config.receipt.output_dir.exists());
    }

    #[tokio::test]
    async fn test_missing_fonts_abort_before_fetch() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = ClientConfig::local();
        config.receipt.font_dir = dir.path().join("fonts");
        config.receipt.output_dir = dir.path().join("out");

        let backend = FakeBackend::default();
        let time = SafeTimeProvider::new(TimeSource::Test(Utc.with_ymd_and_hms(2024, 6, 5, 9, 0, 0).unwrap()));
        let err = ReceiptRenderer::new(&config)
            .generate(&backend, 4, None, &time, ReceiptOutput::Download)
            .await
            .unwrap_err();

        assert!(matches!(err, LendingError::Asset { .. }));
        assert_eq!(err.kind(), ErrorKind::Asset);
        assert!(backend.calls().is_empty());
        assert!(!config.receipt.output_dir.exists());
    }
}
