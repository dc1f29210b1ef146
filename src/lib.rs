pub mod api;
pub mod calculator;
pub mod config;
pub mod decimal;
pub mod dues;
pub mod errors;
pub mod media;
pub mod models;
pub mod receipt;
pub mod session;
pub mod settlement;
pub mod types;
pub mod validation;

#[cfg(test)]
pub(crate) mod testing;

// re-export key types
pub use api::{ApiClient, LendingBackend};
pub use calculator::{calculate, close_date, LoanQuote, LoanTerms, RepaymentPlan};
pub use config::ClientConfig;
pub use decimal::{Money, Rate};
pub use dues::{DueListAggregator, DueTotals};
pub use errors::{ErrorKind, FieldError, LendingError, Result};
pub use media::{capture_image, CapturedImage, MediaCapture, MediaSource};
pub use receipt::{ReceiptArtifact, ReceiptOutput, ReceiptRenderer, ShareTarget};
pub use session::{FileSessionStore, MemorySessionStore, Session, SessionStore};
pub use settlement::{Confirmation, SettlementForm, SettlementPrompt, SettlementReconciler, SettlementState};
pub use types::{
    CityId, CustomerId, DueId, DueStatus, EmployeeId, LoanId, LoanStatus, NotificationId,
    PaymentMode, Role,
};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
