//! Loan settlement: payoff summary plus operator adjustments, submitted once confirmed.

pub mod form;
pub mod reconciler;

pub use form::SettlementForm;
pub use reconciler::{Confirmation, SettlementPrompt, SettlementReconciler, SettlementState};
