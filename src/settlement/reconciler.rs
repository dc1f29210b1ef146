use async_trait::async_trait;
use chrono::NaiveDate;
use hourglass_rs::SafeTimeProvider;
use std::mem;
use tracing::{info, instrument, warn};

use crate::api::LendingBackend;
use crate::decimal::Money;
use crate::errors::{LendingError, Result};
use crate::models::SettlementRequest;
use crate::settlement::form::SettlementForm;
use crate::types::LoanId;

/// what the operator is asked to approve before the loan is closed
#[derive(Debug, Clone, PartialEq)]
pub struct SettlementPrompt {
    pub loan_id: LoanId,
    pub final_amount: Money,
    pub paid_amount: Money,
    pub settlement_date: NaiveDate,
}

/// explicit operator approval before any mutating call
#[async_trait]
pub trait Confirmation: Send + Sync {
    async fn confirm(&self, prompt: &SettlementPrompt) -> bool;
}

#[async_trait]
impl<F> Confirmation for F
where
    F: Fn(&SettlementPrompt) -> bool + Send + Sync,
{
    async fn confirm(&self, prompt: &SettlementPrompt) -> bool {
        self(prompt)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SettlementState {
    Idle,
    Loading { loan_id: LoanId },
    Ready(SettlementForm),
    /// summary fetch failed; reopen to try again
    Error { loan_id: LoanId, message: String },
    Submitting(SettlementForm),
    Done { loan_id: LoanId, request: SettlementRequest },
}

impl SettlementState {
    fn name(&self) -> &'static str {
        match self {
            SettlementState::Idle => "idle",
            SettlementState::Loading { .. } => "loading",
            SettlementState::Ready(_) => "ready",
            SettlementState::Error { .. } => "error",
            SettlementState::Submitting(_) => "submitting",
            SettlementState::Done { .. } => "done",
        }
    }
}

/// One settlement attempt at a time.
///
/// `open` fetches a fresh summary and moves to `Ready`; opening again replaces
/// whatever attempt was in progress. `submit` validates locally, asks for
/// confirmation and only then calls the backend. A failed submission returns
/// to `Ready` with the message in the form's alert; nothing is retried.
#[derive(Debug, Clone)]
pub struct SettlementReconciler {
    state: SettlementState,
}

impl Default for SettlementReconciler {
    fn default() -> Self {
        Self::new()
    }
}

impl SettlementReconciler {
    pub fn new() -> Self {
        Self { state: SettlementState::Idle }
    }

    pub fn state(&self) -> &SettlementState {
        &self.state
    }

    pub fn form(&self) -> Option<&SettlementForm> {
        match &self.state {
            SettlementState::Ready(form) => Some(form),
            _ => None,
        }
    }

    pub fn final_settle_amount(&self) -> Option<Money> {
        self.form().and_then(SettlementForm::final_settle_amount)
    }

    #[instrument(skip(self, backend, time))]
    pub async fn open(
        &mut self,
        backend: &dyn LendingBackend,
        loan_id: LoanId,
        time: &SafeTimeProvider,
    ) -> Result<()> {
        self.state = SettlementState::Loading { loan_id };
        match backend.fetch_settlement_summary(loan_id).await {
            Ok(summary) => {
                let today = time.now().date_naive();
                self.state = SettlementState::Ready(SettlementForm::new(loan_id, summary, today));
                Ok(())
            }
            Err(err) => {
                warn!(loan_id, error = %err, "settlement summary unavailable");
                self.state = SettlementState::Error { loan_id, message: err.user_message() };
                Err(err)
            }
        }
    }

    pub fn set_paid_amount(&mut self, raw: &str) -> Result<()> {
        self.edit(|form| form.paid_amount = raw.to_string())
    }

    pub fn set_settlement_date(&mut self, date: Option<NaiveDate>) -> Result<()> {
        self.edit(|form| form.settlement_date = date)
    }

    pub fn set_additional_charge(&mut self, raw: &str) -> Result<()> {
        self.edit(|form| form.additional_charge = raw.to_string())
    }

    pub fn set_adjustment(&mut self, raw: &str) -> Result<()> {
        self.edit(|form| form.adjustment = raw.to_string())
    }

    /// validate, confirm, then settle; invalid or declined input sends nothing
    #[instrument(skip(self, backend, confirmation))]
    pub async fn submit(
        &mut self,
        backend: &dyn LendingBackend,
        confirmation: &dyn Confirmation,
    ) -> Result<SettlementRequest> {
        let form = self.ready_form_mut()?;
        let request = match form.request() {
            Ok(request) => request,
            Err(err) => {
                form.alert = Some(err.user_message());
                return Err(err);
            }
        };
        form.alert = None;

        let prompt = SettlementPrompt {
            loan_id: form.loan_id(),
            final_amount: form.final_settle_amount().unwrap_or(request.paid_amount),
            paid_amount: request.paid_amount,
            settlement_date: request.settlement_paid_date,
        };
        if !confirmation.confirm(&prompt).await {
            return Err(LendingError::Cancelled);
        }

        let SettlementState::Ready(form) = mem::replace(&mut self.state, SettlementState::Idle) else {
            return Err(self.invalid_state("ready"));
        };
        let loan_id = form.loan_id();
        self.state = SettlementState::Submitting(form);

        let outcome = backend.settle_loan(loan_id, &request).await;
        let SettlementState::Submitting(mut form) = mem::replace(&mut self.state, SettlementState::Idle) else {
            return Err(self.invalid_state("submitting"));
        };
        match outcome {
            Ok(()) => {
                info!(loan_id, amount = %request.paid_amount, "settlement accepted");
                self.state = SettlementState::Done { loan_id, request: request.clone() };
                Ok(request)
            }
            Err(err) => {
                warn!(loan_id, error = %err, "settlement rejected");
                form.alert = Some(err.user_message());
                self.state = SettlementState::Ready(form);
                Err(err)
            }
        }
    }

    /// dismiss the current attempt
    pub fn close(&mut self) {
        self.state = SettlementState::Idle;
    }

    fn edit(&mut self, apply: impl FnOnce(&mut SettlementForm)) -> Result<()> {
        let form = self.ready_form_mut()?;
        apply(form);
        Ok(())
    }

    fn ready_form_mut(&mut self) -> Result<&mut SettlementForm> {
        match &mut self.state {
            SettlementState::Ready(form) => Ok(form),
            other => Err(LendingError::InvalidState {
                current: other.name().to_string(),
                expected: "ready".to_string(),
            }),
        }
    }

    fn invalid_state(&self, expected: &str) -> LendingError {
        LendingError::InvalidState {
            current: self.state.name().to_string(),
            expected: expected.to_string(),
        }
    }
}
