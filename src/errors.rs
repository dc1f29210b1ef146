use thiserror::Error;

use crate::decimal::Money;
use crate::types::{DueStatus, LoanStatus};

/// coarse error taxonomy every caller can branch on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// bad user input, recoverable by re-entry
    Validation,
    /// request never reached the backend or no response came back
    Network,
    /// backend answered with a non-2xx status
    Api,
    /// template, font or file missing or unwritable
    Asset,
    /// camera or gallery access refused
    PermissionDenied,
    /// payload too incomplete to act on
    InsufficientData,
    /// anything else: decode failures, unexpected shapes
    Unexpected,
}

/// a single field-level validation failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self { field, message: message.into() }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

#[derive(Error, Debug)]
pub enum LendingError {
    #[error("invalid {field}: {message}")]
    InvalidField {
        field: &'static str,
        message: String,
    },

    #[error("form has {} invalid field(s)", .0.len())]
    InvalidForm(Vec<FieldError>),

    #[error("invalid amount: {amount}")]
    InvalidAmount {
        amount: Money,
    },

    #[error("settlement date is required")]
    MissingSettlementDate,

    #[error("due is {status:?} and can no longer be edited")]
    DueNotEditable {
        status: DueStatus,
    },

    #[error("payment of {provided} exceeds pending amount {pending}")]
    PaymentExceedsPending {
        pending: Money,
        provided: Money,
    },

    #[error("loan is {status:?}; operation not allowed")]
    LoanNotOpen {
        status: LoanStatus,
    },

    #[error("invalid state: current {current}, expected {expected}")]
    InvalidState {
        current: String,
        expected: String,
    },

    #[error("not signed in")]
    NotAuthenticated,

    #[error("request failed: {0}")]
    Network(#[source] reqwest::Error),

    #[error("server returned {status}: {message}")]
    Api {
        status: u16,
        message: String,
    },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration {
        message: String,
    },

    #[error("asset unavailable: {message}")]
    Asset {
        message: String,
    },

    #[error("io error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("pdf rendering failed: {message}")]
    Pdf {
        message: String,
    },

    #[error("spreadsheet export failed: {message}")]
    Spreadsheet {
        message: String,
    },

    #[error("permission denied for {capability}")]
    PermissionDenied {
        capability: String,
    },

    #[error("media capture failed: {message}")]
    Capture {
        message: String,
    },

    #[error("insufficient data: {message}")]
    InsufficientData {
        message: String,
    },

    #[error("unexpected response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("cancelled by user")]
    Cancelled,
}

impl LendingError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LendingError::InvalidField { .. }
            | LendingError::InvalidForm(_)
            | LendingError::InvalidAmount { .. }
            | LendingError::MissingSettlementDate
            | LendingError::DueNotEditable { .. }
            | LendingError::PaymentExceedsPending { .. }
            | LendingError::LoanNotOpen { .. }
            | LendingError::Cancelled => ErrorKind::Validation,
            LendingError::Network(_) => ErrorKind::Network,
            LendingError::Api { .. } | LendingError::NotAuthenticated => ErrorKind::Api,
            LendingError::Asset { .. }
            | LendingError::Io { .. }
            | LendingError::Pdf { .. }
            | LendingError::Spreadsheet { .. } => ErrorKind::Asset,
            LendingError::PermissionDenied { .. } => ErrorKind::PermissionDenied,
            LendingError::InsufficientData { .. } => ErrorKind::InsufficientData,
            LendingError::InvalidState { .. }
            | LendingError::InvalidConfiguration { .. }
            | LendingError::Capture { .. }
            | LendingError::Decode(_) => ErrorKind::Unexpected,
        }
    }

    /// text suitable for an alert shown to the operator
    pub fn user_message(&self) -> String {
        match self {
            LendingError::InvalidForm(errors) => errors
                .iter()
                .map(|e| e.to_string())
                .collect::<Vec<_>>()
                .join("\n"),
            LendingError::Network(_) => {
                "Unable to reach the server. Check your connection and try again.".to_string()
            }
            LendingError::Api { message, .. } => message.clone(),
            LendingError::NotAuthenticated => "Session expired. Please log in again.".to_string(),
            LendingError::InsufficientData { .. } => {
                "Insufficient data to generate the receipt.".to_string()
            }
            LendingError::Decode(_) | LendingError::InvalidState { .. } => {
                "Something went wrong. Please try again.".to_string()
            }
            other => other.to_string(),
        }
    }

    pub(crate) fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        LendingError::Io { path: path.into(), source }
    }
}

impl From<FieldError> for LendingError {
    fn from(e: FieldError) -> Self {
        LendingError::InvalidField { field: e.field, message: e.message }
    }
}

impl From<reqwest::Error> for LendingError {
    fn from(e: reqwest::Error) -> Self {
        LendingError::Network(e)
    }
}

pub type Result<T> = std::result::Result<T, LendingError>;
