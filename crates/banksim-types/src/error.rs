use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Machine-checkable failure category, shared by both services and the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidArgument,
    NotFound,
    FailedPrecondition,
    Canceled,
    Internal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidArgument => "invalid_argument",
            ErrorKind::NotFound => "not_found",
            ErrorKind::FailedPrecondition => "failed_precondition",
            ErrorKind::Canceled => "canceled",
            ErrorKind::Internal => "internal",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BankError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("failed precondition: {0}")]
    FailedPrecondition(String),

    #[error("canceled: {0}")]
    Canceled(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl BankError {
    /// Rebuild an error from its wire representation
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        let message = message.into();
        match kind {
            ErrorKind::InvalidArgument => BankError::InvalidArgument(message),
            ErrorKind::NotFound => BankError::NotFound(message),
            ErrorKind::FailedPrecondition => BankError::FailedPrecondition(message),
            ErrorKind::Canceled => BankError::Canceled(message),
            ErrorKind::Internal => BankError::Internal(message),
        }
    }

    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn failed_precondition(msg: impl Into<String>) -> Self {
        Self::FailedPrecondition(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            BankError::InvalidArgument(_) => ErrorKind::InvalidArgument,
            BankError::NotFound(_) => ErrorKind::NotFound,
            BankError::FailedPrecondition(_) => ErrorKind::FailedPrecondition,
            BankError::Canceled(_) => ErrorKind::Canceled,
            BankError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Human-readable message without the kind prefix
    pub fn message(&self) -> &str {
        match self {
            BankError::InvalidArgument(m)
            | BankError::NotFound(m)
            | BankError::FailedPrecondition(m)
            | BankError::Canceled(m)
            | BankError::Internal(m) => m,
        }
    }
}

pub type Result<T> = std::result::Result<T, BankError>;

/// Failures of [`Money`](crate::Money) arithmetic
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoneyError {
    #[error("currency mismatch: {0} vs {1}")]
    CurrencyMismatch(String, String),

    #[error("insufficient balance")]
    InsufficientFunds,

    #[error("amount out of range")]
    Overflow,
}
