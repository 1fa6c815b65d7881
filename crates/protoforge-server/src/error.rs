use protoforge_core::ForgeError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Invalid service config: {0}")]
    InvalidConfig(String),
}

/// Outcome codes reported back to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusCode {
    InvalidArgument,
    NotFound,
    AlreadyExists,
    Unimplemented,
    Internal,
}

/// Failure returned by a handler or by the dispatcher itself
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{code:?}: {details}")]
pub struct Status {
    pub code: StatusCode,
    pub details: String,
}

impl Status {
    pub fn new(code: StatusCode, details: impl Into<String>) -> Self {
        Self {
            code,
            details: details.into(),
        }
    }

    pub fn invalid_argument(details: impl Into<String>) -> Self {
        Self::new(StatusCode::InvalidArgument, details)
    }

    pub fn not_found(details: impl Into<String>) -> Self {
        Self::new(StatusCode::NotFound, details)
    }

    pub fn already_exists(details: impl Into<String>) -> Self {
        Self::new(StatusCode::AlreadyExists, details)
    }

    pub fn unimplemented() -> Self {
        Self::new(StatusCode::Unimplemented, "Method not implemented!")
    }

    pub fn internal(details: impl Into<String>) -> Self {
        Self::new(StatusCode::Internal, details)
    }
}

impl From<ForgeError> for Status {
    fn from(err: ForgeError) -> Self {
        Status::invalid_argument(err.to_string())
    }
}
