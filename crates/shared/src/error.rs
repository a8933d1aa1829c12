use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    Detached,
    HandlerFailed,
    Config,
}

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("notifier used after its facade was dropped")]
    FacadeDropped,
    #[error("observer for notification '{notification}' failed: {source}")]
    ObserverFailed {
        notification: String,
        source: anyhow::Error,
    },
    #[error("{failed} observers for notification '{notification}' failed; first: {first}")]
    ObserverFailures {
        notification: String,
        failed: usize,
        first: anyhow::Error,
    },
    #[error("invalid value '{value}' for setting '{key}'")]
    InvalidSetting { key: String, value: String },
    #[error("failed to parse config file '{path}': {source}")]
    Config {
        path: String,
        source: anyhow::Error,
    },
}

impl DispatchError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::FacadeDropped => ErrorCode::Detached,
            Self::ObserverFailed { .. } | Self::ObserverFailures { .. } => ErrorCode::HandlerFailed,
            Self::InvalidSetting { .. } | Self::Config { .. } => ErrorCode::Config,
        }
    }

    /// Name of the notification whose fan-out produced this error, if any.
    pub fn notification(&self) -> Option<&str> {
        match self {
            Self::ObserverFailed { notification, .. }
            | Self::ObserverFailures { notification, .. } => Some(notification),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorReport {
    pub code: ErrorCode,
    pub message: String,
}

impl From<&DispatchError> for ErrorReport {
    fn from(value: &DispatchError) -> Self {
        Self {
            code: value.code(),
            message: value.to_string(),
        }
    }
}
