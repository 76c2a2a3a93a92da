// SPDX-License-Identifier: GPL-3.0-only

//! Error types for the dashboard application

use crate::backends::camera::CaptureError;
use std::fmt;

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Main application error type
///
/// Capture failures are normally absorbed by the session manager and shown
/// as a notification; they only appear here when a CLI command needs them.
#[derive(Debug, Clone)]
pub enum AppError {
    /// Camera acquisition errors
    Capture(CaptureError),
    /// Configuration errors
    Config(String),
    /// Terminal setup or drawing errors
    Terminal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Capture(e) => write!(f, "Capture error: {}", e),
            AppError::Config(msg) => write!(f, "Configuration error: {}", msg),
            AppError::Terminal(msg) => write!(f, "Terminal error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<CaptureError> for AppError {
    fn from(err: CaptureError) -> Self {
        AppError::Capture(err)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Config(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Terminal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_error_display() {
        let err: AppError = CaptureError::DeviceBusy.into();
        assert_eq!(err.to_string(), "Capture error: Camera is busy");
    }

    #[test]
    fn test_json_error_becomes_config_error() {
        let parse = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert!(matches!(AppError::from(parse), AppError::Config(_)));
    }
}
