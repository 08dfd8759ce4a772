//! Common response types.

use serde::Serialize;

/// `{success, message}` body shared by operations with nothing else to
/// report.
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        MessageResponse {
            success: true,
            message: message.into(),
        }
    }

    /// A non-fatal negative outcome, e.g. an optional integration that is
    /// not active.
    pub fn unavailable(message: impl Into<String>) -> Self {
        MessageResponse {
            success: false,
            message: message.into(),
        }
    }
}
