//! Request and response bodies
//!
//! JSON is camelCase throughout; every success body carries `success: true`.

pub mod quote;
pub mod submission;
pub mod workflow;

use serde::Serialize;

/// `{success, message}`
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}
