use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_CHANNEL: &str = "whatsapp";
pub const DEFAULT_LOCALE: &str = "ms";

/// One inbound customer message, immutable once constructed.
///
/// Construction is the malformed-input boundary: a message without text or a
/// sender address never enters the pipeline.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundMessage {
    pub text: String,
    pub sender_id: String,
    pub display_name: Option<String>,
    pub channel: String,
    pub locale: String,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum MessageValidationError {
    #[error("message text is required")]
    MissingText,
    #[error("sender id is required")]
    MissingSender,
}

impl InboundMessage {
    pub fn new(
        text: impl Into<String>,
        sender_id: impl Into<String>,
        display_name: Option<String>,
        channel: Option<String>,
        locale: Option<String>,
    ) -> Result<Self, MessageValidationError> {
        let text = text.into();
        let sender_id = sender_id.into();

        if text.trim().is_empty() {
            return Err(MessageValidationError::MissingText);
        }
        if sender_id.trim().is_empty() {
            return Err(MessageValidationError::MissingSender);
        }

        Ok(Self {
            text,
            sender_id,
            display_name,
            channel: channel.unwrap_or_else(|| DEFAULT_CHANNEL.to_string()),
            locale: locale.unwrap_or_else(|| DEFAULT_LOCALE.to_string()),
        })
    }
}
