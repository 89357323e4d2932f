use serde::{Deserialize, Serialize};

use super::intent::Intent;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnDirection {
    Inbound,
    Outbound,
}

impl TurnDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Inbound => "inbound",
            Self::Outbound => "outbound",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnStatus {
    Received,
    Sent,
    Failed,
}

impl TurnStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Received => "received",
            Self::Sent => "sent",
            Self::Failed => "failed",
        }
    }
}

/// One audit record in the conversation journal. Append-only; the store
/// assigns the timestamp at write time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub channel: String,
    pub direction: TurnDirection,
    /// Counterparty address: sender for inbound turns, recipient for
    /// outbound ones.
    pub peer: String,
    pub content: String,
    pub locale: String,
    pub intent: Option<Intent>,
    pub metadata: Option<serde_json::Value>,
    pub status: TurnStatus,
}

impl ConversationTurn {
    pub fn inbound(channel: &str, peer: &str, content: &str, locale: &str) -> Self {
        Self {
            channel: channel.to_string(),
            direction: TurnDirection::Inbound,
            peer: peer.to_string(),
            content: content.to_string(),
            locale: locale.to_string(),
            intent: None,
            metadata: None,
            status: TurnStatus::Received,
        }
    }

    pub fn outbound(
        channel: &str,
        peer: &str,
        content: &str,
        locale: &str,
        intent: Intent,
        metadata: serde_json::Value,
    ) -> Self {
        Self {
            channel: channel.to_string(),
            direction: TurnDirection::Outbound,
            peer: peer.to_string(),
            content: content.to_string(),
            locale: locale.to_string(),
            intent: Some(intent),
            metadata: Some(metadata),
            status: TurnStatus::Sent,
        }
    }
}
