use async_trait::async_trait;
use chrono::Utc;
use serde::Serialize;
use sqlx::Row;
use tokio::sync::RwLock;

use borong_core::domain::intent::Intent;
use borong_core::domain::turn::ConversationTurn;
use borong_core::errors::LogError;

use crate::DbPool;

/// One journaled turn as read back, with the store-assigned row id and
/// timestamp. Direction and status stay as raw strings in this read model.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TurnRecord {
    pub id: i64,
    pub channel: String,
    pub direction: String,
    pub peer: String,
    pub content: String,
    pub locale: String,
    pub intent: Option<Intent>,
    pub metadata: Option<serde_json::Value>,
    pub status: String,
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

/// Conversation journal. Appends are the hot path; the store assigns
/// `created_at` at write time and callers never supply timestamps. The one
/// read, `recent_by_intent`, backs lead listing.
#[async_trait]
pub trait ConversationLog: Send + Sync {
    async fn append(&self, turn: &ConversationTurn) -> Result<(), LogError>;

    /// Newest-first turns carrying the given intent, capped at `limit`.
    async fn recent_by_intent(
        &self,
        intent: Intent,
        limit: u32,
    ) -> Result<Vec<TurnRecord>, LogError>;
}

pub struct SqlConversationLog {
    pool: DbPool,
}

impl SqlConversationLog {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ConversationLog for SqlConversationLog {
    async fn append(&self, turn: &ConversationTurn) -> Result<(), LogError> {
        let metadata = turn
            .metadata
            .as_ref()
            .map(|value| value.to_string());

        sqlx::query(
            "INSERT INTO conversation_turn \
             (channel, direction, peer, content, locale, intent, metadata, status) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&turn.channel)
        .bind(turn.direction.as_str())
        .bind(&turn.peer)
        .bind(&turn.content)
        .bind(&turn.locale)
        .bind(turn.intent.map(|intent| intent.as_str()))
        .bind(metadata)
        .bind(turn.status.as_str())
        .execute(&self.pool)
        .await
        .map_err(|error| LogError::Write(error.to_string()))?;

        Ok(())
    }

    async fn recent_by_intent(
        &self,
        intent: Intent,
        limit: u32,
    ) -> Result<Vec<TurnRecord>, LogError> {
        let rows = sqlx::query(
            "SELECT id, channel, direction, peer, content, locale, intent, metadata, \
             status, created_at \
             FROM conversation_turn WHERE intent = ? ORDER BY id DESC LIMIT ?",
        )
        .bind(intent.as_str())
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|error| LogError::Read(error.to_string()))?;

        Ok(rows
            .into_iter()
            .map(|row| TurnRecord {
                id: row.get("id"),
                channel: row.get("channel"),
                direction: row.get("direction"),
                peer: row.get("peer"),
                content: row.get("content"),
                locale: row.get("locale"),
                intent: row
                    .get::<Option<String>, _>("intent")
                    .map(|label| Intent::from_label(&label)),
                metadata: row
                    .get::<Option<String>, _>("metadata")
                    .and_then(|raw| serde_json::from_str(&raw).ok()),
                status: row.get("status"),
                created_at: row.get("created_at"),
            })
            .collect())
    }
}

/// Test double; optionally fails every call to simulate a journal outage.
#[derive(Default)]
pub struct InMemoryConversationLog {
    turns: RwLock<Vec<(ConversationTurn, String)>>,
    failing: bool,
}

impl InMemoryConversationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self { turns: RwLock::new(Vec::new()), failing: true }
    }

    pub async fn turns(&self) -> Vec<ConversationTurn> {
        self.turns.read().await.iter().map(|(turn, _)| turn.clone()).collect()
    }
}

#[async_trait]
impl ConversationLog for InMemoryConversationLog {
    async fn append(&self, turn: &ConversationTurn) -> Result<(), LogError> {
        if self.failing {
            return Err(LogError::Write("simulated journal outage".to_string()));
        }
        self.turns.write().await.push((turn.clone(), Utc::now().to_rfc3339()));
        Ok(())
    }

    async fn recent_by_intent(
        &self,
        intent: Intent,
        limit: u32,
    ) -> Result<Vec<TurnRecord>, LogError> {
        if self.failing {
            return Err(LogError::Read("simulated journal outage".to_string()));
        }

        let turns = self.turns.read().await;
        Ok(turns
            .iter()
            .enumerate()
            .filter(|(_, (turn, _))| turn.intent == Some(intent))
            .rev()
            .take(limit as usize)
            .map(|(index, (turn, created_at))| TurnRecord {
                id: index as i64 + 1,
                channel: turn.channel.clone(),
                direction: turn.direction.as_str().to_string(),
                peer: turn.peer.clone(),
                content: turn.content.clone(),
                locale: turn.locale.clone(),
                intent: turn.intent,
                metadata: turn.metadata.clone(),
                status: turn.status.as_str().to_string(),
                created_at: created_at.clone(),
            })
            .collect())
    }
}
