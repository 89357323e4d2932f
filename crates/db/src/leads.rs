//! Lead persistence: append-only rows captured from the dashboard
//! collaborator. Every lead starts in status `new`; the store assigns the
//! id and timestamp.

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use borong_core::errors::StoreError;

use crate::DbPool;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct NewLead {
    pub name: Option<String>,
    pub phone: String,
    pub notes: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LeadRecord {
    pub id: i64,
    pub name: Option<String>,
    pub phone: String,
    pub notes: Option<String>,
    pub status: String,
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

#[async_trait]
pub trait LeadRepository: Send + Sync {
    /// Appends one lead row and returns its assigned id.
    async fn create(&self, lead: &NewLead) -> Result<i64, StoreError>;
}

pub struct SqlLeadRepository {
    pool: DbPool,
}

impl SqlLeadRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LeadRepository for SqlLeadRepository {
    async fn create(&self, lead: &NewLead) -> Result<i64, StoreError> {
        let result = sqlx::query(
            "INSERT INTO lead (name, phone, notes, status) VALUES (?, ?, ?, 'new')",
        )
        .bind(&lead.name)
        .bind(&lead.phone)
        .bind(&lead.notes)
        .execute(&self.pool)
        .await
        .map_err(|error| StoreError::Transport(error.to_string()))?;

        Ok(result.last_insert_rowid())
    }
}

/// Test double; optionally fails every create to simulate a store outage.
#[derive(Default)]
pub struct InMemoryLeadRepository {
    rows: RwLock<Vec<LeadRecord>>,
    failing: bool,
}

impl InMemoryLeadRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self { rows: RwLock::new(Vec::new()), failing: true }
    }

    pub async fn recorded(&self) -> Vec<LeadRecord> {
        self.rows.read().await.clone()
    }
}

#[async_trait]
impl LeadRepository for InMemoryLeadRepository {
    async fn create(&self, lead: &NewLead) -> Result<i64, StoreError> {
        if self.failing {
            return Err(StoreError::Transport("simulated lead store outage".to_string()));
        }

        let mut rows = self.rows.write().await;
        let id = rows.len() as i64 + 1;
        rows.push(LeadRecord {
            id,
            name: lead.name.clone(),
            phone: lead.phone.clone(),
            notes: lead.notes.clone(),
            status: "new".to_string(),
            created_at: Utc::now().to_rfc3339(),
        });
        Ok(id)
    }
}
