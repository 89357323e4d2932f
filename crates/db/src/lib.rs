pub mod connection;
pub mod leads;
pub mod log;
pub mod migrations;

pub use connection::{connect, connect_with_settings, ping, DbPool};
pub use sqlx::Error;
pub use leads::{InMemoryLeadRepository, LeadRecord, LeadRepository, NewLead, SqlLeadRepository};
pub use log::{ConversationLog, InMemoryConversationLog, SqlConversationLog, TurnRecord};
