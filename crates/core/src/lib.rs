pub mod config;
pub mod domain;
pub mod errors;
pub mod fallback;
pub mod replies;

pub use domain::intent::Intent;
pub use domain::inventory::{
    AvailabilityResult, InventoryItem, InventoryQuery, ItemAttributes,
};
pub use domain::message::{InboundMessage, MessageValidationError};
pub use domain::order::{LineItem, Order};
pub use domain::turn::{ConversationTurn, TurnDirection, TurnStatus};
pub use errors::{LogError, PipelineError, RemoteError, StoreError};
