pub mod intent;
pub mod inventory;
pub mod message;
pub mod order;
pub mod turn;
