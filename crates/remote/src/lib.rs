pub mod client;
pub mod resolved;

pub use client::RemoteIntentClient;
pub use resolved::Resolved;
