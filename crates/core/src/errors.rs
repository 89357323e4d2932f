use thiserror::Error;

/// Failures of the remote table-invocation service. Every variant is
/// absorbed by the adapter and substituted with the deterministic fallback;
/// none of these ever reach the pipeline caller.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum RemoteError {
    #[error("remote call failed: {0}")]
    Transport(String),
    #[error("remote service returned status {status}")]
    Status { status: u16 },
    #[error("remote response is missing the `{0}` field")]
    MissingField(&'static str),
    #[error("remote response could not be decoded: {0}")]
    Decode(String),
}

/// Failures of the tabular stores (catalog reads, order appends).
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("store configuration incomplete: {0}")]
    MissingConfig(String),
    #[error("store call failed: {0}")]
    Transport(String),
    #[error("store returned status {status}: {body}")]
    Api { status: u16, body: String },
    #[error("store row could not be decoded: {0}")]
    Decode(String),
}

/// Failures of the conversation journal. Writes are always absorbed: a log
/// outage must never block or alter the primary reply. Reads back the
/// journal (lead listing) surface to their HTTP caller instead.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum LogError {
    #[error("conversation log write failed: {0}")]
    Write(String),
    #[error("conversation log read failed: {0}")]
    Read(String),
}

/// The single error class that crosses the pipeline boundary. Everything
/// else degrades to a fallback answer; a failed order append must surface,
/// because a synthesized "order recorded" reply would be worse than an
/// explicit error.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum PipelineError {
    #[error("order could not be persisted: {0}")]
    OrderPersistence(#[from] StoreError),
}
