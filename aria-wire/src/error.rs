//! Decode errors for inbound engine messages.

use thiserror::Error;

/// Why an inbound engine message could not be decoded.
///
/// These never reach host callbacks: the runtime records the failure and
/// drops the message, because a message that does not parse carries no
/// request id to correlate a callback with.
#[derive(Error, Debug)]
pub enum WireError {
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("message carries no integer \"type\" tag")]
    MissingType,

    #[error("unknown message type {0}")]
    UnknownMessageType(i64),

    #[error("message is missing field \"{0}\"")]
    MissingField(&'static str),

    #[error("unknown load error \"{0}\"")]
    UnknownLoadError(String),
}
