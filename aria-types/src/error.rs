//! Error types surfaced to host callbacks.

use thiserror::Error;

/// Why a load request failed. Delivered exactly once to the requesting
/// callback; the runtime never retries.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadError {
    /// The engine could not fetch the URL.
    #[error("the engine could not fetch the requested URL")]
    NetworkError,

    /// The engine fetched the URL but could not decode the bytes.
    #[error("the engine could not decode the fetched audio data")]
    MediaDecodeAudioDataUnknownContentType,

    /// The runtime's configured pending-load cap was reached; the request
    /// was rejected without reaching the engine.
    #[error("too many load requests in flight")]
    ExceededMaxSimultaneousLoads,
}
