//! Events the engine reports back to the runtime.

use crate::{BufferId, LoadError, RequestId};

/// Decoded engine-to-host message.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// A load request failed; the error is routed to the requesting
    /// callback.
    LoadFailed {
        request_id: RequestId,
        error: LoadError,
    },
    /// A load request completed; the engine assigned a buffer id and
    /// reports the decoded duration.
    LoadSucceeded {
        request_id: RequestId,
        buffer_id: BufferId,
        duration_secs: f64,
    },
    /// The audio context came up. Declarations made before this are still
    /// reconciled and delivered; playing them early is the engine's
    /// problem, not ours.
    ContextInitialized { samples_per_second: u32 },
}
