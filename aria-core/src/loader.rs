//! Pending-load bookkeeping: assigns request ids and routes engine replies
//! back to the host callback that asked for them.
//!
//! A load lives in the table from the tick that emitted its request until
//! exactly one success or failure reply resolves it. Replies for unknown
//! request ids are dropped, so an engine retrying a reply is harmless.

use std::collections::HashMap;

use aria_types::{LoadError, LoadRequest, RequestId, Source};

/// Callback invoked exactly once when a load resolves.
pub type LoadCallback<Msg> = Box<dyn FnOnce(Result<Source, LoadError>) -> Msg + Send>;

/// A load instruction produced by the host, resolved by the runtime.
///
/// Hosts build these with [`load_audio`], [`AudioCmd::none`] and
/// [`AudioCmd::batch`]; the runtime assigns request ids when it receives
/// the value, never at construction time.
pub enum AudioCmd<Msg> {
    None,
    Load {
        audio_url: String,
        on_complete: LoadCallback<Msg>,
    },
    Batch(Vec<AudioCmd<Msg>>),
}

impl<Msg> AudioCmd<Msg> {
    pub fn none() -> Self {
        AudioCmd::None
    }

    pub fn batch(cmds: impl IntoIterator<Item = AudioCmd<Msg>>) -> Self {
        AudioCmd::Batch(cmds.into_iter().collect())
    }
}

impl<Msg> std::fmt::Debug for AudioCmd<Msg> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AudioCmd::None => write!(f, "AudioCmd::None"),
            AudioCmd::Load { audio_url, .. } => {
                f.debug_struct("AudioCmd::Load").field("audio_url", audio_url).finish_non_exhaustive()
            }
            AudioCmd::Batch(cmds) => f.debug_tuple("AudioCmd::Batch").field(&cmds.len()).finish(),
        }
    }
}

/// Ask the engine to fetch and decode `url`. On success the callback
/// receives a [`Source`] carrying the buffer id the engine assigned.
pub fn load_audio<Msg>(
    url: impl Into<String>,
    on_complete: impl FnOnce(Result<Source, LoadError>) -> Msg + Send + 'static,
) -> AudioCmd<Msg> {
    AudioCmd::Load {
        audio_url: url.into(),
        on_complete: Box::new(on_complete),
    }
}

struct PendingLoad<Msg> {
    audio_url: String,
    on_complete: LoadCallback<Msg>,
}

/// Table of in-flight load requests, keyed by monotonically assigned ids.
pub struct LoadTracker<Msg> {
    pending: HashMap<RequestId, PendingLoad<Msg>>,
    request_count: RequestId,
    max_pending: Option<usize>,
}

impl<Msg> LoadTracker<Msg> {
    /// `max_pending = None` leaves the table unbounded; with a cap set,
    /// excess loads resolve immediately with
    /// [`LoadError::ExceededMaxSimultaneousLoads`].
    pub fn new(max_pending: Option<usize>) -> Self {
        Self {
            pending: HashMap::new(),
            request_count: 0,
            max_pending,
        }
    }

    /// Register every load contained in `cmd`. Returns the wire requests
    /// to emit this tick plus host messages for loads rejected by the cap.
    pub fn register(&mut self, cmd: AudioCmd<Msg>) -> (Vec<LoadRequest>, Vec<Msg>) {
        let mut requests = Vec::new();
        let mut rejected = Vec::new();
        self.register_inner(cmd, &mut requests, &mut rejected);
        (requests, rejected)
    }

    fn register_inner(
        &mut self,
        cmd: AudioCmd<Msg>,
        requests: &mut Vec<LoadRequest>,
        rejected: &mut Vec<Msg>,
    ) {
        match cmd {
            AudioCmd::None => {}
            AudioCmd::Batch(cmds) => {
                for cmd in cmds {
                    self.register_inner(cmd, requests, rejected);
                }
            }
            AudioCmd::Load {
                audio_url,
                on_complete,
            } => {
                if let Some(cap) = self.max_pending {
                    if self.pending.len() >= cap {
                        log::warn!(
                            target: "audio::load",
                            "rejecting load of {}: {} requests already in flight",
                            audio_url,
                            cap
                        );
                        rejected.push(on_complete(Err(LoadError::ExceededMaxSimultaneousLoads)));
                        return;
                    }
                }
                let request_id = self.request_count;
                self.request_count += 1;
                requests.push(LoadRequest {
                    audio_url: audio_url.clone(),
                    request_id,
                });
                self.pending.insert(
                    request_id,
                    PendingLoad {
                        audio_url,
                        on_complete,
                    },
                );
            }
        }
    }

    /// Resolve one engine reply, consuming the callback. Unknown ids are
    /// dropped so a duplicated reply cannot fire a callback twice.
    pub fn resolve(
        &mut self,
        request_id: RequestId,
        result: Result<Source, LoadError>,
    ) -> Option<Msg> {
        match self.pending.remove(&request_id) {
            Some(load) => {
                log::debug!(
                    target: "audio::load",
                    "load request {} ({}) resolved",
                    request_id,
                    load.audio_url
                );
                Some((load.on_complete)(result))
            }
            None => {
                log::debug!(
                    target: "audio::load",
                    "dropping reply for unknown load request {}",
                    request_id
                );
                None
            }
        }
    }

    /// Number of loads currently awaiting an engine reply.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Total requests ever assigned; also the next id to be handed out.
    pub fn request_count(&self) -> RequestId {
        self.request_count
    }
}
