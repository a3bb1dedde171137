//! Host-integration runtime: wraps a host app's update cycle, reconciles
//! after every update, and shuttles messages to and from the engine.
//!
//! The runtime is single-threaded and cooperative. [`AudioRuntime::dispatch`]
//! and the engine-event handlers are the only entry points that mutate
//! state, and each runs to completion before the next event is looked at.

use std::collections::VecDeque;
use std::io::{self, Read};

use aria_types::{EngineEvent, OutgoingMessage, Source};
use aria_wire::{decode_engine_value, framing, WireError};

use crate::loader::{AudioCmd, LoadTracker};
use crate::reconcile::ReconcilerState;

/// Boundary contract a host application implements.
///
/// `audio` must be a pure function of the host state: the runtime calls it
/// after every update and reconciles the result against what the engine is
/// already playing. Declaring a sound absent is the only way to stop it.
pub trait AudioApp {
    type Msg;

    /// Loads to kick off at startup. Runs once, before the first
    /// reconcile pass.
    fn init(&mut self) -> AudioCmd<Self::Msg> {
        AudioCmd::none()
    }

    /// Apply one message to the host model.
    fn update(&mut self, msg: Self::Msg) -> AudioCmd<Self::Msg>;

    /// Declare what should currently be audible.
    fn audio(&self) -> aria_types::Audio;
}

/// Runtime options. No files, CLI flags or environment variables are read
/// at this layer; hosts construct this directly.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Hard cap on simultaneously pending loads. `None` means unbounded;
    /// with a cap set, excess loads fail with
    /// [`aria_types::LoadError::ExceededMaxSimultaneousLoads`].
    pub max_pending_loads: Option<usize>,
    /// How many recent wire decode failures to retain for diagnostics.
    pub wire_error_capacity: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            max_pending_loads: None,
            wire_error_capacity: 32,
        }
    }
}

/// Engine context readiness. Declarations are reconciled and delivered in
/// either state; playing them before the context is live is the engine's
/// responsibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum ContextState {
    #[default]
    LoadingContext,
    Ready { samples_per_second: u32 },
}

/// Bounded record of inbound messages that failed to decode. Parse
/// failures never reach the host (there is no request id to correlate);
/// they are counted here for operators.
#[derive(Debug)]
struct WireErrorLog {
    total: u64,
    recent: VecDeque<String>,
    capacity: usize,
}

impl WireErrorLog {
    fn new(capacity: usize) -> Self {
        Self {
            total: 0,
            recent: VecDeque::new(),
            capacity,
        }
    }

    fn record(&mut self, err: &WireError) {
        self.total += 1;
        log::warn!(target: "audio::wire", "dropping engine message: {}", err);
        self.recent.push_back(err.to_string());
        while self.recent.len() > self.capacity {
            self.recent.pop_front();
        }
    }
}

/// Wraps a host app together with the reconciler state, the load tracker,
/// and the engine-context snapshot. One instance per engine connection.
pub struct AudioRuntime<A: AudioApp> {
    app: A,
    reconciler: ReconcilerState,
    loads: LoadTracker<A::Msg>,
    context: ContextState,
    wire_errors: WireErrorLog,
}

impl<A: AudioApp> AudioRuntime<A> {
    /// Wrap `app`, run its init loads, and reconcile its initial
    /// declaration against silence.
    pub fn new(app: A, config: RuntimeConfig) -> (Self, OutgoingMessage) {
        let mut runtime = Self {
            app,
            reconciler: ReconcilerState::new(),
            loads: LoadTracker::new(config.max_pending_loads),
            context: ContextState::default(),
            wire_errors: WireErrorLog::new(config.wire_error_capacity),
        };
        let cmd = runtime.app.init();
        let batch = runtime.finish_tick(cmd);
        (runtime, batch)
    }

    /// Run one host update and emit the resulting wire batch.
    pub fn dispatch(&mut self, msg: A::Msg) -> OutgoingMessage {
        let cmd = self.app.update(msg);
        self.finish_tick(cmd)
    }

    /// Feed one decoded engine event. Load replies resolve the tracker
    /// and, when a callback fires, run a full dispatch of the produced
    /// message; context initialization only captures the sample rate.
    pub fn handle_engine_event(&mut self, event: EngineEvent) -> Option<OutgoingMessage> {
        match event {
            EngineEvent::ContextInitialized { samples_per_second } => {
                self.context = ContextState::Ready { samples_per_second };
                log::info!(
                    target: "audio::runtime",
                    "audio context ready at {} samples/sec",
                    samples_per_second
                );
                None
            }
            EngineEvent::LoadSucceeded {
                request_id,
                buffer_id,
                duration_secs,
            } => {
                let source = Source::with_duration(buffer_id, duration_secs);
                let msg = self.loads.resolve(request_id, Ok(source))?;
                Some(self.dispatch(msg))
            }
            EngineEvent::LoadFailed { request_id, error } => {
                let msg = self.loads.resolve(request_id, Err(error))?;
                Some(self.dispatch(msg))
            }
        }
    }

    /// Decode and feed one raw engine message. Messages that fail to
    /// decode are recorded and dropped.
    pub fn handle_engine_json(&mut self, raw: &serde_json::Value) -> Option<OutgoingMessage> {
        match decode_engine_value(raw) {
            Ok(event) => self.handle_engine_event(event),
            Err(err) => {
                self.wire_errors.record(&err);
                None
            }
        }
    }

    /// Feed one framed engine payload, as produced by the channel framing.
    /// A payload that is not JSON is recorded and dropped like any other
    /// malformed message.
    pub fn handle_engine_frame(&mut self, payload: &[u8]) -> Option<OutgoingMessage> {
        match serde_json::from_slice::<serde_json::Value>(payload) {
            Ok(value) => self.handle_engine_json(&value),
            Err(err) => {
                self.wire_errors.record(&WireError::Json(err));
                None
            }
        }
    }

    /// Read one framed engine message from the channel and feed it through
    /// the runtime. Frame-level corruption surfaces as an I/O error; a
    /// well-formed frame whose payload does not decode is recorded and
    /// dropped without killing the channel.
    pub fn pump_engine<R: Read>(&mut self, reader: &mut R) -> io::Result<Option<OutgoingMessage>> {
        let payload = framing::read_frame(reader)?;
        Ok(self.handle_engine_frame(&payload))
    }

    /// Register load commands, drain any immediate cap rejections back
    /// through update, then reconcile. Every tick ends here.
    fn finish_tick(&mut self, cmd: AudioCmd<A::Msg>) -> OutgoingMessage {
        let mut audio_cmds = Vec::new();
        let mut queue = VecDeque::from([cmd]);
        while let Some(cmd) = queue.pop_front() {
            let (requests, rejected) = self.loads.register(cmd);
            audio_cmds.extend(requests);
            for msg in rejected {
                queue.push_back(self.app.update(msg));
            }
        }
        let audio = self.reconciler.reconcile(&self.app.audio());
        OutgoingMessage { audio, audio_cmds }
    }

    /// The wrapped host app (view pass-through).
    pub fn app(&self) -> &A {
        &self.app
    }

    pub fn app_mut(&mut self) -> &mut A {
        &mut self.app
    }

    /// Output sample rate, once the engine has reported its context.
    pub fn samples_per_second(&self) -> Option<u32> {
        match self.context {
            ContextState::LoadingContext => None,
            ContextState::Ready { samples_per_second } => Some(samples_per_second),
        }
    }

    /// Total inbound messages dropped because they failed to decode.
    pub fn wire_error_count(&self) -> u64 {
        self.wire_errors.total
    }

    /// Most recent decode failures, oldest first.
    pub fn recent_wire_errors(&self) -> impl Iterator<Item = &str> {
        self.wire_errors.recent.iter().map(String::as_str)
    }

    /// Loads currently awaiting an engine reply.
    pub fn pending_load_count(&self) -> usize {
        self.loads.pending_count()
    }
}
