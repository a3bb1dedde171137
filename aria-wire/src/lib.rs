//! # aria-wire
//!
//! JSON wire codec between the aria runtime and the Web Audio engine.
//!
//! Egress: the per-tick outgoing batch
//! `{ "audio": [commands…], "audioCmds": [load requests…] }`.
//! Ingress: engine replies tagged by an integer `"type"` field.
//! The framing module puts both directions on an ordered byte channel,
//! one length-prefixed JSON document per frame; inbound payloads come
//! back undecoded so the runtime decides what is droppable.

mod decode;
mod encode;
mod error;
pub mod framing;

pub use decode::{decode_engine_event, decode_engine_value};
pub use encode::{encode_command, encode_outgoing};
pub use error::WireError;
