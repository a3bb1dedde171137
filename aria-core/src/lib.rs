//! # aria-core
//!
//! The declarative-audio reconciler and its host runtime.
//!
//! A host declares what should currently be audible as a pure function of
//! its state; this crate flattens the declaration, diffs it against what
//! the engine is already playing, and emits the minimal ordered command
//! batch that closes the gap. It also owns the asynchronous load protocol
//! that turns URLs into playable [`aria_types::Source`] handles.

pub mod flatten;
pub mod loader;
pub mod reconcile;
pub mod runtime;

pub use flatten::{flatten, Flattened};
pub use loader::{load_audio, AudioCmd, LoadTracker};
pub use reconcile::ReconcilerState;
pub use runtime::{AudioApp, AudioRuntime, RuntimeConfig};
