//! tripwire: request event normalization and channel failure reporting.
//!
//! The library halves live in their own crates and are re-exported here so
//! integration tests and the replay tool can reach both from one place.
//!
//! # Architecture
//!
//! ```text
//! instrumentation event ──► tripwire-core::EventNormalizer ──► NormalizedEvent
//!
//! channel dispatch ──► tripwire-channel::CallbackChain ──► action
//!                              │
//!                              └──► Notifier (on failure)
//! ```

pub mod replay;

pub use tripwire_channel as channel;
pub use tripwire_core as events;
