//! tripwire-channel: failure reporting around channel actions.
//!
//! A host channel subsystem dispatches every action (subscribe, unsubscribe,
//! and remote `perform` actions) through a [`CallbackChain`]. The chain's
//! outermost slot holds a [`ChannelFailureInterceptor`], which reports any
//! failure exactly once to a [`Notifier`](tripwire_core::Notifier) and then
//! re-raises it untouched.
//!
//! ```text
//! host dispatch ──► interceptor ──► around callbacks ──► action
//!                       │
//!                       └──► Notifier (on failure only)
//! ```
//!
//! Async hosts built on `tower` get the same behaviour from [`NotifyLayer`].

pub mod chain;
pub mod channel;
pub mod interceptor;
pub mod layer;

pub use chain::{ActionResult, AroundCallback, CallbackChain};
pub use channel::{ActionKind, Channel, Invocation};
pub use interceptor::{ChannelFailureInterceptor, PanicFailure, CONNECTION_STASH_KEY};
pub use layer::{ChannelRequest, NotifyLayer, NotifyService};
