//! Channel failure interceptor: report once, then re-raise.
//!
//! [`ChannelFailureInterceptor::wrap`] runs a channel action. If the action
//! returns `Err` or panics, a [`Notice`] is built with:
//!
//! - the failure itself,
//! - the channel's connection, stashed under [`CONNECTION_STASH_KEY`],
//! - context `component` (the channel type) and `action` (the payload's
//!   `action` entry),
//! - every payload entry merged into the notice params,
//!
//! and handed to the notifier. The original error value is then returned, or
//! the original panic payload resumed, whatever the notifier did.

use crate::channel::{Channel, Invocation};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use thiserror::Error;
use tripwire_core::notice::{Failure, Stashed};
use tripwire_core::{Notice, Notifier};

/// Stash key under which the channel's connection is attached to a notice.
pub const CONNECTION_STASH_KEY: &str = "channel_connection";

/// Describes a panic raised by a channel action, for reporting only.
///
/// The panic itself is resumed with its original payload afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("channel action panicked: {message}")]
pub struct PanicFailure {
    pub message: String,
}

impl PanicFailure {
    fn from_payload(payload: &(dyn Any + Send)) -> Self {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "non-string panic payload".to_string());
        Self { message }
    }
}

/// Reports channel action failures to a notifier.
///
/// Holds no per-invocation state; one instance serves every dispatch of a
/// channel base type concurrently.
#[derive(Debug, Clone)]
pub struct ChannelFailureInterceptor<N> {
    notifier: N,
}

impl<N: Notifier> ChannelFailureInterceptor<N> {
    pub fn new(notifier: N) -> Self {
        Self { notifier }
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Run `action`, reporting any failure before passing it on unchanged.
    pub fn wrap<C, R, F>(&self, channel: &C, invocation: &Invocation, action: F) -> anyhow::Result<R>
    where
        C: Channel + ?Sized,
        F: FnOnce() -> anyhow::Result<R>,
    {
        match panic::catch_unwind(AssertUnwindSafe(action)) {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(err)) => {
                report(&self.notifier, channel, invocation, &*err);
                Err(err)
            }
            Err(payload) => {
                let failure = PanicFailure::from_payload(&*payload);
                report(&self.notifier, channel, invocation, &failure);
                panic::resume_unwind(payload)
            }
        }
    }
}

/// Build the enriched notice for one failed invocation and deliver it.
///
/// A notifier `Err` is logged at `warn` and goes no further. Propagating it
/// would replace the action's own failure, and the host must always see the
/// original error re-raised. The cost is that a broken notifier is only
/// visible in the logs. A notifier that panics is not caught here.
pub(crate) fn report<N, C>(notifier: &N, channel: &C, invocation: &Invocation, failure: &Failure)
where
    N: Notifier + ?Sized,
    C: Channel + ?Sized,
{
    let component = channel.component();
    tracing::debug!(component, action = invocation.action(), kind = %invocation.kind(), error = %failure, "reporting channel action failure");

    let connection: Stashed = channel.connection();
    let mut notice = Notice::new(failure);
    notice.stash_value(CONNECTION_STASH_KEY, connection);
    notice.context.insert("component".into(), component.into());
    notice.context.insert("action".into(), invocation.action_value().clone());
    notice
        .params
        .extend(invocation.payload().iter().map(|(k, v)| (k.clone(), v.clone())));

    if let Err(err) = notifier.notify(&notice) {
        tracing::warn!(component, action = invocation.action(), error = %err, "failed to deliver channel failure notice");
    }
}
