//! Around-callback chain for channel action dispatch.
//!
//! The host registers cross-cutting [`AroundCallback`]s per channel base type.
//! A dispatch runs them outside-in, in registration order, with the action at
//! the centre. The failure interceptor does not take part in that ordering:
//! it occupies a dedicated slot that always wraps the whole chain, so it sees
//! the failure every other callback let through and its re-raise is the one
//! the host observes.
//!
//! ```text
//! interceptor ─► callback[0] ─► callback[1] ─► … ─► action
//! ```

use crate::channel::{Channel, Invocation};
use crate::interceptor::ChannelFailureInterceptor;
use tripwire_core::Notifier;

/// What every channel action returns to the dispatcher.
pub type ActionResult = anyhow::Result<()>;

/// Cross-cutting behaviour run around a channel action.
///
/// Call `next` to continue down the chain; not calling it halts the dispatch
/// with whatever result the callback returns.
pub trait AroundCallback<C: ?Sized>: Send + Sync {
    fn around(
        &self,
        channel: &C,
        invocation: &Invocation,
        next: &mut dyn FnMut() -> ActionResult,
    ) -> ActionResult;
}

/// The interceptor as it sits in the outermost slot.
///
/// `ChannelFailureInterceptor` itself is not an [`AroundCallback`], so it can
/// only enter a chain through [`CallbackChain::install_failure_interceptor`].
struct Outermost<N>(ChannelFailureInterceptor<N>);

impl<C, N> AroundCallback<C> for Outermost<N>
where
    C: Channel + ?Sized,
    N: Notifier,
{
    fn around(
        &self,
        channel: &C,
        invocation: &Invocation,
        next: &mut dyn FnMut() -> ActionResult,
    ) -> ActionResult {
        self.0.wrap(channel, invocation, next)
    }
}

/// The around-callbacks registered for one channel base type.
pub struct CallbackChain<C: ?Sized> {
    interceptor: Option<Box<dyn AroundCallback<C>>>,
    callbacks: Vec<Box<dyn AroundCallback<C>>>,
}

impl<C: Channel + ?Sized> Default for CallbackChain<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Channel + ?Sized> CallbackChain<C> {
    pub fn new() -> Self {
        Self {
            interceptor: None,
            callbacks: Vec::new(),
        }
    }

    /// Append a callback inside every previously registered one.
    ///
    /// Failure interceptors are installed separately and cannot be registered:
    ///
    /// ```compile_fail
    /// use std::sync::Arc;
    /// use tripwire_channel::{CallbackChain, Channel, ChannelFailureInterceptor};
    /// use tripwire_core::MemoryNotifier;
    ///
    /// struct Lobby;
    ///
    /// impl Channel for Lobby {
    ///     type Connection = ();
    ///
    ///     fn connection(&self) -> Arc<()> {
    ///         Arc::new(())
    ///     }
    /// }
    ///
    /// let mut chain = CallbackChain::<Lobby>::new();
    /// chain.register(ChannelFailureInterceptor::new(MemoryNotifier::new()));
    /// ```
    pub fn register(&mut self, callback: impl AroundCallback<C> + 'static) -> &mut Self {
        self.callbacks.push(Box::new(callback));
        self
    }

    /// Put a failure interceptor in the outermost slot.
    ///
    /// Returns `true` if an earlier interceptor was replaced; a chain never
    /// runs two.
    pub fn install_failure_interceptor<N>(&mut self, notifier: N) -> bool
    where
        N: Notifier + 'static,
    {
        let replaced = self.interceptor.is_some();
        self.interceptor = Some(Box::new(Outermost(ChannelFailureInterceptor::new(notifier))));
        if replaced {
            tracing::debug!("replaced existing channel failure interceptor");
        }
        replaced
    }

    pub fn has_failure_interceptor(&self) -> bool {
        self.interceptor.is_some()
    }

    /// Number of registered callbacks, not counting the interceptor.
    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }

    /// Dispatch `invocation` on `channel` through the whole chain.
    pub fn run<F>(&self, channel: &C, invocation: &Invocation, mut action: F) -> ActionResult
    where
        F: FnMut(&C, &Invocation) -> ActionResult,
    {
        let layers: Vec<&dyn AroundCallback<C>> = self
            .interceptor
            .iter()
            .chain(self.callbacks.iter())
            .map(|callback| &**callback)
            .collect();
        run_layers(&layers, channel, invocation, &mut action)
    }
}

fn run_layers<C: ?Sized>(
    layers: &[&dyn AroundCallback<C>],
    channel: &C,
    invocation: &Invocation,
    action: &mut dyn FnMut(&C, &Invocation) -> ActionResult,
) -> ActionResult {
    match layers.split_first() {
        Some((layer, rest)) => {
            let mut next = || run_layers(rest, channel, invocation, &mut *action);
            layer.around(channel, invocation, &mut next)
        }
        None => action(channel, invocation),
    }
}
