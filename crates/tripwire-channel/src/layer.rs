//! `tower` middleware rendition of the failure interceptor.
//!
//! For hosts that dispatch channel actions through a `tower::Service`,
//! [`NotifyLayer`] wraps the dispatcher so every `Err` it yields is reported
//! once and then returned unchanged. Panics inside the inner future are not
//! intercepted here; the synchronous [`CallbackChain`](crate::CallbackChain)
//! handles those.

use crate::channel::{Channel, Invocation};
use crate::interceptor::report;
use std::error::Error as StdError;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tower::{Layer, Service};
use tripwire_core::Notifier;

/// One dispatch request: the channel being invoked and what it is asked to do.
#[derive(Debug)]
pub struct ChannelRequest<C> {
    pub channel: Arc<C>,
    pub invocation: Invocation,
}

impl<C> ChannelRequest<C> {
    pub fn new(channel: Arc<C>, invocation: Invocation) -> Self {
        Self { channel, invocation }
    }
}

impl<C> Clone for ChannelRequest<C> {
    fn clone(&self) -> Self {
        Self {
            channel: Arc::clone(&self.channel),
            invocation: self.invocation.clone(),
        }
    }
}

/// Layer that reports inner service errors to a notifier.
#[derive(Debug)]
pub struct NotifyLayer<N> {
    notifier: Arc<N>,
}

impl<N> NotifyLayer<N> {
    pub fn new(notifier: N) -> Self {
        Self::shared(Arc::new(notifier))
    }

    pub fn shared(notifier: Arc<N>) -> Self {
        Self { notifier }
    }
}

impl<N> Clone for NotifyLayer<N> {
    fn clone(&self) -> Self {
        Self {
            notifier: Arc::clone(&self.notifier),
        }
    }
}

impl<S, N> Layer<S> for NotifyLayer<N> {
    type Service = NotifyService<S, N>;

    fn layer(&self, inner: S) -> Self::Service {
        NotifyService {
            inner,
            notifier: Arc::clone(&self.notifier),
        }
    }
}

/// Service produced by [`NotifyLayer`].
#[derive(Debug)]
pub struct NotifyService<S, N> {
    inner: S,
    notifier: Arc<N>,
}

impl<S: Clone, N> Clone for NotifyService<S, N> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            notifier: Arc::clone(&self.notifier),
        }
    }
}

impl<S, C, N> Service<ChannelRequest<C>> for NotifyService<S, N>
where
    S: Service<ChannelRequest<C>>,
    S::Future: Send + 'static,
    S::Response: Send + 'static,
    S::Error: AsRef<dyn StdError + Send + Sync + 'static> + Send + 'static,
    C: Channel,
    N: Notifier + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<S::Response, S::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: ChannelRequest<C>) -> Self::Future {
        let channel = Arc::clone(&request.channel);
        let invocation = request.invocation.clone();
        let notifier = Arc::clone(&self.notifier);
        let response = self.inner.call(request);

        Box::pin(async move {
            match response.await {
                Ok(value) => Ok(value),
                Err(err) => {
                    report(&*notifier, &*channel, &invocation, err.as_ref());
                    Err(err)
                }
            }
        })
    }
}
