//! Simulated settle latency between a request and its commit.

use crate::command::Command;
use futures::future::BoxFuture;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

type DelayFn = Arc<dyn Fn() -> BoxFuture<'static, ()> + Send + Sync>;

/// How long a component waits before committing a request.
///
/// In-memory tables have nothing to fetch, but hosts may still want a short
/// pause so a loading indicator is visible. `Latency::None` delivers the
/// commit as an immediate message, which keeps tests synchronous.
///
/// # Example
///
/// ```rust,ignore
/// use std::time::Duration;
/// use tabula_core::Latency;
///
/// let latency = Latency::Fixed(Duration::from_millis(100));
/// let cmd = latency.settle(Msg::Settled);
/// ```
#[derive(Clone, Default)]
pub enum Latency {
    /// Commit on the next update cycle.
    #[default]
    None,
    /// Sleep on the tokio timer before committing.
    Fixed(Duration),
    /// Await a caller-supplied future before committing.
    Custom(DelayFn),
}

impl Latency {
    /// Build a custom latency from a future factory.
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn() -> BoxFuture<'static, ()> + Send + Sync + 'static,
    {
        Latency::Custom(Arc::new(f))
    }

    /// Return a command that delivers `msg` once the latency has elapsed.
    pub fn settle<Msg: Send + 'static>(&self, msg: Msg) -> Command<Msg> {
        match self {
            Latency::None => Command::message(msg),
            Latency::Fixed(d) if d.is_zero() => Command::message(msg),
            Latency::Fixed(d) => {
                let d = *d;
                Command::perform(async move { tokio::time::sleep(d).await }, move |_| msg)
            }
            Latency::Custom(f) => Command::perform(f(), move |_| msg),
        }
    }
}

impl fmt::Debug for Latency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Latency::None => f.write_str("None"),
            Latency::Fixed(d) => f.debug_tuple("Fixed").field(d).finish(),
            Latency::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}
