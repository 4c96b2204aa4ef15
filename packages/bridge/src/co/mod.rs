//! `cu_bridge::co` Executors for relay and observer units
//!
//! Everything the bridge schedules (the relay unit of [`wait`](crate::wait)
//! and the observer unit of [`detach`](crate::detach)) goes through the
//! [`Executor`] trait. The free functions at the crate root use
//! [`Background`], a lazily built multi-threaded `tokio` runtime that
//! no caller thread ever belongs to. Use [`Bridge`](crate::Bridge) to
//! inject any other executor, for example a runtime [`Handle`](tokio::runtime::Handle)
//! or a concurrency-limited [`Pool`].
//!
//! # Sizing the background runtime
//! By default the background runtime has 1 worker thread, since the relay
//! and observer units only wait. Enable the `heavy` feature to have one worker
//! per logical processor instead. The size can also be set with the
//! `CU_BRIDGE_WORKERS` environment variable, or with [`configure`] before
//! the runtime is first used.
//!
//! ```rust
//! use cu_bridge::co::{self, Executor};
//!
//! let (send, recv) = oneshot::channel();
//! co::Background.execute(async move {
//!     let _ = send.send(42);
//! });
//! assert_eq!(recv.recv().unwrap(), 42);
//! ```

use std::sync::Arc;

mod config;
pub use config::{Config, configure};
mod runtime;
pub use runtime::Background;
mod pool;
pub use pool::{Pool, pool};

/// Something that can run a unit of async work to completion,
/// independently of the thread that scheduled it.
///
/// The unit is fully described by the future passed in; executors must not
/// require it to be re-created or captured in any other way. Implementations
/// must provide their own synchronization, since units may be scheduled
/// from any thread.
pub trait Executor {
    /// Schedule the unit of work and return immediately
    fn execute<F>(&self, future: F)
    where
        F: Future<Output = ()> + Send + 'static;
}

impl Executor for tokio::runtime::Handle {
    #[inline]
    fn execute<F>(&self, future: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        // tokio tasks never attach to a parent, dropping the join handle detaches it
        drop(self.spawn(future));
    }
}

impl Executor for tokio::runtime::Runtime {
    #[inline]
    fn execute<F>(&self, future: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        drop(self.spawn(future));
    }
}

impl<E: Executor + ?Sized> Executor for &E {
    #[inline]
    fn execute<F>(&self, future: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        (**self).execute(future)
    }
}

impl<E: Executor + ?Sized> Executor for Arc<E> {
    #[inline]
    fn execute<F>(&self, future: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        (**self).execute(future)
    }
}

/// Resolve a user-friendly capacity into an actual count.
///
/// - `n > 0` is used as-is
/// - `0` is the number of logical processors
/// - `n < 0` is the number of logical processors minus `-n`
///
/// The result is at least 1.
pub(crate) fn resolve_capacity(capacity: isize) -> usize {
    match capacity {
        1.. => capacity as usize,
        c => {
            let n = num_cpus::get();
            n.saturating_sub(c.unsigned_abs()).max(1)
        }
    }
}
