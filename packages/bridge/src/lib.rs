//! Deadlock-free sync-over-async for `tokio`
//!
//! # General Principal
//! Like `cu`, this crate tries to be as short as possible with imports. The entry
//! points are exported directly by the crate and should be used as `cu_bridge::xxx`.
//! Executors live in [`cu_bridge::co`](co).
//!
//! The crate covers exactly two things:
//! - **Waiting** for async work from synchronous code, with [`wait`] and
//!   [`wait_cancellable`], without deadlocking when the calling thread is
//!   the one the work needs to make progress.
//! - **Detaching** async work, with [`detach`] and [`detach_with`], while
//!   still making sure its fault is observed (either by a handler, or by
//!   being discarded on purpose) instead of lost.
//!
//! Both work on an [`Operation`], which wraps a future, a `tokio` task,
//! a [`Completer`]-driven promise, or an already known outcome.
//!
//! ```rust
//! use cu_bridge::Operation;
//!
//! #[derive(Debug, PartialEq, derive_more::Display, derive_more::Error)]
//! #[display("Oops!")]
//! struct Oops;
//!
//! // already finished operations return right away
//! assert_eq!(cu_bridge::wait(Operation::completed(42)).unwrap(), 42);
//!
//! // the error is returned as-is, so it can be downcasted
//! let err = cu_bridge::wait(Operation::<u32>::new(async { Err(Oops.into()) })).unwrap_err();
//! assert_eq!(err.downcast_ref::<Oops>(), Some(&Oops));
//! assert_eq!(err.to_string(), "Oops!");
//! ```
//!
//! # Executors
//! The free functions schedule their work on [`co::Background`], a lazily built,
//! multi-threaded `tokio` runtime. To schedule on something else,
//! such as a runtime [`Handle`](tokio::runtime::Handle) or a concurrency-limited [`co::Pool`],
//! use a [`Bridge`].
//!
//! # Cancellation
//! Cancellation uses [`CancellationToken`](tokio_util::sync::CancellationToken)
//! from `tokio-util`. A cancelled operation, or a triggered token, is always
//! reported as a [`Cancelled`] error, never as a fault.
//!
//! # `log` integration
//! Diagnostics are printed with the `log` crate, re-exported as
//! `cu_bridge::{error, warn, info, debug, trace}`. Use [`log_init`] in tests
//! to print them to stderr, filtered by `RUST_LOG`.
//!
//! # Feature flags
//! - `heavy`: size the background runtime by the number of logical processors
//!   instead of 1 worker thread
//! - `release-nolog` and `release-nodebuglog`: statically disable logging in release builds

mod error;
pub use error::{Cancelled, Fault, PreconditionError, best_effort_panic_info};

mod op;
pub use op::{BoxedFuture, Completer, Operation, Outcome};

pub mod co;

mod wait;
pub use wait::{wait, wait_cancellable};
mod detach;
pub use detach::{detach, detach_with};
mod bridge;
pub use bridge::Bridge;

mod logging;
pub use logging::log_init;

// re-exports from libraries
pub use anyhow::{Context, Error, Ok, Result, anyhow as fmterr, bail};
pub use log::{debug, error, info, trace, warn};
pub use tokio_util::sync::CancellationToken;

/// Prelude imports
pub mod pre {
    pub use crate::Context as _;
}
