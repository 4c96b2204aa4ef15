//! Operation handles
//!
//! An [`Operation`] is the handle the bridge works with. It represents
//! async work that is either already finished, or will finish at some point
//! by a producer outside of the bridge:
//!
//! | Producer | Constructor |
//! |-|-|
//! | A future returning `cu_bridge::Result<T>` | [`Operation::new`] |
//! | A `tokio` task | [`Operation::from_task`] or `From<JoinHandle<_>>` |
//! | External code completing it later | [`Operation::promise`] |
//! | An already known outcome | [`completed`](Operation::completed), [`faulted`](Operation::faulted), [`cancelled`](Operation::cancelled) |
//!
//! Futures are lazy. An operation created with [`Operation::new`] only
//! starts running when the bridge polls it on an executor, never on the thread
//! that created it.
//!
//! The default value is the *absent* operation, which every entry point of
//! the bridge rejects with a [`PreconditionError`](crate::PreconditionError).

use std::panic::AssertUnwindSafe;
use std::pin::Pin;

use futures::FutureExt as _;
use tokio::task::JoinHandle;

use crate::{Error, Fault, PreconditionError};

mod outcome;
pub use outcome::Outcome;
mod completer;
pub use completer::Completer;

/// Alias for a boxed future
pub type BoxedFuture<T> = Pin<Box<dyn Future<Output = T> + Send + 'static>>;

/// Handle to async work that is pending or finished
///
/// See the [module documentation](self) for how to create one.
pub struct Operation<T>(Repr<T>);

enum Repr<T> {
    Absent,
    Ready(Outcome<T>),
    Future(BoxedFuture<crate::Result<T>>),
    Task(JoinHandle<crate::Result<T>>),
    Promise(oneshot::Receiver<Outcome<T>>),
}

impl<T> Default for Operation<T> {
    /// The absent operation
    #[inline]
    fn default() -> Self {
        Self(Repr::Absent)
    }
}

impl<T> std::fmt::Debug for Operation<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = match &self.0 {
            Repr::Absent => "absent",
            Repr::Ready(outcome) => match outcome {
                Outcome::Completed(_) => "completed",
                Outcome::Faulted(_) => "faulted",
                Outcome::Cancelled => "cancelled",
            },
            Repr::Future(_) => "future",
            Repr::Task(_) => "task",
            Repr::Promise(_) => "promise",
        };
        f.debug_tuple("Operation").field(&state).finish()
    }
}

impl<T: Send + 'static> Operation<T> {
    /// Create an operation from a future.
    ///
    /// The future is not polled until the bridge schedules it. Returning an
    /// error that is (or wraps) [`Cancelled`](crate::Cancelled) counts as cancellation,
    /// any other error counts as a fault. Panics are caught and count as faults too.
    pub fn new<F>(future: F) -> Self
    where
        F: Future<Output = crate::Result<T>> + Send + 'static,
    {
        Self(Repr::Future(Box::pin(future)))
    }

    /// Create an operation from a spawned `tokio` task.
    ///
    /// An aborted task counts as cancelled, and a panicked task as faulted.
    ///
    /// Do not [`wait`](crate::wait) for a task spawned on the current-thread
    /// runtime of the waiting thread. That thread is the only one that can run
    /// the task, and it is blocked until the task finishes, so the wait never
    /// returns unless it is cancelled with [`wait_cancellable`](crate::wait_cancellable).
    #[inline]
    pub fn from_task(handle: JoinHandle<crate::Result<T>>) -> Self {
        Self(Repr::Task(handle))
    }

    /// Create an operation that is completed by someone else through the
    /// returned [`Completer`].
    ///
    /// ```rust
    /// use cu_bridge::Operation;
    ///
    /// let (completer, op) = Operation::promise();
    /// std::thread::spawn(move || completer.complete("done"));
    /// assert_eq!(cu_bridge::wait(op).unwrap(), "done");
    /// ```
    pub fn promise() -> (Completer<T>, Self) {
        let (send, recv) = oneshot::channel();
        (Completer::new(send), Self(Repr::Promise(recv)))
    }
}

impl<T: Send + 'static> From<JoinHandle<crate::Result<T>>> for Operation<T> {
    #[inline]
    fn from(handle: JoinHandle<crate::Result<T>>) -> Self {
        Self::from_task(handle)
    }
}

impl<T> Operation<T> {
    /// An operation that already completed with `value`
    #[inline]
    pub fn completed(value: T) -> Self {
        Self(Repr::Ready(Outcome::Completed(value)))
    }

    /// An operation that already faulted with `error`
    #[inline]
    pub fn faulted(error: impl Into<Error>) -> Self {
        Self(Repr::Ready(Outcome::Faulted(Fault::new(error))))
    }

    /// An operation that already faulted with multiple errors.
    /// The first one is the primary error.
    pub fn faulted_many<I>(errors: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Error>,
    {
        Self(Repr::Ready(Outcome::Faulted(Fault::from_errors(errors))))
    }

    /// An operation that was already cancelled
    #[inline]
    pub fn cancelled() -> Self {
        Self(Repr::Ready(Outcome::Cancelled))
    }

    /// An operation that already reached `outcome`
    #[inline]
    pub fn from_outcome(outcome: Outcome<T>) -> Self {
        Self(Repr::Ready(outcome))
    }

    /// Move the operation out, leaving an absent operation in its place
    #[inline]
    pub fn take(&mut self) -> Self {
        std::mem::take(self)
    }

    /// Check if this is the absent operation
    #[inline]
    pub fn is_absent(&self) -> bool {
        matches!(self.0, Repr::Absent)
    }

    /// Get the outcome if the operation already finished, without
    /// waiting or scheduling anything. Otherwise, the operation is given back.
    ///
    /// A future created with [`Operation::new`] is never polled here, and
    /// so always comes back pending.
    pub fn into_ready(self) -> Result<Outcome<T>, Self> {
        match self.0 {
            Repr::Ready(outcome) => Ok(outcome),
            Repr::Task(mut handle) if handle.is_finished() => match (&mut handle).now_or_never() {
                Some(result) => Ok(Outcome::from_join(result)),
                None => Err(Self(Repr::Task(handle))),
            },
            Repr::Promise(recv) => match recv.try_recv() {
                Ok(outcome) => Ok(outcome),
                Err(oneshot::TryRecvError::Disconnected) => Ok(Outcome::Cancelled),
                Err(oneshot::TryRecvError::Empty) => Err(Self(Repr::Promise(recv))),
            },
            repr => Err(Self(repr)),
        }
    }

    /// Wait for the operation to reach its terminal state, driving it
    /// on the current task if it's a future.
    ///
    /// The absent operation resolves to a fault with a [`PreconditionError`].
    pub async fn into_outcome(self) -> Outcome<T> {
        match self.0 {
            Repr::Absent => Outcome::Faulted(Fault::new(PreconditionError::absent_operation())),
            Repr::Ready(outcome) => outcome,
            Repr::Future(future) => match AssertUnwindSafe(future).catch_unwind().await {
                Ok(result) => Outcome::from_result(result),
                Err(payload) => Outcome::Faulted(Fault::new(crate::error::panic_error(payload))),
            },
            Repr::Task(handle) => Outcome::from_join(handle.await),
            // a completer dropped without settling cancels the operation
            Repr::Promise(recv) => recv.await.unwrap_or(Outcome::Cancelled),
        }
    }
}
