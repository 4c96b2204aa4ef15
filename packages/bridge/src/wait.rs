//! # Waiting for async work from sync code
//!
//! Blocking a thread until a future is done looks easy: `Handle::block_on(op)`.
//! However, if the thread that blocks is also the thread that needs to drive
//! the operation (for example, the only thread of a current-thread runtime,
//! or a thread that is already inside a runtime), the operation never makes
//! progress and the thread is stuck forever. `tokio` turns some of these
//! cases into a panic, the rest are plain deadlocks.
//!
//! [`wait`] avoids this by never driving the operation on the calling thread.
//! Instead:
//! 1. If the operation is already finished, the outcome is returned right away,
//!    and nothing is scheduled.
//! 2. Otherwise, a small *relay* unit is scheduled on an executor that the caller
//!    is not a part of. The relay drives the operation (and watches the cancellation
//!    token, if any), then sends the outcome back.
//! 3. The calling thread blocks on the reply from the relay, and on the
//!    cancellation token if any. The token is watched on both sides, so a
//!    relay that is still queued on a busy executor does not delay cancellation.
//!
//! When the calling thread is a worker of a multi-threaded `tokio` runtime,
//! the wait goes through [`block_in_place`](tokio::task::block_in_place),
//! so the other tasks on that worker are moved elsewhere while it waits.
//!
//! The injected executor must not be the caller's own single-threaded context.
//! The default [`Background`] executor never is.
//!
//! The same goes for the operation itself: a task spawned on the caller's
//! current-thread runtime (see [`Operation::from_task`]) cannot run while that
//! thread is blocked, so waiting for it never finishes. Use [`wait_cancellable`]
//! with a timer-driven token if such a wait cannot be avoided.

use futures::future::{self, Either};
use tokio::runtime::{Handle, RuntimeFlavor};
use tokio_util::sync::CancellationToken;

use crate::co::{Background, Executor};
use crate::{Cancelled, Operation, Outcome, PreconditionError};

/// Block the current thread until the operation finishes, and return its result.
///
/// The operation is driven on the [`Background`] executor. Use
/// [`Bridge::wait`](crate::Bridge::wait) for other executors.
///
/// # Errors
/// - [`PreconditionError`] if the operation is absent
/// - [`Cancelled`] if the operation was cancelled
/// - the operation's own error if it failed. If it failed with multiple errors,
///   the first one is returned
///
/// # Blocking forever
/// The calling thread must not be the one the operation needs to finish.
/// Futures are always driven elsewhere, but a task spawned on the caller's own
/// current-thread runtime is not. Use [`wait_cancellable`] to bound such a wait.
///
/// ```rust
/// use cu_bridge::Operation;
///
/// let op = Operation::new(async {
///     tokio::time::sleep(std::time::Duration::from_millis(10)).await;
///     Ok(42)
/// });
/// assert_eq!(cu_bridge::wait(op).unwrap(), 42);
/// ```
#[inline]
pub fn wait<T: Send + 'static>(op: Operation<T>) -> crate::Result<T> {
    wait_on(&Background, op, None)
}

/// Like [`wait`], but also stops waiting with a [`Cancelled`] error
/// as soon as `cancel` is triggered.
///
/// Use this to put a timeout on the wait, by cancelling the token from a timer.
///
/// ```rust
/// use std::time::Duration;
/// use cu_bridge::{Cancelled, Operation};
/// use tokio_util::sync::CancellationToken;
///
/// let token = CancellationToken::new();
/// let trigger = token.clone();
/// std::thread::spawn(move || {
///     std::thread::sleep(Duration::from_millis(50));
///     trigger.cancel();
/// });
/// let op = Operation::new(async {
///     tokio::time::sleep(Duration::from_secs(5)).await;
///     Ok(())
/// });
/// let err = cu_bridge::wait_cancellable(op, &token).unwrap_err();
/// assert!(err.is::<Cancelled>());
/// ```
#[inline]
pub fn wait_cancellable<T: Send + 'static>(
    op: Operation<T>,
    cancel: &CancellationToken,
) -> crate::Result<T> {
    wait_on(&Background, op, Some(cancel))
}

pub(crate) fn wait_on<E, T>(
    executor: &E,
    op: Operation<T>,
    cancel: Option<&CancellationToken>,
) -> crate::Result<T>
where
    E: Executor + ?Sized,
    T: Send + 'static,
{
    if op.is_absent() {
        return Err(PreconditionError::absent_operation().into());
    }
    let op = match op.into_ready() {
        Ok(outcome) => {
            crate::trace!("operation already finished, not scheduling relay");
            return outcome.into_result();
        }
        Err(op) => op,
    };
    if cancel.is_some_and(CancellationToken::is_cancelled) {
        crate::trace!("token already cancelled, not scheduling relay");
        return Err(Cancelled.into());
    }
    let (reply, recv) = oneshot::channel();
    crate::trace!("scheduling relay for pending operation");
    executor.execute(relay(op, cancel.cloned(), reply));
    block_on_reply(recv, cancel).into_result()
}

/// The relay unit: drive `op` until it finishes or `cancel` is triggered,
/// and send the outcome to `reply`
async fn relay<T>(
    op: Operation<T>,
    cancel: Option<CancellationToken>,
    reply: oneshot::Sender<Outcome<T>>,
) {
    let outcome = match cancel {
        None => op.into_outcome().await,
        Some(cancel) => {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => Outcome::Cancelled,
                outcome = op.into_outcome() => outcome,
            }
        }
    };
    if reply.send(outcome).is_err() {
        crate::trace!("relay finished after the caller stopped waiting");
    }
}

fn block_on_reply<T>(
    recv: oneshot::Receiver<Outcome<T>>,
    cancel: Option<&CancellationToken>,
) -> Outcome<T> {
    let wait = move || {
        let reply = match cancel {
            None => recv.recv().ok(),
            Some(cancel) => {
                let recv = std::pin::pin!(recv);
                let cancelled = std::pin::pin!(cancel.cancelled());
                // reply first, so a finished relay wins over a token triggered at the same time
                match futures::executor::block_on(future::select(recv, cancelled)) {
                    Either::Left((reply, _)) => reply.ok(),
                    Either::Right(_) => {
                        crate::trace!("token cancelled before the relay replied");
                        return Outcome::Cancelled;
                    }
                }
            }
        };
        reply.unwrap_or_else(|| {
            crate::debug!("relay was dropped before it finished, treating as cancelled");
            Outcome::Cancelled
        })
    };
    match Handle::try_current() {
        Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
            tokio::task::block_in_place(wait)
        }
        _ => wait(),
    }
}
