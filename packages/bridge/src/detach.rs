//! # Fire-and-forget with observed faults
//!
//! [`detach`] and [`detach_with`] start an operation and return immediately.
//! The operation keeps running on the executor, and when it finishes:
//! - success is ignored
//! - cancellation is ignored, since cancelling detached work is expected
//! - a fault is passed to the error handler if there is one, otherwise it is
//!   logged at `debug` level and dropped
//!
//! The error handler receives the root cause of the fault (the innermost
//! source of the primary error), and is called at most once, on whichever
//! thread observed the fault. A panicking handler is caught and logged.

use std::error::Error as StdError;
use std::panic::AssertUnwindSafe;

use crate::co::{Background, Executor};
use crate::{Operation, Outcome, PreconditionError};

type NoHandler = fn(&(dyn StdError + 'static));

/// Start the operation on the [`Background`] executor without waiting for it.
///
/// If it faults, the fault is observed and discarded.
///
/// # Errors
/// Only fails with [`PreconditionError`] if the operation is absent.
///
/// ```rust
/// use cu_bridge::Operation;
///
/// cu_bridge::detach(Operation::<()>::new(async {
///     cu_bridge::bail!("nobody will see this");
/// })).unwrap();
/// ```
#[inline]
pub fn detach<T: Send + 'static>(op: Operation<T>) -> crate::Result<()> {
    detach_on(&Background, op, None::<NoHandler>)
}

/// Start the operation on the [`Background`] executor without waiting for it,
/// and call `on_error` with the root cause if it faults.
///
/// # Errors
/// Only fails with [`PreconditionError`] if the operation is absent.
///
/// ```rust
/// use cu_bridge::Operation;
///
/// let (send, recv) = std::sync::mpsc::channel();
/// cu_bridge::detach_with(Operation::<()>::faulted(std::io::Error::other("disk full")), move |e| {
///     let _ = send.send(e.to_string());
/// }).unwrap();
/// assert_eq!(recv.recv().unwrap(), "disk full");
/// ```
#[inline]
pub fn detach_with<T, H>(op: Operation<T>, on_error: H) -> crate::Result<()>
where
    T: Send + 'static,
    H: FnOnce(&(dyn StdError + 'static)) + Send + 'static,
{
    detach_on(&Background, op, Some(on_error))
}

/// The funnel behind every detach entry point
pub(crate) fn detach_on<E, T, H>(
    executor: &E,
    op: Operation<T>,
    on_error: Option<H>,
) -> crate::Result<()>
where
    E: Executor + ?Sized,
    T: Send + 'static,
    H: FnOnce(&(dyn StdError + 'static)) + Send + 'static,
{
    if op.is_absent() {
        return Err(PreconditionError::absent_operation().into());
    }
    match op.into_ready() {
        Ok(Outcome::Completed(_)) => {}
        // already final, nothing left to wait for
        Ok(outcome) => report(outcome, on_error),
        Err(op) => {
            crate::trace!("scheduling observer for detached operation");
            executor.execute(observe(op, on_error));
        }
    }
    Ok(())
}

/// The observer unit: drive `op` to the end and report its fault
async fn observe<T, H>(op: Operation<T>, on_error: Option<H>)
where
    H: FnOnce(&(dyn StdError + 'static)),
{
    report(op.into_outcome().await, on_error)
}

fn report<T, H>(outcome: Outcome<T>, on_error: Option<H>)
where
    H: FnOnce(&(dyn StdError + 'static)),
{
    let Outcome::Faulted(fault) = outcome else {
        return;
    };
    let Some(on_error) = on_error else {
        crate::debug!("discarding fault from detached operation: {fault}");
        return;
    };
    let root_cause = fault.root_cause();
    if let Err(payload) = std::panic::catch_unwind(AssertUnwindSafe(|| on_error(root_cause))) {
        crate::error!(
            "error handler of detached operation panicked: {}",
            crate::best_effort_panic_info(&payload)
        );
    }
}
