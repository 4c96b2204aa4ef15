use crate::{Error, Fault};

use super::Outcome;

/// Producer side of an operation created with [`Operation::promise`](super::Operation::promise).
///
/// Every method consumes the completer, so the operation reaches its terminal
/// state exactly once. Dropping the completer without calling any of them
/// cancels the operation.
pub struct Completer<T> {
    send: oneshot::Sender<Outcome<T>>,
}

impl<T> std::fmt::Debug for Completer<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Completer").finish_non_exhaustive()
    }
}

impl<T> Completer<T> {
    pub(super) fn new(send: oneshot::Sender<Outcome<T>>) -> Self {
        Self { send }
    }

    /// Complete the operation with a value
    #[inline]
    pub fn complete(self, value: T) -> bool {
        self.settle(Outcome::Completed(value))
    }

    /// Fault the operation with an error
    #[inline]
    pub fn fault(self, error: impl Into<Error>) -> bool {
        self.settle(Outcome::Faulted(Fault::new(error)))
    }

    /// Fault the operation with multiple errors, the first one is the primary error
    pub fn fault_many<I>(self, errors: I) -> bool
    where
        I: IntoIterator,
        I::Item: Into<Error>,
    {
        self.settle(Outcome::Faulted(Fault::from_errors(errors)))
    }

    /// Cancel the operation
    #[inline]
    pub fn cancel(self) -> bool {
        self.settle(Outcome::Cancelled)
    }

    /// Move the operation to `outcome`.
    ///
    /// Returns `false` if nobody is observing the operation anymore,
    /// in which case the outcome is dropped.
    pub fn settle(self, outcome: Outcome<T>) -> bool {
        self.send.send(outcome).is_ok()
    }
}
