use tokio::task::JoinError;

use crate::{Cancelled, Error, Fault};

/// Terminal state of an [`Operation`](super::Operation)
#[derive(Debug)]
pub enum Outcome<T> {
    /// Finished successfully with a value
    Completed(T),
    /// Failed with one or more errors
    Faulted(Fault),
    /// Cancelled before it could finish
    Cancelled,
}

impl<T> Outcome<T> {
    /// Classify the result of an operation.
    ///
    /// - `Ok` is [`Completed`](Self::Completed)
    /// - an error that is (or has the context of) [`Cancelled`] is [`Cancelled`](Self::Cancelled)
    /// - a [`Fault`] is kept as-is, so faults from nested operations are not wrapped again
    /// - any other error is a [`Faulted`](Self::Faulted) with that one error
    pub fn from_result(result: crate::Result<T>) -> Self {
        let error = match result {
            Ok(value) => return Self::Completed(value),
            Err(e) => e,
        };
        if error.is::<Cancelled>() {
            return Self::Cancelled;
        }
        match error.downcast::<Fault>() {
            Ok(fault) => Self::Faulted(fault),
            Err(error) => Self::Faulted(Fault::new(error)),
        }
    }

    /// Convert to a result, as seen by a synchronous caller.
    ///
    /// A fault gives back its primary error directly, not the [`Fault`]
    /// container, so the caller can still downcast to the concrete error type.
    /// Cancellation is a [`Cancelled`] error.
    pub fn into_result(self) -> crate::Result<T> {
        match self {
            Self::Completed(value) => Ok(value),
            Self::Faulted(fault) => Err(fault.into_primary()),
            Self::Cancelled => Err(Error::new(Cancelled)),
        }
    }

    #[inline]
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed(_))
    }

    #[inline]
    pub fn is_faulted(&self) -> bool {
        matches!(self, Self::Faulted(_))
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Classify the result of joining a `tokio` task
    pub(crate) fn from_join(result: Result<crate::Result<T>, JoinError>) -> Self {
        let error = match result {
            Ok(result) => return Self::from_result(result),
            Err(e) => e,
        };
        let error = match error.try_into_panic() {
            Ok(payload) => return Self::Faulted(Fault::new(crate::error::panic_error(payload))),
            Err(e) => e,
        };
        if error.is_cancelled() {
            Self::Cancelled
        } else {
            Self::Faulted(Fault::new(crate::fmterr!(
                "failed to join task due to unknown reason: {error:?}"
            )))
        }
    }
}
