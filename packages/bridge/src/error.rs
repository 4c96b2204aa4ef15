use std::any::Any;

use anyhow::{Error, anyhow as fmterr};

/// The operation, or the token passed in to wait for it, was cancelled.
///
/// ```rust
/// use cu_bridge::{Cancelled, Operation};
///
/// let err = cu_bridge::wait(Operation::<u32>::cancelled()).unwrap_err();
/// assert!(err.is::<Cancelled>());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, derive_more::Display, derive_more::Error)]
#[display("operation was cancelled")]
pub struct Cancelled;

/// A required argument was missing. Always raised synchronously,
/// before anything is scheduled.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("precondition failed: {what}")]
pub struct PreconditionError {
    what: &'static str,
}
impl PreconditionError {
    pub(crate) const fn absent_operation() -> Self {
        Self {
            what: "operation handle is absent",
        }
    }

    /// Description of the violated precondition
    pub fn what(&self) -> &'static str {
        self.what
    }
}

/// One or more errors captured from a faulted operation.
///
/// A fault is never empty. The first error is the *primary* error,
/// and the root cause of the primary error is the *base* error.
#[derive(Debug)]
pub struct Fault {
    errors: Vec<Error>,
}

impl Fault {
    /// Create a fault from a single error
    pub fn new(error: impl Into<Error>) -> Self {
        Self {
            errors: vec![error.into()],
        }
    }

    /// Create a fault from multiple errors, in order of importance.
    ///
    /// If the iterator is empty, a placeholder error is stored so the fault
    /// still has a primary error.
    pub fn from_errors<I>(errors: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Error>,
    {
        let mut errors: Vec<Error> = errors.into_iter().map(Into::into).collect();
        if errors.is_empty() {
            errors.push(fmterr!("operation faulted without an error"));
        }
        Self { errors }
    }

    /// The first error, as raised by the operation
    pub fn primary(&self) -> &Error {
        &self.errors[0]
    }

    /// Take the first error and discard the rest
    pub fn into_primary(self) -> Error {
        let mut errors = self.errors;
        errors.swap_remove(0)
    }

    /// The innermost cause of the primary error
    pub fn root_cause(&self) -> &(dyn std::error::Error + 'static) {
        self.primary().root_cause()
    }

    /// All errors in the fault
    pub fn errors(&self) -> &[Error] {
        &self.errors
    }

    /// Number of errors, at least 1
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Always `false`, a fault holds at least one error
    pub fn is_empty(&self) -> bool {
        false
    }
}

impl std::fmt::Display for Fault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.errors.len() {
            1 => write!(f, "{}", self.primary()),
            n => write!(f, "{n} errors occurred, first: {}", self.primary()),
        }
    }
}

impl std::error::Error for Fault {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&**self.primary())
    }
}

/// Try to get info from a panic payload
pub fn best_effort_panic_info<'a>(payload: &'a Box<dyn Any + Send + 'static>) -> &'a str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        crate::debug!(
            "encountered unknown panic info with type id: {:?}",
            (**payload).type_id()
        );
        "unknown panic info"
    }
}

/// Turn a panic payload caught from an operation into an error
pub(crate) fn panic_error(payload: Box<dyn Any + Send + 'static>) -> Error {
    fmterr!("operation panicked: {}", best_effort_panic_info(&payload))
}
