use std::error::Error as StdError;

use tokio_util::sync::CancellationToken;

use crate::Operation;
use crate::co::{Background, Executor};

/// Entry points of the bridge bound to a specific [`Executor`].
///
/// The free functions [`wait`](crate::wait), [`wait_cancellable`](crate::wait_cancellable),
/// [`detach`](crate::detach) and [`detach_with`](crate::detach_with)
/// are the same as calling these on `Bridge::default()`.
///
/// ```rust
/// use cu_bridge::{Bridge, Operation};
///
/// let runtime = tokio::runtime::Runtime::new().unwrap();
/// let bridge = Bridge::new(runtime.handle().clone());
/// let op = Operation::new(async { Ok("hello") });
/// assert_eq!(bridge.wait(op).unwrap(), "hello");
/// ```
#[derive(Debug, Default, Clone)]
pub struct Bridge<E = Background> {
    executor: E,
}

impl Bridge<Background> {
    /// Bridge using the default [`Background`] executor
    #[inline]
    pub const fn background() -> Self {
        Self {
            executor: Background,
        }
    }
}

impl<E: Executor> Bridge<E> {
    /// Bridge scheduling relay and observer units on `executor`
    #[inline]
    pub const fn new(executor: E) -> Self {
        Self { executor }
    }

    /// The executor units are scheduled on
    #[inline]
    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// Block until the operation finishes. See [`wait`](crate::wait)
    #[inline]
    pub fn wait<T: Send + 'static>(&self, op: Operation<T>) -> crate::Result<T> {
        crate::wait::wait_on(&self.executor, op, None)
    }

    /// Block until the operation finishes or `cancel` is triggered.
    /// See [`wait_cancellable`](crate::wait_cancellable)
    #[inline]
    pub fn wait_cancellable<T: Send + 'static>(
        &self,
        op: Operation<T>,
        cancel: &CancellationToken,
    ) -> crate::Result<T> {
        crate::wait::wait_on(&self.executor, op, Some(cancel))
    }

    /// Start the operation and discard its fault, if any. See [`detach`](crate::detach)
    #[inline]
    pub fn detach<T: Send + 'static>(&self, op: Operation<T>) -> crate::Result<()> {
        crate::detach::detach_on(
            &self.executor,
            op,
            None::<fn(&(dyn StdError + 'static))>,
        )
    }

    /// Start the operation and report its fault to `on_error`.
    /// See [`detach_with`](crate::detach_with)
    #[inline]
    pub fn detach_with<T, H>(&self, op: Operation<T>, on_error: H) -> crate::Result<()>
    where
        T: Send + 'static,
        H: FnOnce(&(dyn StdError + 'static)) + Send + 'static,
    {
        crate::detach::detach_on(&self.executor, op, Some(on_error))
    }
}
