use std::sync::Arc;

use tokio::sync::Semaphore;

use super::{Background, Executor};

/// Create a new [`Pool`] on the [`Background`] executor.
///
/// - If `capacity > 0`, then the pool will be created
///   with literally that number of permits (concurrency) available.
/// - If `capacity = 0`, then the pool will be created
///   with the number of logical processors on the system
///   using the `num_cpus` crate, minimum 1.
/// - if `capacity < 0`, then the pool will be created
///   with the number of logical processors on the system,
///   minus the specified amount, and minimum 1.
#[inline(always)]
pub fn pool(capacity: isize) -> Pool {
    Pool::with_executor(Background, capacity)
}

/// An executor that limits how many units run at the same time.
///
/// Each unit holds one permit from when it starts until it finishes. Units
/// scheduled while the pool is full are queued on the inner executor
/// and wait for a permit there, so scheduling never blocks.
///
/// The pool can be cloned and shared between threads. Dropping the pool does
/// not cancel units that are already scheduled.
///
/// A unit that blocks on another unit of the same pool holds its permit while
/// doing so. With every permit held this way, the pool never makes progress.
/// A cancellation token passed to [`Bridge::wait_cancellable`](crate::Bridge::wait_cancellable)
/// still unblocks the caller, since the caller watches the token itself.
///
/// ```rust
/// use cu_bridge::{Bridge, Operation};
///
/// let bridge = Bridge::new(cu_bridge::co::pool(2));
/// let value = bridge.wait(Operation::new(async { Ok(7) })).unwrap();
/// assert_eq!(value, 7);
/// ```
pub struct Pool<E = Background> {
    semaphore: Arc<Semaphore>,
    capacity: usize,
    executor: Arc<E>,
}

impl<E> Clone for Pool<E> {
    fn clone(&self) -> Self {
        Self {
            semaphore: Arc::clone(&self.semaphore),
            capacity: self.capacity,
            executor: Arc::clone(&self.executor),
        }
    }
}

impl<E: Executor> Pool<E> {
    /// Create a pool scheduling on `executor`, using the same
    /// capacity rules as [`pool`](function@pool)
    pub fn with_executor(executor: E, capacity: isize) -> Self {
        let capacity = super::resolve_capacity(capacity);
        Self {
            semaphore: Arc::new(Semaphore::new(capacity)),
            capacity,
            executor: Arc::new(executor),
        }
    }

    /// The number of units that can run at the same time
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The number of units that can start right now
    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }
}

impl<E: Executor> Executor for Pool<E> {
    fn execute<F>(&self, future: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.executor.execute(limited(Arc::clone(&self.semaphore), future));
    }
}

async fn limited<F>(semaphore: Arc<Semaphore>, future: F)
where
    F: Future<Output = ()>,
{
    // the semaphore is never closed
    let _permit = semaphore.acquire().await.ok();
    future.await;
}
