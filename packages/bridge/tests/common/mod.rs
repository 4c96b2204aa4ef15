#![allow(dead_code)]

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use cu_bridge::co::Executor;
use tokio::runtime::{Builder, Runtime};
use tokio::task::JoinHandle;

/// Executor that counts scheduled units, and can wait for all of them
pub struct Counting {
    runtime: Runtime,
    scheduled: AtomicUsize,
    handles: Mutex<Vec<JoinHandle<()>>>,
}

impl Counting {
    pub fn new() -> Self {
        Self {
            runtime: Builder::new_multi_thread()
                .worker_threads(2)
                .enable_all()
                .build()
                .expect("failed to build test runtime"),
            scheduled: AtomicUsize::new(0),
            handles: Mutex::new(Vec::new()),
        }
    }

    /// Number of units scheduled so far
    pub fn scheduled(&self) -> usize {
        self.scheduled.load(Ordering::SeqCst)
    }

    /// Block until every scheduled unit is done, and return how many panicked
    pub fn drain(&self) -> usize {
        let handles = std::mem::take(&mut *self.handles.lock().unwrap());
        handles
            .into_iter()
            .map(|handle| self.runtime.block_on(handle))
            .filter(Result::is_err)
            .count()
    }

    pub fn runtime(&self) -> &Runtime {
        &self.runtime
    }
}

impl Executor for Counting {
    fn execute<F>(&self, future: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.scheduled.fetch_add(1, Ordering::SeqCst);
        let handle = self.runtime.spawn(future);
        self.handles.lock().unwrap().push(handle);
    }
}

#[derive(Debug, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("Oops!")]
pub struct Oops {
    pub code: u32,
}
