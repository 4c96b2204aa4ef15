use std::sync::LazyLock;

use tokio::runtime::{Builder, Handle, Runtime};

use super::{Executor, config};

/// the multi-threaded, background runtime
static BACKGROUND_RUNTIME: LazyLock<Runtime> = LazyLock::new(|| {
    let config = config::current();
    let workers = config.worker_threads();
    crate::debug!(
        "starting background runtime with {workers} worker(s), thread name {:?}",
        config.thread_name
    );
    Builder::new_multi_thread()
        .worker_threads(workers)
        .thread_name(config.thread_name.clone())
        .enable_all()
        .build()
        .expect("cannot create background tokio runtime")
});

/// The default executor: a process-wide, multi-threaded `tokio` runtime
/// that is built on first use.
///
/// No thread that calls into the bridge is ever a part of this runtime
/// (unless it's one of the runtime's own workers), so blocking a caller
/// never starves the units scheduled here.
#[derive(Debug, Default, Clone, Copy)]
pub struct Background;

impl Background {
    /// Handle to the background runtime, starting it if needed
    pub fn handle(&self) -> &'static Handle {
        BACKGROUND_RUNTIME.handle()
    }
}

impl Executor for Background {
    #[inline]
    fn execute<F>(&self, future: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        drop(BACKGROUND_RUNTIME.spawn(future));
    }
}
