use std::sync::OnceLock;

/// Environment variable for the number of background worker threads
pub const ENV_WORKERS: &str = "CU_BRIDGE_WORKERS";
/// Environment variable for the name of background worker threads
pub const ENV_THREAD_NAME: &str = "CU_BRIDGE_THREAD_NAME";

static CONFIG: OnceLock<Config> = OnceLock::new();

/// Configuration of the [`Background`](super::Background) runtime
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Number of worker threads.
    ///
    /// `> 0` is used literally, `0` means one per logical processor,
    /// and `< 0` means the number of logical processors minus that amount.
    /// There is always at least 1 worker.
    pub workers: isize,
    /// Name given to the worker threads
    pub thread_name: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            workers: if cfg!(feature = "heavy") { 0 } else { 1 },
            thread_name: "cu-bridge".to_string(),
        }
    }
}

impl Config {
    /// The default config, with overrides from the environment.
    ///
    /// Reads `CU_BRIDGE_WORKERS` and `CU_BRIDGE_THREAD_NAME`. Invalid or
    /// empty values are ignored with a warning.
    pub fn from_env() -> Self {
        Self::default().with_overrides(
            std::env::var(ENV_WORKERS).ok().as_deref(),
            std::env::var(ENV_THREAD_NAME).ok().as_deref(),
        )
    }

    /// Apply overrides given as raw strings, as they would be read
    /// from the environment
    pub fn with_overrides(mut self, workers: Option<&str>, thread_name: Option<&str>) -> Self {
        if let Some(value) = workers.map(str::trim)
            && !value.is_empty()
        {
            match value.parse::<isize>() {
                Ok(n) => self.workers = n,
                Err(e) => crate::warn!("ignoring invalid {ENV_WORKERS}={value:?}: {e}"),
            }
        }
        if let Some(value) = thread_name.map(str::trim)
            && !value.is_empty()
        {
            self.thread_name = value.to_string();
        }
        self
    }

    /// The actual number of worker threads this config will create
    pub fn worker_threads(&self) -> usize {
        super::resolve_capacity(self.workers)
    }
}

/// Set the configuration of the background runtime.
///
/// This must be called before the background runtime is used for the first time,
/// i.e. before the first slow-path [`wait`](crate::wait) or [`detach`](crate::detach)
/// with the default executor. Returns an error if the runtime was already configured.
///
/// ```rust
/// use cu_bridge::co;
///
/// co::configure(co::Config {
///     workers: 2,
///     thread_name: "my-relay".to_string(),
/// }).unwrap();
/// assert!(co::configure(co::Config::default()).is_err());
/// ```
pub fn configure(config: Config) -> crate::Result<()> {
    if let Err(config) = CONFIG.set(config) {
        crate::bail!(
            "background runtime is already configured (workers: {}), cannot apply {config:?}",
            current().workers
        );
    }
    Ok(())
}

/// The effective config, initialized from the environment if not configured
pub(crate) fn current() -> &'static Config {
    CONFIG.get_or_init(Config::from_env)
}
