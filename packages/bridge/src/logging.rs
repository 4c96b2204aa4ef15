use std::io::Write as _;
use std::sync::OnceLock;

static LOG_FILTER: OnceLock<env_filter::Filter> = OnceLock::new();

/// Quickly initialize logging to stderr, for tests and small binaries.
///
/// The filter is parsed from the `RUST_LOG` environment variable, using the
/// same syntax as [`env_logger`](https://docs.rs/env_logger/latest/env_logger/#enabling-logging).
/// When `RUST_LOG` is not set (or empty), only `warn` and `error` messages
/// are printed.
///
/// Calling this more than once is fine. If another logger is already
/// installed, that logger is kept.
pub fn log_init() {
    let filter = LOG_FILTER.get_or_init(|| {
        let mut builder = env_filter::Builder::new();
        match std::env::var("RUST_LOG") {
            Ok(value) if !value.trim().is_empty() => {
                builder.parse(&value);
            }
            _ => {
                builder.filter_level(log::LevelFilter::Warn);
            }
        }
        builder.build()
    });

    struct LogImpl;
    impl log::Log for LogImpl {
        fn enabled(&self, metadata: &log::Metadata) -> bool {
            match LOG_FILTER.get() {
                Some(filter) => filter.enabled(metadata),
                None => false,
            }
        }

        fn log(&self, record: &log::Record) {
            let Some(filter) = LOG_FILTER.get() else {
                return;
            };
            if !filter.matches(record) {
                return;
            }
            let thread = std::thread::current();
            let thread = thread.name().unwrap_or("<unnamed>");
            let mut stderr = std::io::stderr().lock();
            let _ = writeln!(
                stderr,
                "[{}] [{thread}] {}: {}",
                record.level(),
                record.target(),
                record.args()
            );
        }

        fn flush(&self) {
            let _ = std::io::stderr().flush();
        }
    }

    if log::set_logger(&LogImpl).is_ok() {
        log::set_max_level(filter.filter());
    }
}
