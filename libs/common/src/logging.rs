//! Tracing initialisation shared by the console binaries

use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Install the global tracing subscriber.
///
/// Log lines go to stderr so they never mix with command output on stdout.
/// `default_filter` applies when `RUST_LOG` is not set (e.g. `"warn"`).
pub fn init(default_filter: &str) -> Result<(), tracing::subscriber::SetGlobalDefaultError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
}
