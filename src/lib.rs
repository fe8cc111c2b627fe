pub mod client;
pub mod error;
pub mod format;
pub mod geolookup;
pub mod models;
pub mod providers;
pub mod resolver;
pub mod runner;

use std::time::Duration;

pub use error::LookupError;
use geolookup::GeoLookup;
pub use models::{Location, Source};
pub use providers::{Provider, RemoteLocator};
pub use resolver::Resolver;
use runner::{Config, Locator, LookupRunner};

/// Initializes the logging system for the application.
///
/// This function configures the logging system with the specified verbosity level.
///
/// # Arguments
///
/// * `log_level`: The desired verbosity level for logging. Determines which log messages will be displayed.
///
/// # Returns
///
/// A result indicating the success or failure of the logging setup.
#[cfg(feature = "log")]
pub fn initialize_logging(log_level: log::LevelFilter) -> anyhow::Result<()> {
    stderrlog::new()
        .module(module_path!()) // Configures the module path for log messages.
        .show_module_names(true) // Enables module names in log output.
        .verbosity(log_level) // Sets the specified log verbosity level.
        .init()?; // Initializes the logger.
    Ok(())
}

/// Where to look addresses up, as chosen on the command line.
pub enum Backend {
    /// Query a remote provider over HTTP.
    Remote(Provider),
    /// Read an offline database from this path.
    Local(std::path::PathBuf),
}

/// Builds a runner for `backend`, threading `timeout` into every network operation.
///
/// The offline database, if any, is opened here once.
pub fn build_runner(
    backend: Backend,
    timeout: Duration,
    config: Config,
) -> anyhow::Result<LookupRunner> {
    let locator: Box<dyn Locator> = match backend {
        Backend::Remote(provider) => Box::new(RemoteLocator::new(provider, timeout)),
        Backend::Local(path) => Box::new(GeoLookup::open(path)?),
    };

    #[cfg(feature = "log")]
    log::debug!(
        "Using {} with a {:?} timeout and a {:?} delay",
        locator.source(),
        timeout,
        config.delay
    );
    Ok(LookupRunner::new(Resolver::new(timeout), locator, config))
}
