//! Configuration repository port (interface).

use crate::config::Config;
use crate::error::Result;

/// Port for configuration persistence.
///
/// Operations edit a borrowed [`Config`] in memory and hand it to
/// [`save`](ConfigRepository::save) once, at the end of a successful run.
pub trait ConfigRepository: Send + Sync {
    /// Load the configuration. A missing file yields the default config.
    fn load(&self) -> impl std::future::Future<Output = Result<Config>> + Send;

    /// Persist the configuration.
    fn save(&self, config: &Config) -> impl std::future::Future<Output = Result<()>> + Send;
}
