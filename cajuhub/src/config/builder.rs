//! Assembles the effective configuration from all sources.

use std::path::{Path, PathBuf};

use crate::config::environment::EnvironmentConfig;
use crate::config::loader::ConfigLoader;
use crate::config::merger::ConfigMerger;
use crate::config::schema::Config;
use crate::config::validator::ConfigValidator;
use crate::error::Result;

/// Builder for the effective [`Config`].
///
/// Layers, lowest precedence first: built-in defaults, the user config file,
/// `CAJUHUB_*` environment variables, then the programmatic override.
///
/// # Examples
///
/// ```
/// use cajuhub::config::{Config, ConfigBuilder};
///
/// let config = ConfigBuilder::new()
///     .skip_files()
///     .skip_env()
///     .with_config(Config { default_list_limit: Some(5), ..Default::default() })
///     .build()
///     .unwrap();
/// assert_eq!(config.default_list_limit(), 5);
/// ```
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    data_dir: Option<PathBuf>,
    skip_files: bool,
    skip_env: bool,
    overrides: Option<Config>,
}

impl ConfigBuilder {
    /// Creates a builder reading every source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads the config file from this directory instead of the resolved
    /// data directory.
    #[must_use]
    pub fn with_data_dir(mut self, dir: &Path) -> Self {
        self.data_dir = Some(dir.to_path_buf());
        self
    }

    /// Ignores configuration files.
    #[must_use]
    pub const fn skip_files(mut self) -> Self {
        self.skip_files = true;
        self
    }

    /// Ignores environment variables.
    #[must_use]
    pub const fn skip_env(mut self) -> Self {
        self.skip_env = true;
        self
    }

    /// Sets the highest-precedence layer.
    #[must_use]
    pub fn with_config(mut self, config: Config) -> Self {
        self.overrides = Some(config);
        self
    }

    /// Merges and validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if a source cannot be read or parsed, or if the
    /// merged result is invalid.
    pub fn build(self) -> Result<Config> {
        let mut layers = Vec::new();

        if !self.skip_files {
            if let Some(source) = ConfigLoader::load_user_config(self.data_dir.as_deref())? {
                layers.push(source.config);
            }
        }

        if !self.skip_env {
            let mut env = Config::default();
            EnvironmentConfig::apply_overrides(&mut env)?;
            layers.push(env);
        }

        if let Some(overrides) = self.overrides {
            layers.push(overrides);
        }

        let config = ConfigMerger::merge(&layers);
        ConfigValidator::validate(&config)?;
        Ok(config)
    }
}
