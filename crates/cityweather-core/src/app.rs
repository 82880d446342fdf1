use anyhow::{Context, Result};
use std::sync::Arc;

use crate::Config;

/// Main application state and lifecycle manager
pub struct App {
    config: Arc<Config>,
}

impl App {
    /// Create a new application instance from the on-disk configuration
    pub fn new() -> Result<Self> {
        let (config, _warnings) = Config::load_validated()?;
        Ok(Self::with_config(config))
    }

    /// Create an application around an already loaded configuration
    pub fn with_config(config: Config) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Prepare on-disk state (config directory) before services open their files
    pub fn initialize(&mut self) -> Result<()> {
        tracing::info!(
            "Initializing application in {}",
            self.config.config_dir.display()
        );

        std::fs::create_dir_all(&self.config.config_dir)
            .context("Failed to create application directory")?;

        tracing::info!(
            backend = ?self.config.storage.backend,
            path = %self.config.storage_path().display(),
            "Application initialized successfully"
        );
        Ok(())
    }

    /// Shutdown the application
    pub fn shutdown(&mut self) -> Result<()> {
        tracing::info!("Shutting down application");
        Ok(())
    }

    /// Get reference to application config
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Shared handle to the configuration
    pub fn shared_config(&self) -> Arc<Config> {
        self.config.clone()
    }
}
