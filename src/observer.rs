//! Load-progress reporting

use crate::error::ConfigError;
use std::path::Path;

/// Receives what the loaders want to tell someone: skipped sources and the
/// files that were actually read.
pub trait Observer {
    /// A source failed during a best-effort pass.
    fn loader_failed(&self, loader: &str, error: &ConfigError);

    /// A config file was opened and read.
    fn file_read(&self, path: &Path);
}

/// Default observer: forwards everything to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl Observer for TracingObserver {
    fn loader_failed(&self, loader: &str, error: &ConfigError) {
        if error.is_not_found() {
            tracing::debug!("Skipping {}: {}", loader, error);
        } else {
            tracing::warn!("Config source {} failed: {}", loader, error);
        }
    }

    fn file_read(&self, path: &Path) {
        tracing::info!("Read config file {}", path.display());
    }
}
