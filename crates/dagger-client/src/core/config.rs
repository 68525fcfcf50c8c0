use std::path::PathBuf;

use crate::core::logger::DynLogger;

const DEFAULT_TIMEOUT_MS: u64 = 10 * 1000;

pub struct Config {
    /// Working directory handed to the engine session.
    pub workdir_path: Option<PathBuf>,
    /// Project (module) configuration handed to the engine session.
    pub config_path: Option<PathBuf>,
    /// How long to wait for a spawned session to report its connect params.
    pub timeout_ms: u64,
    /// Per-request timeout for GraphQL queries. Unbounded when unset.
    pub execute_timeout_ms: Option<u64>,
    pub logger: Option<DynLogger>,
}

impl Default for Config {
    fn default() -> Self {
        Self::new(None, None, None, None, None)
    }
}

impl Config {
    pub fn new(
        workdir_path: Option<PathBuf>,
        config_path: Option<PathBuf>,
        timeout_ms: Option<u64>,
        execute_timeout_ms: Option<u64>,
        logger: Option<DynLogger>,
    ) -> Self {
        Self {
            workdir_path,
            config_path,
            timeout_ms: timeout_ms.unwrap_or(DEFAULT_TIMEOUT_MS),
            execute_timeout_ms,
            logger,
        }
    }

    pub fn with_logger(mut self, logger: DynLogger) -> Self {
        self.logger = Some(logger);
        self
    }
}
