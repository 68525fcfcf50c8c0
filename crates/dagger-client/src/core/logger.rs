use std::sync::Arc;

/// Receives the output of a spawned engine session, one line at a time.
pub trait Logger {
    fn stdout(&self, output: &str) -> eyre::Result<()>;
    fn stderr(&self, output: &str) -> eyre::Result<()>;
}

pub type DynLogger = Arc<dyn Logger + Send + Sync>;
