use tracing_subscriber::EnvFilter;

use crate::core::logger::{DynLogger, Logger};

/// Installs a fmt subscriber filtered by `RUST_LOG`, defaulting to `info`.
pub fn default_logging() -> eyre::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| eyre::eyre!(e))?;

    Ok(())
}

#[derive(Default)]
pub struct StdLogger {}

impl Logger for StdLogger {
    fn stdout(&self, output: &str) -> eyre::Result<()> {
        println!("{}", output);

        Ok(())
    }

    fn stderr(&self, output: &str) -> eyre::Result<()> {
        eprintln!("{}", output);

        Ok(())
    }
}

#[derive(Default)]
pub struct TracingLogger {}

impl Logger for TracingLogger {
    fn stdout(&self, output: &str) -> eyre::Result<()> {
        tracing::info!(output = output, "dagger-client");

        Ok(())
    }

    fn stderr(&self, output: &str) -> eyre::Result<()> {
        tracing::warn!(output = output, "dagger-client");

        Ok(())
    }
}

/// Fans output out to several loggers. Every logger sees every line; the
/// first failure is reported after all of them ran.
#[derive(Default)]
pub struct AggregateLogger {
    pub loggers: Vec<DynLogger>,
}

impl AggregateLogger {
    fn each(&self, f: impl Fn(&DynLogger) -> eyre::Result<()>) -> eyre::Result<()> {
        let mut first_err = None;
        for logger in &self.loggers {
            if let Err(e) = f(logger) {
                first_err.get_or_insert(e);
            }
        }

        match first_err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl Logger for AggregateLogger {
    fn stdout(&self, output: &str) -> eyre::Result<()> {
        self.each(|l| l.stdout(output))
    }

    fn stderr(&self, output: &str) -> eyre::Result<()> {
        self.each(|l| l.stderr(output))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use pretty_assertions::assert_eq;

    use super::AggregateLogger;
    use crate::core::logger::{DynLogger, Logger};

    #[derive(Default)]
    struct Recording(Mutex<Vec<String>>);

    impl Logger for Recording {
        fn stdout(&self, output: &str) -> eyre::Result<()> {
            self.0.lock().unwrap().push(output.to_string());
            Ok(())
        }

        fn stderr(&self, output: &str) -> eyre::Result<()> {
            self.0.lock().unwrap().push(format!("!{output}"));
            Ok(())
        }
    }

    struct Failing;

    impl Logger for Failing {
        fn stdout(&self, _output: &str) -> eyre::Result<()> {
            eyre::bail!("closed")
        }

        fn stderr(&self, _output: &str) -> eyre::Result<()> {
            eyre::bail!("closed")
        }
    }

    #[test]
    fn test_aggregate_reaches_every_logger() {
        let recording = Arc::new(Recording::default());
        let failing: DynLogger = Arc::new(Failing);
        let logger = AggregateLogger {
            loggers: vec![failing, recording.clone()],
        };

        assert!(logger.stdout("line").is_err());
        logger.stderr("oops").unwrap_err();

        assert_eq!(
            *recording.0.lock().unwrap(),
            vec!["line".to_string(), "!oops".to_string()]
        );
    }
}
