use std::{fs::canonicalize, path::Path, process::Stdio, time::Duration};

use tokio::io::AsyncBufReadExt;
use tokio::process::{Child, Command};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::core::{config::Config, connect_params::ConnectParams, logger::DynLogger};

/// A `dagger session` child process. The session ends when its stdin is
/// closed; dropping the handle kills it.
#[derive(Debug)]
pub struct EngineProcess {
    child: Mutex<Child>,
    readers: Mutex<Vec<JoinHandle<()>>>,
}

impl EngineProcess {
    fn new(child: Child, readers: Vec<JoinHandle<()>>) -> Self {
        Self {
            child: Mutex::new(child),
            readers: Mutex::new(readers),
        }
    }

    /// Closes the session and waits until its remaining output has been
    /// forwarded to the logger.
    pub async fn shutdown(&self) -> eyre::Result<()> {
        let mut child = self.child.lock().await;

        drop(child.stdin.take());
        let status = child.wait().await?;
        tracing::debug!(status = %status, "dagger session exited");

        let readers = std::mem::take(&mut *self.readers.lock().await);
        for reader in readers {
            if let Err(e) = reader.await {
                tracing::warn!(error = %e, "dagger session output reader failed");
            }
        }

        Ok(())
    }
}

#[derive(Clone, Debug, Default)]
pub struct CliSession;

impl CliSession {
    pub fn new() -> Self {
        Self
    }

    pub async fn connect(
        &self,
        config: &Config,
        cli_path: &Path,
    ) -> eyre::Result<(ConnectParams, EngineProcess)> {
        let proc = self.start(config, cli_path)?;
        self.get_conn(proc, config).await
    }

    fn args(&self, config: &Config) -> eyre::Result<Vec<String>> {
        let mut args: Vec<String> = vec!["session".into()];
        if let Some(workspace) = &config.workdir_path {
            let abs_path = canonicalize(workspace)?;
            args.extend(["--workdir".into(), abs_path.to_string_lossy().to_string()])
        }
        if let Some(config_path) = &config.config_path {
            let abs_path = canonicalize(config_path)?;
            args.extend(["--project".into(), abs_path.to_string_lossy().to_string()])
        }

        args.extend(["--label".into(), "dagger.io/sdk.name:rust".into()]);
        args.extend([
            "--label".into(),
            format!("dagger.io/sdk.version:{}", env!("CARGO_PKG_VERSION")),
        ]);

        Ok(args)
    }

    fn start(&self, config: &Config, cli_path: &Path) -> eyre::Result<Child> {
        let args = self.args(config)?;

        tracing::debug!(cli = %cli_path.display(), ?args, "spawning dagger session");

        let proc = Command::new(cli_path)
            .args(args.as_slice())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        Ok(proc)
    }

    async fn get_conn(
        &self,
        mut proc: Child,
        config: &Config,
    ) -> eyre::Result<(ConnectParams, EngineProcess)> {
        let stdout = proc
            .stdout
            .take()
            .ok_or(eyre::eyre!("could not acquire stdout from child process"))?;

        let stderr = proc
            .stderr
            .take()
            .ok_or(eyre::eyre!("could not acquire stderr from child process"))?;

        let (sender, mut receiver) = tokio::sync::mpsc::channel(1);

        let logger = config.logger.clone();
        let stdout_reader = tokio::spawn(async move {
            let mut stdout_bufr = tokio::io::BufReader::new(stdout).lines();
            while let Ok(Some(line)) = stdout_bufr.next_line().await {
                if let Ok(conn) = serde_json::from_str::<ConnectParams>(&line) {
                    // the receiver is gone once a connection was made or timed out
                    let _ = sender.send(conn).await;
                    continue;
                }

                forward(&logger, &line, false);
            }
        });

        let logger = config.logger.clone();
        let stderr_reader = tokio::spawn(async move {
            let mut stderr_bufr = tokio::io::BufReader::new(stderr).lines();
            while let Ok(Some(line)) = stderr_bufr.next_line().await {
                forward(&logger, &line, true);
            }
        });

        let conn = tokio::time::timeout(Duration::from_millis(config.timeout_ms), receiver.recv())
            .await
            .map_err(|_| {
                eyre::eyre!(
                    "timed out after {}ms waiting for dagger session to start",
                    config.timeout_ms
                )
            })?
            .ok_or(eyre::eyre!(
                "could not receive ok signal from dagger-engine"
            ))?;

        Ok((
            conn,
            EngineProcess::new(proc, vec![stdout_reader, stderr_reader]),
        ))
    }
}

fn forward(logger: &Option<DynLogger>, line: &str, is_stderr: bool) {
    let Some(logger) = logger else {
        return;
    };

    let res = if is_stderr {
        logger.stderr(line)
    } else {
        logger.stdout(line)
    };

    if let Err(e) = res {
        tracing::warn!(error = %e, "failed to forward dagger session output");
    }
}

#[cfg(all(test, unix))]
mod tests {
    use std::os::unix::fs::PermissionsExt;
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex};

    use pretty_assertions::assert_eq;

    use super::CliSession;
    use crate::core::config::Config;
    use crate::core::connect_params::ConnectParams;
    use crate::core::logger::Logger;

    #[derive(Default)]
    struct CapturingLogger {
        lines: Mutex<Vec<String>>,
    }

    impl Logger for CapturingLogger {
        fn stdout(&self, output: &str) -> eyre::Result<()> {
            self.lines.lock().unwrap().push(format!("out: {output}"));
            Ok(())
        }

        fn stderr(&self, output: &str) -> eyre::Result<()> {
            self.lines.lock().unwrap().push(format!("err: {output}"));
            Ok(())
        }
    }

    fn fake_cli(dir: &tempfile::TempDir, script: &str) -> PathBuf {
        let path = dir.path().join("dagger");
        std::fs::write(&path, format!("#!/bin/sh\n{script}\n")).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[test]
    fn test_args_carry_sdk_labels() {
        let args = CliSession::new().args(&Config::default()).unwrap();

        assert_eq!(args[0], "session");
        assert!(args.contains(&"dagger.io/sdk.name:rust".to_string()));
        assert!(args
            .iter()
            .any(|a| a.starts_with("dagger.io/sdk.version:")));
    }

    #[tokio::test]
    async fn test_connect_reads_params_and_forwards_output() {
        let dir = tempfile::tempdir().unwrap();
        let cli = fake_cli(
            &dir,
            r#"echo "engine booting" >&2
echo '{"port":4321,"session_token":"secret"}'
cat > /dev/null"#,
        );

        let logger = Arc::new(CapturingLogger::default());
        let cfg = Config::default().with_logger(logger.clone());

        let (params, proc) = CliSession::new().connect(&cfg, &cli).await.unwrap();

        assert_eq!(params, ConnectParams::new(4321, "secret"));

        proc.shutdown().await.unwrap();

        assert_eq!(
            *logger.lines.lock().unwrap(),
            vec!["err: engine booting".to_string()]
        );
    }

    #[tokio::test]
    async fn test_connect_times_out() {
        let dir = tempfile::tempdir().unwrap();
        let cli = fake_cli(&dir, "sleep 5");

        let cfg = Config::new(None, None, Some(100), None, None);

        let err = CliSession::new().connect(&cfg, &cli).await.unwrap_err();

        assert!(err.to_string().contains("timed out"));
    }
}
