use std::path::PathBuf;

use crate::core::DAGGER_ENGINE_VERSION;
use crate::core::{
    cli_session::{CliSession, EngineProcess},
    config::Config,
    connect_params::ConnectParams,
    downloader::Downloader,
};

const SESSION_PORT_ENV: &str = "DAGGER_SESSION_PORT";
const SESSION_TOKEN_ENV: &str = "DAGGER_SESSION_TOKEN";
const CLI_BIN_ENV: &str = "_EXPERIMENTAL_DAGGER_CLI_BIN";

#[derive(Default)]
pub struct Engine {}

impl Engine {
    pub fn new() -> Self {
        Self {}
    }

    /// Finds or starts an engine session. A process is returned only when
    /// this call spawned one.
    pub async fn start(
        &self,
        cfg: &Config,
    ) -> eyre::Result<(ConnectParams, Option<EngineProcess>)> {
        tracing::info!("starting dagger-engine");

        if let Some(conn) = session_from_env(
            std::env::var(SESSION_PORT_ENV).ok(),
            std::env::var(SESSION_TOKEN_ENV).ok(),
        )? {
            tracing::debug!(port = conn.port, "using existing dagger session");
            return Ok((conn, None));
        }

        let (conn, proc) = self.from_cli(cfg).await?;

        Ok((conn, Some(proc)))
    }

    async fn from_cli(&self, cfg: &Config) -> eyre::Result<(ConnectParams, EngineProcess)> {
        let cli = match std::env::var(CLI_BIN_ENV) {
            Ok(bin) if !bin.trim().is_empty() => PathBuf::from(bin),
            _ => {
                Downloader::new(DAGGER_ENGINE_VERSION.into())?
                    .get_cli()
                    .await?
            }
        };

        CliSession::new().connect(cfg, &cli).await
    }
}

fn session_from_env(
    port: Option<String>,
    token: Option<String>,
) -> eyre::Result<Option<ConnectParams>> {
    let Some(port) = port else {
        return Ok(None);
    };

    let port = port
        .trim()
        .parse::<u64>()
        .map_err(|e| eyre::eyre!("invalid {SESSION_PORT_ENV} {port:?}: {e}"))?;
    let token = token.ok_or(eyre::eyre!(
        "{SESSION_TOKEN_ENV} must be set together with {SESSION_PORT_ENV}"
    ))?;

    Ok(Some(ConnectParams::new(port, &token)))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::session_from_env;
    use crate::core::connect_params::ConnectParams;

    #[test]
    fn test_no_session_env() {
        assert_eq!(session_from_env(None, Some("t".into())).unwrap(), None);
    }

    #[test]
    fn test_session_env() {
        assert_eq!(
            session_from_env(Some("8080".into()), Some("t".into())).unwrap(),
            Some(ConnectParams::new(8080, "t"))
        );
    }

    #[test]
    fn test_session_env_invalid_port() {
        assert!(session_from_env(Some("http".into()), Some("t".into())).is_err());
    }

    #[test]
    fn test_session_env_missing_token() {
        assert!(session_from_env(Some("8080".into()), None).is_err());
    }
}
