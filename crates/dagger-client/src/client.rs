use std::future::Future;
use std::sync::Arc;

use crate::api::Query;
use crate::core::cli_session::EngineProcess;
use crate::core::config::Config;
use crate::core::engine::Engine;
use crate::core::graphql_client::DefaultGraphQLClient;
use crate::errors::ConnectError;
use crate::logging::StdLogger;
use crate::querybuilder::query;

pub type DaggerConn = Query;

/// Connects to an engine with the default [`Config`], printing the session's
/// output to stdout/stderr.
pub async fn connect<F, Fut>(dagger: F) -> Result<(), ConnectError>
where
    F: FnOnce(DaggerConn) -> Fut + 'static,
    Fut: Future<Output = eyre::Result<()>> + 'static,
{
    let cfg = Config::default().with_logger(Arc::new(StdLogger::default()));

    connect_opts(cfg, dagger).await
}

/// Runs `dagger` against an engine session and closes the session once it
/// returns. A session started by this call is shut down even when `dagger`
/// fails.
pub async fn connect_opts<F, Fut>(cfg: Config, dagger: F) -> Result<(), ConnectError>
where
    F: FnOnce(DaggerConn) -> Fut + 'static,
    Fut: Future<Output = eyre::Result<()>> + 'static,
{
    let (conn, proc) = Engine::new()
        .start(&cfg)
        .await
        .map_err(ConnectError::FailedToConnect)?;
    let proc = proc.map(Arc::new);

    let graphql_client = match DefaultGraphQLClient::new(&conn, cfg.execute_timeout_ms) {
        Ok(c) => c,
        Err(e) => {
            let closed = shutdown(proc.as_deref()).await;
            return settle(Err(ConnectError::FailedToConnect(e.into())), closed);
        }
    };

    let conn = Query {
        proc: proc.clone(),
        selection: query(),
        graphql_client: Arc::new(graphql_client),
    };

    let res = dagger(conn).await.map_err(ConnectError::DaggerContext);
    let closed = shutdown(proc.as_deref()).await;

    settle(res, closed)
}

/// A failed session outranks a failed shutdown; the latter is only logged.
fn settle(
    res: Result<(), ConnectError>,
    closed: Result<(), ConnectError>,
) -> Result<(), ConnectError> {
    match (res, closed) {
        (Err(e), Err(close_err)) => {
            tracing::warn!(error = %close_err, "dagger session did not shut down cleanly");
            Err(e)
        }
        (Err(e), Ok(())) => Err(e),
        (Ok(()), closed) => closed,
    }
}

async fn shutdown(proc: Option<&EngineProcess>) -> Result<(), ConnectError> {
    let Some(proc) = proc else {
        return Ok(());
    };

    tracing::debug!("closing dagger session");

    proc.shutdown()
        .await
        .map_err(ConnectError::FailedToShutdown)
}
