use std::fmt;

use thiserror::Error;

use crate::core::graphql_client::GraphQLError;

const EXEC_ERROR_TYPE: &str = "EXEC_ERROR";

#[derive(Error, Debug)]
pub enum ConnectError {
    #[error("failed to connect to dagger engine")]
    FailedToConnect(#[source] eyre::Error),
    #[error("failed to run the dagger context")]
    DaggerContext(#[source] eyre::Error),
    #[error("failed to shut down the dagger engine session")]
    FailedToShutdown(#[source] eyre::Error),
}

#[derive(Error, Debug)]
pub enum DaggerError {
    #[error("failed to parse input type")]
    Serialize(#[source] eyre::Error),
    #[error("failed to query dagger engine: {0}")]
    Query(#[source] GraphQLError),
    #[error(transparent)]
    Exec(ExecError),
    #[error("failed to unpack response")]
    Unpack(#[source] DaggerUnpackError),
    #[error("failed to download client")]
    DownloadClient(#[source] eyre::Error),
}

#[derive(Error, Debug)]
pub enum DaggerUnpackError {
    #[error("Too many nested objects inside graphql response")]
    TooManyNestedObjects,
    #[error("graphql response carried no data")]
    EmptyResponse,
    #[error("failed to deserialize response")]
    Deserialize(#[source] serde_json::Error),
}

/// A command run by the engine exited unsuccessfully.
#[derive(Debug, Clone)]
pub struct ExecError {
    pub cmd: Vec<String>,
    pub exit_code: i64,
    pub stdout: String,
    pub stderr: String,

    message: String,
    original: GraphQLError,
}

impl ExecError {
    /// The engine's error message, without the captured output.
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn original(&self) -> &GraphQLError {
        &self.original
    }
}

impl fmt::Display for ExecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)?;
        if !self.stdout.trim().is_empty() {
            write!(f, "\nStdout:\n{}", self.stdout)?;
        }
        if !self.stderr.trim().is_empty() {
            write!(f, "\nStderr:\n{}", self.stderr)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExecError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.original)
    }
}

/// Turns a query error into a more specific error type, if the engine
/// attached one. Returns `None` when the error should pass through as is.
///
/// Only the first GraphQL error is inspected. Extension fields of the wrong
/// type are skipped one by one.
pub fn custom_error(err: &GraphQLError) -> Option<ExecError> {
    let first = err.messages()?.first()?;
    let ext = first.extensions.as_ref()?;

    match ext.get("_type").and_then(|t| t.as_str()) {
        Some(EXEC_ERROR_TYPE) => {}
        _ => return None,
    }

    let exit_code = ext
        .get("exitCode")
        .and_then(|c| c.as_i64().or_else(|| c.as_f64().map(|f| f as i64)))
        .unwrap_or_default();

    let cmd = ext
        .get("cmd")
        .and_then(|c| c.as_array())
        .and_then(|args| {
            args.iter()
                .map(|a| a.as_str().map(str::to_string))
                .collect::<Option<Vec<_>>>()
        })
        .unwrap_or_default();

    let text = |key: &str| {
        ext.get(key)
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .unwrap_or_default()
    };

    Some(ExecError {
        cmd,
        exit_code,
        stdout: text("stdout"),
        stderr: text("stderr"),
        message: first.message.clone(),
        original: err.clone(),
    })
}
