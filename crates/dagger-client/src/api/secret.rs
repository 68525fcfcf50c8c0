use crate::api::{CacheVolumeId, SecretId, SocketId, TerminalId};
use crate::errors::DaggerError;

object!(
    /// A directory whose contents persist across runs.
    CacheVolume,
    CacheVolumeId
);

object!(
    /// A reference to a secret value, which can be handled more safely than
    /// the value itself.
    Secret,
    SecretId
);

object!(
    /// A Unix or TCP/IP socket that can be mounted into a container.
    Socket,
    SocketId
);

object!(
    /// An interactive terminal that clients can connect to.
    Terminal,
    TerminalId
);

impl Secret {
    /// The value of this secret.
    pub async fn plaintext(&self) -> Result<String, DaggerError> {
        let query = self.selection.select("plaintext");

        query.execute(&self.graphql_client).await
    }
}

impl Terminal {
    /// An http endpoint at which this terminal can be connected to over a
    /// websocket.
    pub async fn websocket_endpoint(&self) -> Result<String, DaggerError> {
        let query = self.selection.select("websocketEndpoint");

        query.execute(&self.graphql_client).await
    }
}
