use derive_builder::Builder;

use crate::api::{load_objects, NetworkProtocol, PortForward, PortId, ServiceId, Void};
use crate::errors::DaggerError;

object!(
    /// A content-addressed service providing TCP connectivity.
    Service,
    ServiceId
);

object!(
    /// A port exposed by a container.
    Port,
    PortId
);

#[derive(Builder, Debug, PartialEq, Clone, Default)]
pub struct ServiceEndpointOpts {
    /// The exposed port number for the endpoint.
    #[builder(setter(into, strip_option), default)]
    pub port: Option<isize>,
    /// Return a URL with the given scheme, eg. http for http://
    #[builder(setter(into, strip_option), default)]
    pub scheme: Option<String>,
}

#[derive(Builder, Debug, PartialEq, Clone, Default)]
pub struct ServiceStopOpts {
    /// Immediately kill the service without waiting for a graceful exit.
    #[builder(setter(into, strip_option), default)]
    pub kill: Option<bool>,
}

#[derive(Builder, Debug, PartialEq, Clone, Default)]
pub struct ServiceUpOpts {
    /// Frontend/backend port mappings to forward. Frontend is the port
    /// accepting traffic on the host, backend is the service port.
    #[builder(setter(into, strip_option), default)]
    pub ports: Option<Vec<PortForward>>,
    /// Bind each tunnel port to a random port on the host.
    #[builder(setter(into, strip_option), default)]
    pub random: Option<bool>,
}

impl Service {
    /// Retrieves an endpoint that clients can use to reach this container.
    ///
    /// Without a port, the first exposed port is used. With a scheme, a URL
    /// is returned.
    pub async fn endpoint(&self) -> Result<String, DaggerError> {
        self.endpoint_opts(Default::default()).await
    }

    pub async fn endpoint_opts(&self, opts: ServiceEndpointOpts) -> Result<String, DaggerError> {
        let query = self
            .selection
            .select("endpoint")
            .arg_opt("port", opts.port)
            .arg_opt("scheme", opts.scheme);

        query.execute(&self.graphql_client).await
    }

    /// Retrieves a hostname which can be used by clients to reach this
    /// container.
    pub async fn hostname(&self) -> Result<String, DaggerError> {
        let query = self.selection.select("hostname");

        query.execute(&self.graphql_client).await
    }

    /// Retrieves the list of ports provided by the service.
    pub async fn ports(&self) -> Result<Vec<Port>, DaggerError> {
        load_objects(self, self.selection.select("ports")).await
    }

    /// Start the service and wait for its health checks to succeed.
    ///
    /// Services bound to a container do not need to be manually started.
    pub async fn start(&self) -> Result<Service, DaggerError> {
        let query = self.selection.select("start");
        query.execute::<ServiceId>(&self.graphql_client).await?;

        Ok(self.clone())
    }

    /// Stop the service.
    pub async fn stop(&self) -> Result<Service, DaggerError> {
        self.stop_opts(Default::default()).await
    }

    pub async fn stop_opts(&self, opts: ServiceStopOpts) -> Result<Service, DaggerError> {
        let query = self.selection.select("stop").arg_opt("kill", opts.kill);
        query.execute::<ServiceId>(&self.graphql_client).await?;

        Ok(self.clone())
    }

    /// Creates a tunnel that forwards traffic from the caller's network to
    /// this service.
    pub async fn up(&self) -> Result<Void, DaggerError> {
        self.up_opts(Default::default()).await
    }

    pub async fn up_opts(&self, opts: ServiceUpOpts) -> Result<Void, DaggerError> {
        let query = self
            .selection
            .select("up")
            .arg_opt("ports", opts.ports)
            .arg_opt("random", opts.random);

        query.execute(&self.graphql_client).await
    }
}

impl Port {
    pub async fn description(&self) -> Result<Option<String>, DaggerError> {
        let query = self.selection.select("description");

        query.execute(&self.graphql_client).await
    }

    pub async fn experimental_skip_healthcheck(&self) -> Result<bool, DaggerError> {
        let query = self.selection.select("experimentalSkipHealthcheck");

        query.execute(&self.graphql_client).await
    }

    pub async fn port(&self) -> Result<isize, DaggerError> {
        let query = self.selection.select("port");

        query.execute(&self.graphql_client).await
    }

    pub async fn protocol(&self) -> Result<NetworkProtocol, DaggerError> {
        let query = self.selection.select("protocol");

        query.execute(&self.graphql_client).await
    }
}
