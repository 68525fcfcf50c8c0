use derive_builder::Builder;

use crate::api::{Directory, File, Handle, HostId, PortForward, Secret, Service, Socket};

object!(
    /// Information about the host environment.
    Host,
    HostId
);

#[derive(Builder, Debug, PartialEq, Clone, Default)]
pub struct HostDirectoryOpts {
    /// Exclude artifacts that match the given pattern (e.g., ["node_modules/", ".git*"]).
    #[builder(setter(into, strip_option), default)]
    pub exclude: Option<Vec<String>>,
    /// Include only artifacts that match the given pattern (e.g., ["app/", "package.*"]).
    #[builder(setter(into, strip_option), default)]
    pub include: Option<Vec<String>>,
}

#[derive(Builder, Debug, PartialEq, Clone, Default)]
pub struct HostServiceOpts {
    /// Upstream host to forward traffic to.
    #[builder(setter(into, strip_option), default)]
    pub host: Option<String>,
}

#[derive(Builder, Debug, PartialEq, Clone, Default)]
pub struct HostTunnelOpts {
    /// Explicit port forwarding rules. A frontend of 0 lets the host choose
    /// a random port. Without rules every service port is forwarded.
    #[builder(setter(into, strip_option), default)]
    pub ports: Option<Vec<PortForward>>,
    /// Map each service port to the same port on the host.
    #[builder(setter(into, strip_option), default)]
    pub native: Option<bool>,
}

impl Host {
    /// Accesses a directory on the host.
    pub fn directory(&self, path: impl Into<String>) -> Directory {
        self.directory_opts(path, Default::default())
    }

    pub fn directory_opts(&self, path: impl Into<String>, opts: HostDirectoryOpts) -> Directory {
        let query = self
            .selection
            .select("directory")
            .arg("path", path.into())
            .arg_opt("exclude", opts.exclude)
            .arg_opt("include", opts.include);

        self.child(query)
    }

    /// Accesses a file on the host.
    pub fn file(&self, path: impl Into<String>) -> File {
        let query = self.selection.select("file").arg("path", path.into());

        self.child(query)
    }

    /// Creates a service that forwards traffic to a specified address via
    /// the host.
    pub fn service(&self, ports: Vec<PortForward>) -> Service {
        self.service_opts(ports, Default::default())
    }

    pub fn service_opts(&self, ports: Vec<PortForward>, opts: HostServiceOpts) -> Service {
        let query = self
            .selection
            .select("service")
            .arg("ports", ports)
            .arg_opt("host", opts.host);

        self.child(query)
    }

    /// Sets a secret given a user-defined name and the file path on the host,
    /// and returns the secret. The file is limited to a size of 512000 bytes.
    pub fn set_secret_file(&self, name: impl Into<String>, path: impl Into<String>) -> Secret {
        let query = self
            .selection
            .select("setSecretFile")
            .arg("name", name.into())
            .arg("path", path.into());

        self.child(query)
    }

    /// Creates a tunnel that forwards traffic from the host to a service.
    pub fn tunnel(&self, service: Service) -> Service {
        self.tunnel_opts(service, Default::default())
    }

    pub fn tunnel_opts(&self, service: Service, opts: HostTunnelOpts) -> Service {
        let query = self
            .selection
            .select("tunnel")
            .arg_object("service", service)
            .arg_opt("ports", opts.ports)
            .arg_opt("native", opts.native);

        self.child(query)
    }

    /// Accesses a Unix socket on the host.
    pub fn unix_socket(&self, path: impl Into<String>) -> Socket {
        let query = self
            .selection
            .select("unixSocket")
            .arg("path", path.into());

        self.child(query)
    }
}
