use derive_builder::Builder;

use crate::api::{
    load_objects, strings, BuildArg, CacheSharingMode, CacheVolume, ContainerId, Directory,
    EnvVariable, File, Handle, ImageLayerCompression, ImageMediaTypes, Label, NetworkProtocol,
    PipelineLabel, Platform, Port, Secret, Service, Socket, Terminal,
};
use crate::errors::DaggerError;

object!(
    /// An OCI-compatible container, also known as a Docker container.
    Container,
    ContainerId
);

#[derive(Builder, Debug, Clone, Default)]
pub struct ContainerAsTarballOpts {
    /// Identifiers for other platform specific containers, for multi-platform
    /// images.
    #[builder(setter(into, strip_option), default)]
    pub platform_variants: Option<Vec<Container>>,
    /// Force each layer of the image to use the specified compression
    /// algorithm.
    #[builder(setter(into, strip_option), default)]
    pub forced_compression: Option<ImageLayerCompression>,
    /// Use the specified media types for the image's layers. Defaults to OCI.
    #[builder(setter(into, strip_option), default)]
    pub media_types: Option<ImageMediaTypes>,
}

#[derive(Builder, Debug, Clone, Default)]
pub struct ContainerBuildOpts {
    /// Path to the Dockerfile to use.
    #[builder(setter(into, strip_option), default)]
    pub dockerfile: Option<String>,
    /// Target build stage to build.
    #[builder(setter(into, strip_option), default)]
    pub target: Option<String>,
    #[builder(setter(into, strip_option), default)]
    pub build_args: Option<Vec<BuildArg>>,
    /// Secrets to pass to the build, mounted at `/run/secrets/[secret-name]`.
    #[builder(setter(into, strip_option), default)]
    pub secrets: Option<Vec<Secret>>,
}

pub type ContainerExportOpts = ContainerAsTarballOpts;
pub type ContainerPublishOpts = ContainerAsTarballOpts;

#[derive(Builder, Debug, PartialEq, Clone, Default)]
pub struct ContainerImportOpts {
    /// Identifies the tag to import from the archive, if the archive bundles
    /// multiple tags.
    #[builder(setter(into, strip_option), default)]
    pub tag: Option<String>,
}

#[derive(Builder, Debug, PartialEq, Clone, Default)]
pub struct ContainerPipelineOpts {
    #[builder(setter(into, strip_option), default)]
    pub description: Option<String>,
    #[builder(setter(into, strip_option), default)]
    pub labels: Option<Vec<PipelineLabel>>,
}

#[derive(Builder, Debug, PartialEq, Clone, Default)]
pub struct ContainerTerminalOpts {
    /// Override the container's default terminal command.
    #[builder(setter(into, strip_option), default)]
    pub cmd: Option<Vec<String>>,
}

#[derive(Builder, Debug, PartialEq, Clone, Default)]
pub struct ContainerWithDirectoryOpts {
    /// Patterns to exclude in the written directory (e.g. ["node_modules/**", ".gitignore", ".git/"]).
    #[builder(setter(into, strip_option), default)]
    pub exclude: Option<Vec<String>>,
    /// Patterns to include in the written directory (e.g. ["*.go", "go.mod", "go.sum"]).
    #[builder(setter(into, strip_option), default)]
    pub include: Option<Vec<String>>,
    /// A user:group to set for the directory and its contents.
    #[builder(setter(into, strip_option), default)]
    pub owner: Option<String>,
}

#[derive(Builder, Debug, PartialEq, Clone, Default)]
pub struct ContainerWithEntrypointOpts {
    /// Don't remove the default arguments when setting the entrypoint.
    #[builder(setter(into, strip_option), default)]
    pub keep_default_args: Option<bool>,
}

pub type ContainerWithoutEntrypointOpts = ContainerWithEntrypointOpts;

#[derive(Builder, Debug, PartialEq, Clone, Default)]
pub struct ContainerWithEnvVariableOpts {
    /// Replace `${VAR}` or `$VAR` in the value according to the current
    /// environment variables defined in the container.
    #[builder(setter(into, strip_option), default)]
    pub expand: Option<bool>,
}

#[derive(Builder, Debug, PartialEq, Clone, Default)]
pub struct ContainerWithExecOpts {
    /// If the container has an entrypoint, ignore it for args rather than
    /// using it to wrap them.
    #[builder(setter(into, strip_option), default)]
    pub skip_entrypoint: Option<bool>,
    /// Content to write to the command's standard input before closing.
    #[builder(setter(into, strip_option), default)]
    pub stdin: Option<String>,
    /// Redirect the command's standard output to a file in the container.
    #[builder(setter(into, strip_option), default)]
    pub redirect_stdout: Option<String>,
    /// Redirect the command's standard error to a file in the container.
    #[builder(setter(into, strip_option), default)]
    pub redirect_stderr: Option<String>,
    /// Provides dagger access to the executed command. The command is
    /// granted full access to the host filesystem.
    #[builder(setter(into, strip_option), default)]
    pub experimental_privileged_nesting: Option<bool>,
    /// Execute the command with all root capabilities.
    #[builder(setter(into, strip_option), default)]
    pub insecure_root_capabilities: Option<bool>,
}

#[derive(Builder, Debug, PartialEq, Clone, Default)]
pub struct ContainerWithExposedPortOpts {
    #[builder(setter(into, strip_option), default)]
    pub protocol: Option<NetworkProtocol>,
    #[builder(setter(into, strip_option), default)]
    pub description: Option<String>,
    /// Skip the health check when run as a service.
    #[builder(setter(into, strip_option), default)]
    pub experimental_skip_healthcheck: Option<bool>,
}

#[derive(Builder, Debug, PartialEq, Clone, Default)]
pub struct ContainerWithoutExposedPortOpts {
    #[builder(setter(into, strip_option), default)]
    pub protocol: Option<NetworkProtocol>,
}

#[derive(Builder, Debug, PartialEq, Clone, Default)]
pub struct ContainerWithFileOpts {
    /// Permission given to the copied file (e.g., 0600).
    #[builder(setter(into, strip_option), default)]
    pub permissions: Option<isize>,
    #[builder(setter(into, strip_option), default)]
    pub owner: Option<String>,
}

pub type ContainerWithFilesOpts = ContainerWithFileOpts;

#[derive(Builder, Debug, Clone, Default)]
pub struct ContainerWithMountedCacheOpts {
    /// Directory to use as the cache volume's root.
    #[builder(setter(into, strip_option), default)]
    pub source: Option<Directory>,
    #[builder(setter(into, strip_option), default)]
    pub sharing: Option<CacheSharingMode>,
    /// A user:group to set for the mounted cache directory. Has no effect
    /// once the cache exists.
    #[builder(setter(into, strip_option), default)]
    pub owner: Option<String>,
}

#[derive(Builder, Debug, PartialEq, Clone, Default)]
pub struct ContainerWithOwnerOpts {
    /// A user:group to set for the mounted content.
    #[builder(setter(into, strip_option), default)]
    pub owner: Option<String>,
}

pub type ContainerWithMountedDirectoryOpts = ContainerWithOwnerOpts;
pub type ContainerWithMountedFileOpts = ContainerWithOwnerOpts;
pub type ContainerWithUnixSocketOpts = ContainerWithOwnerOpts;

#[derive(Builder, Debug, PartialEq, Clone, Default)]
pub struct ContainerWithMountedSecretOpts {
    #[builder(setter(into, strip_option), default)]
    pub owner: Option<String>,
    /// Permission given to the mounted secret (e.g., 0600). Requires an
    /// owner.
    #[builder(setter(into, strip_option), default)]
    pub mode: Option<isize>,
}

#[derive(Builder, Debug, PartialEq, Clone, Default)]
pub struct ContainerWithNewFileOpts {
    #[builder(setter(into, strip_option), default)]
    pub contents: Option<String>,
    #[builder(setter(into, strip_option), default)]
    pub permissions: Option<isize>,
    #[builder(setter(into, strip_option), default)]
    pub owner: Option<String>,
}

impl Container {
    /// Turn the container into a Service. Be sure to set any exposed ports
    /// before this conversion.
    pub fn as_service(&self) -> Service {
        self.child(self.selection.select("asService"))
    }

    /// Returns a File representing the container serialized to a tarball.
    pub fn as_tarball(&self) -> File {
        self.as_tarball_opts(Default::default())
    }

    pub fn as_tarball_opts(&self, opts: ContainerAsTarballOpts) -> File {
        let mut query = self.selection.select("asTarball");
        if let Some(platform_variants) = opts.platform_variants.filter(|v| !v.is_empty()) {
            query = query.arg_objects("platformVariants", platform_variants);
        }
        if let Some(forced_compression) = opts.forced_compression {
            query = query.arg_enum("forcedCompression", forced_compression);
        }
        if let Some(media_types) = opts.media_types {
            query = query.arg_enum("mediaTypes", media_types);
        }

        self.child(query)
    }

    /// Initializes this container from a Dockerfile build.
    pub fn build(&self, context: Directory) -> Container {
        self.build_opts(context, Default::default())
    }

    pub fn build_opts(&self, context: Directory, opts: ContainerBuildOpts) -> Container {
        let mut query = self
            .selection
            .select("build")
            .arg_object("context", context)
            .arg_opt("dockerfile", opts.dockerfile)
            .arg_opt("target", opts.target)
            .arg_opt("buildArgs", opts.build_args);
        if let Some(secrets) = opts.secrets.filter(|v| !v.is_empty()) {
            query = query.arg_objects("secrets", secrets);
        }

        self.child(query)
    }

    /// Retrieves default arguments for future commands.
    pub async fn default_args(&self) -> Result<Vec<String>, DaggerError> {
        let query = self.selection.select("defaultArgs");

        query.execute(&self.graphql_client).await
    }

    /// Retrieves a directory at the given path. Mounts are included.
    pub fn directory(&self, path: impl Into<String>) -> Directory {
        let query = self.selection.select("directory").arg("path", path.into());

        self.child(query)
    }

    /// Retrieves entrypoint to be prepended to the arguments of all commands.
    pub async fn entrypoint(&self) -> Result<Vec<String>, DaggerError> {
        let query = self.selection.select("entrypoint");

        query.execute(&self.graphql_client).await
    }

    /// Retrieves the value of the specified environment variable, `None` when
    /// it is unset.
    pub async fn env_variable(
        &self,
        name: impl Into<String>,
    ) -> Result<Option<String>, DaggerError> {
        let query = self
            .selection
            .select("envVariable")
            .arg("name", name.into());

        query.execute(&self.graphql_client).await
    }

    /// Retrieves the list of environment variables passed to commands.
    pub async fn env_variables(&self) -> Result<Vec<EnvVariable>, DaggerError> {
        load_objects(self, self.selection.select("envVariables")).await
    }

    /// Configures all available GPUs on the host to be accessible to this
    /// container. Experimental, Nvidia devices only.
    pub fn experimental_with_all_gpus(&self) -> Container {
        self.child(self.selection.select("experimentalWithAllGPUs"))
    }

    /// Configures the provided list of devices to be accessible to this
    /// container. Experimental, Nvidia devices only.
    pub fn experimental_with_gpu(&self, devices: Vec<impl Into<String>>) -> Container {
        let query = self
            .selection
            .select("experimentalWithGPU")
            .arg("devices", strings(devices));

        self.child(query)
    }

    /// Writes the container as an OCI tarball to the destination file path
    /// on the host.
    pub async fn export(&self, path: impl Into<String>) -> Result<bool, DaggerError> {
        self.export_opts(path, Default::default()).await
    }

    pub async fn export_opts(
        &self,
        path: impl Into<String>,
        opts: ContainerExportOpts,
    ) -> Result<bool, DaggerError> {
        let mut query = self.selection.select("export").arg("path", path.into());
        if let Some(platform_variants) = opts.platform_variants.filter(|v| !v.is_empty()) {
            query = query.arg_objects("platformVariants", platform_variants);
        }
        if let Some(forced_compression) = opts.forced_compression {
            query = query.arg_enum("forcedCompression", forced_compression);
        }
        if let Some(media_types) = opts.media_types {
            query = query.arg_enum("mediaTypes", media_types);
        }

        query.execute(&self.graphql_client).await
    }

    /// Retrieves the list of exposed ports.
    pub async fn exposed_ports(&self) -> Result<Vec<Port>, DaggerError> {
        load_objects(self, self.selection.select("exposedPorts")).await
    }

    /// Retrieves a file at the given path. Mounts are included.
    pub fn file(&self, path: impl Into<String>) -> File {
        let query = self.selection.select("file").arg("path", path.into());

        self.child(query)
    }

    /// Initializes this container from a pulled base image.
    pub fn from(&self, address: impl Into<String>) -> Container {
        let query = self.selection.select("from").arg("address", address.into());

        self.child(query)
    }

    /// The unique image reference which can only be retrieved immediately
    /// after the `from` call.
    pub async fn image_ref(&self) -> Result<String, DaggerError> {
        let query = self.selection.select("imageRef");

        query.execute(&self.graphql_client).await
    }

    /// Reads the container from an OCI tarball.
    pub fn import(&self, source: File) -> Container {
        self.import_opts(source, Default::default())
    }

    pub fn import_opts(&self, source: File, opts: ContainerImportOpts) -> Container {
        let query = self
            .selection
            .select("import")
            .arg_object("source", source)
            .arg_opt("tag", opts.tag);

        self.child(query)
    }

    /// Retrieves the value of the specified label.
    pub async fn label(&self, name: impl Into<String>) -> Result<Option<String>, DaggerError> {
        let query = self.selection.select("label").arg("name", name.into());

        query.execute(&self.graphql_client).await
    }

    /// Retrieves the list of labels passed to container.
    pub async fn labels(&self) -> Result<Vec<Label>, DaggerError> {
        load_objects(self, self.selection.select("labels")).await
    }

    /// Retrieves the list of paths where a directory is mounted.
    pub async fn mounts(&self) -> Result<Vec<String>, DaggerError> {
        let query = self.selection.select("mounts");

        query.execute(&self.graphql_client).await
    }

    /// Creates a named sub-pipeline.
    pub fn pipeline(&self, name: impl Into<String>) -> Container {
        self.pipeline_opts(name, Default::default())
    }

    pub fn pipeline_opts(&self, name: impl Into<String>, opts: ContainerPipelineOpts) -> Container {
        let query = self
            .selection
            .select("pipeline")
            .arg("name", name.into())
            .arg_opt("description", opts.description)
            .arg_opt("labels", opts.labels);

        self.child(query)
    }

    /// The platform this container executes and publishes as.
    pub async fn platform(&self) -> Result<Platform, DaggerError> {
        let query = self.selection.select("platform");

        query.execute(&self.graphql_client).await
    }

    /// Publishes this container as a new image to the specified address.
    /// Returns a fully qualified ref.
    pub async fn publish(&self, address: impl Into<String>) -> Result<String, DaggerError> {
        self.publish_opts(address, Default::default()).await
    }

    pub async fn publish_opts(
        &self,
        address: impl Into<String>,
        opts: ContainerPublishOpts,
    ) -> Result<String, DaggerError> {
        let mut query = self
            .selection
            .select("publish")
            .arg("address", address.into());
        if let Some(platform_variants) = opts.platform_variants.filter(|v| !v.is_empty()) {
            query = query.arg_objects("platformVariants", platform_variants);
        }
        if let Some(forced_compression) = opts.forced_compression {
            query = query.arg_enum("forcedCompression", forced_compression);
        }
        if let Some(media_types) = opts.media_types {
            query = query.arg_enum("mediaTypes", media_types);
        }

        query.execute(&self.graphql_client).await
    }

    /// Retrieves this container's root filesystem. Mounts are not included.
    pub fn rootfs(&self) -> Directory {
        self.child(self.selection.select("rootfs"))
    }

    /// The error stream of the last executed command. Fails if no command
    /// has been executed.
    pub async fn stderr(&self) -> Result<String, DaggerError> {
        let query = self.selection.select("stderr");

        query.execute(&self.graphql_client).await
    }

    /// The output stream of the last executed command. Fails if no command
    /// has been executed.
    pub async fn stdout(&self) -> Result<String, DaggerError> {
        let query = self.selection.select("stdout");

        query.execute(&self.graphql_client).await
    }

    /// Forces evaluation of the pipeline in the engine.
    pub async fn sync(&self) -> Result<Container, DaggerError> {
        let query = self.selection.select("sync");
        query.execute::<ContainerId>(&self.graphql_client).await?;

        Ok(self.clone())
    }

    /// Return an interactive terminal for this container.
    pub fn terminal(&self) -> Terminal {
        self.terminal_opts(Default::default())
    }

    pub fn terminal_opts(&self, opts: ContainerTerminalOpts) -> Terminal {
        let query = self.selection.select("terminal").arg_opt("cmd", opts.cmd);

        self.child(query)
    }

    /// Retrieves the user to be set for all commands.
    pub async fn user(&self) -> Result<String, DaggerError> {
        let query = self.selection.select("user");

        query.execute(&self.graphql_client).await
    }

    /// Configures default arguments for future commands.
    pub fn with_default_args(&self, args: Vec<impl Into<String>>) -> Container {
        let query = self
            .selection
            .select("withDefaultArgs")
            .arg("args", strings(args));

        self.child(query)
    }

    /// Set the default command to invoke for the `terminal` API.
    pub fn with_default_terminal_cmd(&self, args: Vec<impl Into<String>>) -> Container {
        let query = self
            .selection
            .select("withDefaultTerminalCmd")
            .arg("args", strings(args));

        self.child(query)
    }

    /// Retrieves this container plus a directory written at the given path.
    pub fn with_directory(&self, path: impl Into<String>, directory: Directory) -> Container {
        self.with_directory_opts(path, directory, Default::default())
    }

    pub fn with_directory_opts(
        &self,
        path: impl Into<String>,
        directory: Directory,
        opts: ContainerWithDirectoryOpts,
    ) -> Container {
        let query = self
            .selection
            .select("withDirectory")
            .arg("path", path.into())
            .arg_object("directory", directory)
            .arg_opt("exclude", opts.exclude)
            .arg_opt("include", opts.include)
            .arg_opt("owner", opts.owner);

        self.child(query)
    }

    /// Retrieves this container but with a different command entrypoint.
    pub fn with_entrypoint(&self, args: Vec<impl Into<String>>) -> Container {
        self.with_entrypoint_opts(args, Default::default())
    }

    pub fn with_entrypoint_opts(
        &self,
        args: Vec<impl Into<String>>,
        opts: ContainerWithEntrypointOpts,
    ) -> Container {
        let query = self
            .selection
            .select("withEntrypoint")
            .arg("args", strings(args))
            .arg_opt("keepDefaultArgs", opts.keep_default_args);

        self.child(query)
    }

    /// Retrieves this container plus the given environment variable.
    pub fn with_env_variable(
        &self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Container {
        self.with_env_variable_opts(name, value, Default::default())
    }

    pub fn with_env_variable_opts(
        &self,
        name: impl Into<String>,
        value: impl Into<String>,
        opts: ContainerWithEnvVariableOpts,
    ) -> Container {
        let query = self
            .selection
            .select("withEnvVariable")
            .arg("name", name.into())
            .arg("value", value.into())
            .arg_opt("expand", opts.expand);

        self.child(query)
    }

    /// Retrieves this container after executing the specified command inside
    /// it.
    ///
    /// # Arguments
    ///
    /// * `args` - Command to run instead of the container's default command
    ///   (e.g., ["run", "main.go"]). If empty, the container's default
    ///   command is used.
    pub fn with_exec(&self, args: Vec<impl Into<String>>) -> Container {
        self.with_exec_opts(args, Default::default())
    }

    pub fn with_exec_opts(
        &self,
        args: Vec<impl Into<String>>,
        opts: ContainerWithExecOpts,
    ) -> Container {
        let query = self
            .selection
            .select("withExec")
            .arg("args", strings(args))
            .arg_opt("skipEntrypoint", opts.skip_entrypoint)
            .arg_opt("stdin", opts.stdin)
            .arg_opt("redirectStdout", opts.redirect_stdout)
            .arg_opt("redirectStderr", opts.redirect_stderr)
            .arg_opt(
                "experimentalPrivilegedNesting",
                opts.experimental_privileged_nesting,
            )
            .arg_opt("insecureRootCapabilities", opts.insecure_root_capabilities);

        self.child(query)
    }

    /// Expose a network port, for health checks when running as a service
    /// and for the EXPOSE OCI field when publishing.
    pub fn with_exposed_port(&self, port: isize) -> Container {
        self.with_exposed_port_opts(port, Default::default())
    }

    pub fn with_exposed_port_opts(
        &self,
        port: isize,
        opts: ContainerWithExposedPortOpts,
    ) -> Container {
        let mut query = self.selection.select("withExposedPort").arg("port", port);
        if let Some(protocol) = opts.protocol {
            query = query.arg_enum("protocol", protocol);
        }
        query = query
            .arg_opt("description", opts.description)
            .arg_opt(
                "experimentalSkipHealthcheck",
                opts.experimental_skip_healthcheck,
            );

        self.child(query)
    }

    /// Retrieves this container plus the contents of the given file copied
    /// to the given path.
    pub fn with_file(&self, path: impl Into<String>, source: File) -> Container {
        self.with_file_opts(path, source, Default::default())
    }

    pub fn with_file_opts(
        &self,
        path: impl Into<String>,
        source: File,
        opts: ContainerWithFileOpts,
    ) -> Container {
        let query = self
            .selection
            .select("withFile")
            .arg("path", path.into())
            .arg_object("source", source)
            .arg_opt("permissions", opts.permissions)
            .arg_opt("owner", opts.owner);

        self.child(query)
    }

    /// Retrieves this container plus the contents of the given files copied
    /// to the given path.
    pub fn with_files(&self, path: impl Into<String>, sources: Vec<File>) -> Container {
        self.with_files_opts(path, sources, Default::default())
    }

    pub fn with_files_opts(
        &self,
        path: impl Into<String>,
        sources: Vec<File>,
        opts: ContainerWithFilesOpts,
    ) -> Container {
        let query = self
            .selection
            .select("withFiles")
            .arg("path", path.into())
            .arg_objects("sources", sources)
            .arg_opt("permissions", opts.permissions)
            .arg_opt("owner", opts.owner);

        self.child(query)
    }

    /// Indicate that subsequent operations should be featured more
    /// prominently in the UI.
    pub fn with_focus(&self) -> Container {
        self.child(self.selection.select("withFocus"))
    }

    /// Retrieves this container plus the given label.
    pub fn with_label(&self, name: impl Into<String>, value: impl Into<String>) -> Container {
        let query = self
            .selection
            .select("withLabel")
            .arg("name", name.into())
            .arg("value", value.into());

        self.child(query)
    }

    /// Retrieves this container plus a cache volume mounted at the given
    /// path.
    pub fn with_mounted_cache(&self, path: impl Into<String>, cache: CacheVolume) -> Container {
        self.with_mounted_cache_opts(path, cache, Default::default())
    }

    pub fn with_mounted_cache_opts(
        &self,
        path: impl Into<String>,
        cache: CacheVolume,
        opts: ContainerWithMountedCacheOpts,
    ) -> Container {
        let mut query = self
            .selection
            .select("withMountedCache")
            .arg("path", path.into())
            .arg_object("cache", cache);
        if let Some(source) = opts.source {
            query = query.arg_object("source", source);
        }
        if let Some(sharing) = opts.sharing {
            query = query.arg_enum("sharing", sharing);
        }
        query = query.arg_opt("owner", opts.owner);

        self.child(query)
    }

    /// Retrieves this container plus a directory mounted at the given path.
    pub fn with_mounted_directory(&self, path: impl Into<String>, source: Directory) -> Container {
        self.with_mounted_directory_opts(path, source, Default::default())
    }

    pub fn with_mounted_directory_opts(
        &self,
        path: impl Into<String>,
        source: Directory,
        opts: ContainerWithMountedDirectoryOpts,
    ) -> Container {
        let query = self
            .selection
            .select("withMountedDirectory")
            .arg("path", path.into())
            .arg_object("source", source)
            .arg_opt("owner", opts.owner);

        self.child(query)
    }

    /// Retrieves this container plus a file mounted at the given path.
    pub fn with_mounted_file(&self, path: impl Into<String>, source: File) -> Container {
        self.with_mounted_file_opts(path, source, Default::default())
    }

    pub fn with_mounted_file_opts(
        &self,
        path: impl Into<String>,
        source: File,
        opts: ContainerWithMountedFileOpts,
    ) -> Container {
        let query = self
            .selection
            .select("withMountedFile")
            .arg("path", path.into())
            .arg_object("source", source)
            .arg_opt("owner", opts.owner);

        self.child(query)
    }

    /// Retrieves this container plus a secret mounted into a file at the
    /// given path.
    pub fn with_mounted_secret(&self, path: impl Into<String>, source: Secret) -> Container {
        self.with_mounted_secret_opts(path, source, Default::default())
    }

    pub fn with_mounted_secret_opts(
        &self,
        path: impl Into<String>,
        source: Secret,
        opts: ContainerWithMountedSecretOpts,
    ) -> Container {
        let query = self
            .selection
            .select("withMountedSecret")
            .arg("path", path.into())
            .arg_object("source", source)
            .arg_opt("owner", opts.owner)
            .arg_opt("mode", opts.mode);

        self.child(query)
    }

    /// Retrieves this container plus a temporary directory mounted at the
    /// given path.
    pub fn with_mounted_temp(&self, path: impl Into<String>) -> Container {
        let query = self
            .selection
            .select("withMountedTemp")
            .arg("path", path.into());

        self.child(query)
    }

    /// Retrieves this container plus a new file written at the given path.
    pub fn with_new_file(&self, path: impl Into<String>) -> Container {
        self.with_new_file_opts(path, Default::default())
    }

    pub fn with_new_file_opts(
        &self,
        path: impl Into<String>,
        opts: ContainerWithNewFileOpts,
    ) -> Container {
        let query = self
            .selection
            .select("withNewFile")
            .arg("path", path.into())
            .arg_opt("contents", opts.contents)
            .arg_opt("permissions", opts.permissions)
            .arg_opt("owner", opts.owner);

        self.child(query)
    }

    /// Retrieves this container with a registry authentication for a given
    /// address.
    pub fn with_registry_auth(
        &self,
        address: impl Into<String>,
        username: impl Into<String>,
        secret: Secret,
    ) -> Container {
        let query = self
            .selection
            .select("withRegistryAuth")
            .arg("address", address.into())
            .arg("username", username.into())
            .arg_object("secret", secret);

        self.child(query)
    }

    /// Retrieves the container with the given directory mounted to /.
    pub fn with_rootfs(&self, directory: Directory) -> Container {
        let query = self
            .selection
            .select("withRootfs")
            .arg_object("directory", directory);

        self.child(query)
    }

    /// Retrieves this container plus an env variable containing the given
    /// secret.
    pub fn with_secret_variable(&self, name: impl Into<String>, secret: Secret) -> Container {
        let query = self
            .selection
            .select("withSecretVariable")
            .arg("name", name.into())
            .arg_object("secret", secret);

        self.child(query)
    }

    /// Establish a runtime dependency on a service. The service is started
    /// before commands run and is reachable under the given alias.
    pub fn with_service_binding(&self, alias: impl Into<String>, service: Service) -> Container {
        let query = self
            .selection
            .select("withServiceBinding")
            .arg("alias", alias.into())
            .arg_object("service", service);

        self.child(query)
    }

    /// Retrieves this container plus a socket forwarded to the given Unix
    /// socket path.
    pub fn with_unix_socket(&self, path: impl Into<String>, source: Socket) -> Container {
        self.with_unix_socket_opts(path, source, Default::default())
    }

    pub fn with_unix_socket_opts(
        &self,
        path: impl Into<String>,
        source: Socket,
        opts: ContainerWithUnixSocketOpts,
    ) -> Container {
        let query = self
            .selection
            .select("withUnixSocket")
            .arg("path", path.into())
            .arg_object("source", source)
            .arg_opt("owner", opts.owner);

        self.child(query)
    }

    /// Retrieves this container with a different command user.
    pub fn with_user(&self, name: impl Into<String>) -> Container {
        let query = self.selection.select("withUser").arg("name", name.into());

        self.child(query)
    }

    /// Retrieves this container with a different working directory.
    pub fn with_workdir(&self, path: impl Into<String>) -> Container {
        let query = self.selection.select("withWorkdir").arg("path", path.into());

        self.child(query)
    }

    /// Retrieves this container with unset default arguments for future
    /// commands.
    pub fn without_default_args(&self) -> Container {
        self.child(self.selection.select("withoutDefaultArgs"))
    }

    /// Retrieves this container with an unset command entrypoint.
    pub fn without_entrypoint(&self) -> Container {
        self.without_entrypoint_opts(Default::default())
    }

    pub fn without_entrypoint_opts(&self, opts: ContainerWithoutEntrypointOpts) -> Container {
        let query = self
            .selection
            .select("withoutEntrypoint")
            .arg_opt("keepDefaultArgs", opts.keep_default_args);

        self.child(query)
    }

    /// Retrieves this container minus the given environment variable.
    pub fn without_env_variable(&self, name: impl Into<String>) -> Container {
        let query = self
            .selection
            .select("withoutEnvVariable")
            .arg("name", name.into());

        self.child(query)
    }

    /// Unexpose a previously exposed port.
    pub fn without_exposed_port(&self, port: isize) -> Container {
        self.without_exposed_port_opts(port, Default::default())
    }

    pub fn without_exposed_port_opts(
        &self,
        port: isize,
        opts: ContainerWithoutExposedPortOpts,
    ) -> Container {
        let mut query = self
            .selection
            .select("withoutExposedPort")
            .arg("port", port);
        if let Some(protocol) = opts.protocol {
            query = query.arg_enum("protocol", protocol);
        }

        self.child(query)
    }

    /// Indicate that subsequent operations should not be featured more
    /// prominently in the UI. This is the initial state.
    pub fn without_focus(&self) -> Container {
        self.child(self.selection.select("withoutFocus"))
    }

    /// Retrieves this container minus the given label.
    pub fn without_label(&self, name: impl Into<String>) -> Container {
        let query = self
            .selection
            .select("withoutLabel")
            .arg("name", name.into());

        self.child(query)
    }

    /// Retrieves this container after unmounting everything at the given
    /// path.
    pub fn without_mount(&self, path: impl Into<String>) -> Container {
        let query = self
            .selection
            .select("withoutMount")
            .arg("path", path.into());

        self.child(query)
    }

    /// Retrieves this container without the registry authentication of a
    /// given address.
    pub fn without_registry_auth(&self, address: impl Into<String>) -> Container {
        let query = self
            .selection
            .select("withoutRegistryAuth")
            .arg("address", address.into());

        self.child(query)
    }

    /// Retrieves this container with a previously added Unix socket removed.
    pub fn without_unix_socket(&self, path: impl Into<String>) -> Container {
        let query = self
            .selection
            .select("withoutUnixSocket")
            .arg("path", path.into());

        self.child(query)
    }

    /// Retrieves this container with an unset command user.
    pub fn without_user(&self) -> Container {
        self.child(self.selection.select("withoutUser"))
    }

    /// Retrieves this container with an unset working directory.
    pub fn without_workdir(&self) -> Container {
        self.child(self.selection.select("withoutWorkdir"))
    }

    /// Retrieves the working directory for all commands.
    pub async fn workdir(&self) -> Result<String, DaggerError> {
        let query = self.selection.select("workdir");

        query.execute(&self.graphql_client).await
    }
}
