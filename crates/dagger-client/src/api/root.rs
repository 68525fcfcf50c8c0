use std::sync::Arc;

use derive_builder::Builder;

use crate::api::{
    load_objects, CacheVolume, CacheVolumeId, Container, ContainerId, CurrentModule,
    CurrentModuleId, Directory, DirectoryId, EnvVariable, EnvVariableId, FieldTypeDef,
    FieldTypeDefId, File, FileId, Function, FunctionArg, FunctionArgId, FunctionCall,
    FunctionCallArgValue, FunctionCallArgValueId, FunctionCallId, FunctionId, GeneratedCode,
    GeneratedCodeId, GitModuleSource, GitModuleSourceId, GitRef, GitRefId, GitRepository,
    GitRepositoryId, Handle, Host, HostId, InputTypeDef, InputTypeDefId, InterfaceTypeDef,
    InterfaceTypeDefId, Label, LabelId, ListTypeDef, ListTypeDefId, LocalModuleSource,
    LocalModuleSourceId, Module, ModuleDependency, ModuleDependencyId, ModuleId, ModuleSource,
    ModuleSourceId, ObjectTypeDef, ObjectTypeDefId, PipelineLabel, Platform, Port, PortId,
    Secret, SecretId, Service, ServiceId, Socket, SocketId, Terminal, TerminalId, TypeDef,
    TypeDefId,
};
use crate::core::cli_session::EngineProcess;
use crate::core::graphql_client::DynGraphQLClient;
use crate::errors::DaggerError;
use crate::querybuilder::{query, Selection};

/// The query root.
#[derive(Clone)]
pub struct Query {
    pub proc: Option<Arc<EngineProcess>>,
    pub selection: Selection,
    pub graphql_client: DynGraphQLClient,
}

impl Handle for Query {
    fn proc(&self) -> &Option<Arc<EngineProcess>> {
        &self.proc
    }

    fn graphql_client(&self) -> &DynGraphQLClient {
        &self.graphql_client
    }
}

#[derive(Builder, Debug, PartialEq, Clone, Default)]
pub struct QueryContainerOpts {
    /// Platform to initialize the container with.
    #[builder(setter(into, strip_option), default)]
    pub platform: Option<Platform>,
}

#[derive(Builder, Debug, Clone, Default)]
pub struct QueryGitOpts {
    /// Set to true to keep .git directory.
    #[builder(setter(into, strip_option), default)]
    pub keep_git_dir: Option<bool>,
    /// A service which must be started before the repo is fetched.
    #[builder(setter(into, strip_option), default)]
    pub experimental_service_host: Option<Service>,
    #[builder(setter(into, strip_option), default)]
    pub ssh_known_hosts: Option<String>,
    #[builder(setter(into, strip_option), default)]
    pub ssh_auth_socket: Option<Socket>,
}

#[derive(Builder, Debug, Clone, Default)]
pub struct QueryHttpOpts {
    /// A service which must be started before the URL is fetched.
    #[builder(setter(into, strip_option), default)]
    pub experimental_service_host: Option<Service>,
}

#[derive(Builder, Debug, PartialEq, Clone, Default)]
pub struct QueryPipelineOpts {
    /// Description of the sub-pipeline.
    #[builder(setter(into, strip_option), default)]
    pub description: Option<String>,
    /// Labels to apply to the sub-pipeline.
    #[builder(setter(into, strip_option), default)]
    pub labels: Option<Vec<PipelineLabel>>,
}

#[derive(Builder, Debug, PartialEq, Clone, Default)]
pub struct QueryModuleSourceOpts {
    /// Enforce that the source is a stable version, for source kinds that
    /// support versioning.
    #[builder(setter(into, strip_option), default)]
    pub stable: Option<bool>,
}

#[derive(Builder, Debug, PartialEq, Clone, Default)]
pub struct QueryModuleDependencyOpts {
    /// Name to use for the dependency. Defaults to the name of the
    /// dependency module.
    #[builder(setter(into, strip_option), default)]
    pub name: Option<String>,
}

impl Query {
    pub fn new(graphql_client: DynGraphQLClient) -> Self {
        Self {
            proc: None,
            selection: query(),
            graphql_client,
        }
    }

    pub fn with<F>(&self, f: F) -> Query
    where
        F: FnOnce(Query) -> Query,
    {
        f(self.clone())
    }

    /// Retrieves a content-addressed blob.
    pub fn blob(
        &self,
        digest: impl Into<String>,
        size: isize,
        media_type: impl Into<String>,
        uncompressed: impl Into<String>,
    ) -> Directory {
        let query = self
            .selection
            .select("blob")
            .arg("digest", digest.into())
            .arg("size", size)
            .arg("mediaType", media_type.into())
            .arg("uncompressed", uncompressed.into());

        self.child(query)
    }

    /// Constructs a cache volume for a given cache key.
    pub fn cache_volume(&self, key: impl Into<String>) -> CacheVolume {
        let query = self.selection.select("cacheVolume").arg("key", key.into());

        self.child(query)
    }

    /// Checks if the current engine version is compatible with an SDK's
    /// required version.
    pub async fn check_version_compatibility(
        &self,
        version: impl Into<String>,
    ) -> Result<bool, DaggerError> {
        let query = self
            .selection
            .select("checkVersionCompatibility")
            .arg("version", version.into());

        query.execute(&self.graphql_client).await
    }

    /// Creates a scratch container.
    pub fn container(&self) -> Container {
        self.child(self.selection.select("container"))
    }

    pub fn container_opts(&self, opts: QueryContainerOpts) -> Container {
        let query = self
            .selection
            .select("container")
            .arg_opt("platform", opts.platform);

        self.child(query)
    }

    /// The function call currently being executed, when called from a module
    /// function.
    pub fn current_function_call(&self) -> FunctionCall {
        self.child(self.selection.select("currentFunctionCall"))
    }

    /// The module currently being served in the session, if any.
    pub fn current_module(&self) -> CurrentModule {
        self.child(self.selection.select("currentModule"))
    }

    /// The type definitions of the objects currently being served in the
    /// session.
    pub async fn current_type_defs(&self) -> Result<Vec<TypeDef>, DaggerError> {
        load_objects(self, self.selection.select("currentTypeDefs")).await
    }

    /// The default platform of the engine.
    pub async fn default_platform(&self) -> Result<Platform, DaggerError> {
        let query = self.selection.select("defaultPlatform");

        query.execute(&self.graphql_client).await
    }

    /// Creates an empty directory.
    pub fn directory(&self) -> Directory {
        self.child(self.selection.select("directory"))
    }

    /// Creates a function.
    pub fn function(&self, name: impl Into<String>, return_type: TypeDef) -> Function {
        let query = self
            .selection
            .select("function")
            .arg("name", name.into())
            .arg_object("returnType", return_type);

        self.child(query)
    }

    /// Creates a code generation result, given a directory containing the
    /// generated code.
    pub fn generated_code(&self, code: Directory) -> GeneratedCode {
        let query = self
            .selection
            .select("generatedCode")
            .arg_object("code", code);

        self.child(query)
    }

    /// Queries a Git repository.
    pub fn git(&self, url: impl Into<String>) -> GitRepository {
        let query = self.selection.select("git").arg("url", url.into());

        self.child(query)
    }

    pub fn git_opts(&self, url: impl Into<String>, opts: QueryGitOpts) -> GitRepository {
        let mut query = self
            .selection
            .select("git")
            .arg("url", url.into())
            .arg_opt("keepGitDir", opts.keep_git_dir);
        if let Some(experimental_service_host) = opts.experimental_service_host {
            query = query.arg_object("experimentalServiceHost", experimental_service_host);
        }
        query = query.arg_opt("sshKnownHosts", opts.ssh_known_hosts);
        if let Some(ssh_auth_socket) = opts.ssh_auth_socket {
            query = query.arg_object("sshAuthSocket", ssh_auth_socket);
        }

        self.child(query)
    }

    /// Queries the host environment.
    pub fn host(&self) -> Host {
        self.child(self.selection.select("host"))
    }

    /// Returns a file containing an http remote url content.
    pub fn http(&self, url: impl Into<String>) -> File {
        let query = self.selection.select("http").arg("url", url.into());

        self.child(query)
    }

    pub fn http_opts(&self, url: impl Into<String>, opts: QueryHttpOpts) -> File {
        let mut query = self.selection.select("http").arg("url", url.into());
        if let Some(experimental_service_host) = opts.experimental_service_host {
            query = query.arg_object("experimentalServiceHost", experimental_service_host);
        }

        self.child(query)
    }

    pub fn load_cache_volume_from_id(&self, id: impl Into<CacheVolumeId>) -> CacheVolume {
        self.load(id.into())
    }

    pub fn load_container_from_id(&self, id: impl Into<ContainerId>) -> Container {
        self.load(id.into())
    }

    pub fn load_current_module_from_id(&self, id: impl Into<CurrentModuleId>) -> CurrentModule {
        self.load(id.into())
    }

    pub fn load_directory_from_id(&self, id: impl Into<DirectoryId>) -> Directory {
        self.load(id.into())
    }

    pub fn load_env_variable_from_id(&self, id: impl Into<EnvVariableId>) -> EnvVariable {
        self.load(id.into())
    }

    pub fn load_field_type_def_from_id(&self, id: impl Into<FieldTypeDefId>) -> FieldTypeDef {
        self.load(id.into())
    }

    pub fn load_file_from_id(&self, id: impl Into<FileId>) -> File {
        self.load(id.into())
    }

    pub fn load_function_arg_from_id(&self, id: impl Into<FunctionArgId>) -> FunctionArg {
        self.load(id.into())
    }

    pub fn load_function_call_arg_value_from_id(
        &self,
        id: impl Into<FunctionCallArgValueId>,
    ) -> FunctionCallArgValue {
        self.load(id.into())
    }

    pub fn load_function_call_from_id(&self, id: impl Into<FunctionCallId>) -> FunctionCall {
        self.load(id.into())
    }

    pub fn load_function_from_id(&self, id: impl Into<FunctionId>) -> Function {
        self.load(id.into())
    }

    pub fn load_generated_code_from_id(&self, id: impl Into<GeneratedCodeId>) -> GeneratedCode {
        self.load(id.into())
    }

    pub fn load_git_module_source_from_id(
        &self,
        id: impl Into<GitModuleSourceId>,
    ) -> GitModuleSource {
        self.load(id.into())
    }

    pub fn load_git_ref_from_id(&self, id: impl Into<GitRefId>) -> GitRef {
        self.load(id.into())
    }

    pub fn load_git_repository_from_id(&self, id: impl Into<GitRepositoryId>) -> GitRepository {
        self.load(id.into())
    }

    pub fn load_host_from_id(&self, id: impl Into<HostId>) -> Host {
        self.load(id.into())
    }

    pub fn load_input_type_def_from_id(&self, id: impl Into<InputTypeDefId>) -> InputTypeDef {
        self.load(id.into())
    }

    pub fn load_interface_type_def_from_id(
        &self,
        id: impl Into<InterfaceTypeDefId>,
    ) -> InterfaceTypeDef {
        self.load(id.into())
    }

    pub fn load_label_from_id(&self, id: impl Into<LabelId>) -> Label {
        self.load(id.into())
    }

    pub fn load_list_type_def_from_id(&self, id: impl Into<ListTypeDefId>) -> ListTypeDef {
        self.load(id.into())
    }

    pub fn load_local_module_source_from_id(
        &self,
        id: impl Into<LocalModuleSourceId>,
    ) -> LocalModuleSource {
        self.load(id.into())
    }

    pub fn load_module_dependency_from_id(
        &self,
        id: impl Into<ModuleDependencyId>,
    ) -> ModuleDependency {
        self.load(id.into())
    }

    pub fn load_module_from_id(&self, id: impl Into<ModuleId>) -> Module {
        self.load(id.into())
    }

    pub fn load_module_source_from_id(&self, id: impl Into<ModuleSourceId>) -> ModuleSource {
        self.load(id.into())
    }

    pub fn load_object_type_def_from_id(&self, id: impl Into<ObjectTypeDefId>) -> ObjectTypeDef {
        self.load(id.into())
    }

    pub fn load_port_from_id(&self, id: impl Into<PortId>) -> Port {
        self.load(id.into())
    }

    pub fn load_secret_from_id(&self, id: impl Into<SecretId>) -> Secret {
        self.load(id.into())
    }

    pub fn load_service_from_id(&self, id: impl Into<ServiceId>) -> Service {
        self.load(id.into())
    }

    pub fn load_socket_from_id(&self, id: impl Into<SocketId>) -> Socket {
        self.load(id.into())
    }

    pub fn load_terminal_from_id(&self, id: impl Into<TerminalId>) -> Terminal {
        self.load(id.into())
    }

    pub fn load_type_def_from_id(&self, id: impl Into<TypeDefId>) -> TypeDef {
        self.load(id.into())
    }

    /// Creates a new module.
    pub fn module(&self) -> Module {
        self.child(self.selection.select("module"))
    }

    /// Creates a module dependency from a module source.
    pub fn module_dependency(&self, source: ModuleSource) -> ModuleDependency {
        let query = self
            .selection
            .select("moduleDependency")
            .arg_object("source", source);

        self.child(query)
    }

    pub fn module_dependency_opts(
        &self,
        source: ModuleSource,
        opts: QueryModuleDependencyOpts,
    ) -> ModuleDependency {
        let query = self
            .selection
            .select("moduleDependency")
            .arg_object("source", source)
            .arg_opt("name", opts.name);

        self.child(query)
    }

    /// Creates a module source from a reference string, e.g. a local path
    /// or a git url.
    pub fn module_source(&self, ref_string: impl Into<String>) -> ModuleSource {
        let query = self
            .selection
            .select("moduleSource")
            .arg("refString", ref_string.into());

        self.child(query)
    }

    pub fn module_source_opts(
        &self,
        ref_string: impl Into<String>,
        opts: QueryModuleSourceOpts,
    ) -> ModuleSource {
        let query = self
            .selection
            .select("moduleSource")
            .arg("refString", ref_string.into())
            .arg_opt("stable", opts.stable);

        self.child(query)
    }

    /// Creates a named sub-pipeline.
    pub fn pipeline(&self, name: impl Into<String>) -> Query {
        let query = self.selection.select("pipeline").arg("name", name.into());

        Query {
            proc: self.proc.clone(),
            selection: query,
            graphql_client: self.graphql_client.clone(),
        }
    }

    pub fn pipeline_opts(&self, name: impl Into<String>, opts: QueryPipelineOpts) -> Query {
        let query = self
            .selection
            .select("pipeline")
            .arg("name", name.into())
            .arg_opt("description", opts.description)
            .arg_opt("labels", opts.labels);

        Query {
            proc: self.proc.clone(),
            selection: query,
            graphql_client: self.graphql_client.clone(),
        }
    }

    /// Reference a secret by name.
    pub fn secret(&self, name: impl Into<String>) -> Secret {
        let query = self.selection.select("secret").arg("name", name.into());

        self.child(query)
    }

    /// Sets a secret given a user defined name to its plaintext and returns
    /// the secret. The plaintext value is limited to a size of 128000 bytes.
    pub fn set_secret(&self, name: impl Into<String>, plaintext: impl Into<String>) -> Secret {
        let query = self
            .selection
            .select("setSecret")
            .arg("name", name.into())
            .arg("plaintext", plaintext.into());

        self.child(query)
    }

    /// Creates a new type definition.
    pub fn type_def(&self) -> TypeDef {
        self.child(self.selection.select("typeDef"))
    }
}
