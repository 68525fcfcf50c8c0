use crate::api::{
    load_objects, strings, Container, Directory, GeneratedCodeId, GitModuleSourceId, Handle,
    LocalModuleSourceId, ModuleDependencyId, ModuleId, ModuleSourceId, ModuleSourceKind, TypeDef,
    Void,
};
use crate::errors::DaggerError;

object!(
    /// A Dagger module.
    Module,
    ModuleId
);

object!(
    /// The source needed to load and run a module, along with any metadata
    /// about the source such as versions, urls, etc.
    ModuleSource,
    ModuleSourceId
);

object!(
    /// The configuration of dependency of a module.
    ModuleDependency,
    ModuleDependencyId
);

object!(
    /// Module source originating from a git repo.
    GitModuleSource,
    GitModuleSourceId
);

object!(
    /// Module source that originates from a path locally relative to an
    /// arbitrary directory.
    LocalModuleSource,
    LocalModuleSourceId
);

object!(
    /// The result of running an SDK's codegen.
    GeneratedCode,
    GeneratedCodeId
);

impl Module {
    /// Modules used by this module.
    pub async fn dependencies(&self) -> Result<Vec<Module>, DaggerError> {
        load_objects(self, self.selection.select("dependencies")).await
    }

    /// The dependencies as configured by the module.
    pub async fn dependency_config(&self) -> Result<Vec<ModuleDependency>, DaggerError> {
        load_objects(self, self.selection.select("dependencyConfig")).await
    }

    /// The doc string of the module, if any.
    pub async fn description(&self) -> Result<Option<String>, DaggerError> {
        let query = self.selection.select("description");

        query.execute(&self.graphql_client).await
    }

    /// The generated files and directories made on top of the module source's
    /// context directory.
    pub fn generated_context_diff(&self) -> Directory {
        self.child(self.selection.select("generatedContextDiff"))
    }

    /// The module source's context plus any configuration and source files
    /// created by codegen.
    pub fn generated_context_directory(&self) -> Directory {
        self.child(self.selection.select("generatedContextDirectory"))
    }

    /// Retrieves the module with the objects loaded via its SDK.
    pub fn initialize(&self) -> Module {
        self.child(self.selection.select("initialize"))
    }

    /// Interfaces served by this module.
    pub async fn interfaces(&self) -> Result<Vec<TypeDef>, DaggerError> {
        load_objects(self, self.selection.select("interfaces")).await
    }

    pub async fn name(&self) -> Result<String, DaggerError> {
        let query = self.selection.select("name");

        query.execute(&self.graphql_client).await
    }

    /// Objects served by this module.
    pub async fn objects(&self) -> Result<Vec<TypeDef>, DaggerError> {
        load_objects(self, self.selection.select("objects")).await
    }

    /// The container that runs the module's entrypoint.
    pub fn runtime(&self) -> Container {
        self.child(self.selection.select("runtime"))
    }

    /// The SDK used by this module, either a name of a builtin SDK or a
    /// module source ref string pointing to the SDK's implementation.
    pub async fn sdk(&self) -> Result<String, DaggerError> {
        let query = self.selection.select("sdk");

        query.execute(&self.graphql_client).await
    }

    /// Serve a module's API in the current session.
    pub async fn serve(&self) -> Result<Void, DaggerError> {
        let query = self.selection.select("serve");

        query.execute(&self.graphql_client).await
    }

    /// The source for the module.
    pub fn source(&self) -> ModuleSource {
        self.child(self.selection.select("source"))
    }

    /// Retrieves the module with the given description.
    pub fn with_description(&self, description: impl Into<String>) -> Module {
        let query = self
            .selection
            .select("withDescription")
            .arg("description", description.into());

        self.child(query)
    }

    /// This module plus the given interface type and associated functions.
    pub fn with_interface(&self, iface: TypeDef) -> Module {
        let query = self
            .selection
            .select("withInterface")
            .arg_object("iface", iface);

        self.child(query)
    }

    /// This module plus the given object type and associated functions.
    pub fn with_object(&self, object: TypeDef) -> Module {
        let query = self
            .selection
            .select("withObject")
            .arg_object("object", object);

        self.child(query)
    }

    /// Retrieves the module with basic configuration loaded if present.
    pub fn with_source(&self, source: ModuleSource) -> Module {
        let query = self
            .selection
            .select("withSource")
            .arg_object("source", source);

        self.child(query)
    }
}

impl ModuleSource {
    /// The git-specific view of the source. Only set for git sources.
    pub fn as_git_source(&self) -> GitModuleSource {
        self.child(self.selection.select("asGitSource"))
    }

    /// The local-specific view of the source. Only set for local sources.
    pub fn as_local_source(&self) -> LocalModuleSource {
        self.child(self.selection.select("asLocalSource"))
    }

    /// Load the source as a module. Fails if the source has no configuration.
    pub fn as_module(&self) -> Module {
        self.child(self.selection.select("asModule"))
    }

    /// A human readable ref string representation of this module source.
    pub async fn as_string(&self) -> Result<String, DaggerError> {
        let query = self.selection.select("asString");

        query.execute(&self.graphql_client).await
    }

    /// Returns whether the module source has a configuration file.
    pub async fn config_exists(&self) -> Result<bool, DaggerError> {
        let query = self.selection.select("configExists");

        query.execute(&self.graphql_client).await
    }

    /// The directory containing everything needed to load and use the module.
    pub fn context_directory(&self) -> Directory {
        self.child(self.selection.select("contextDirectory"))
    }

    /// The dependencies of the module source.
    pub async fn dependencies(&self) -> Result<Vec<ModuleDependency>, DaggerError> {
        load_objects(self, self.selection.select("dependencies")).await
    }

    /// The directory containing the module configuration and source code.
    pub fn directory(&self, path: impl Into<String>) -> Directory {
        let query = self.selection.select("directory").arg("path", path.into());

        self.child(query)
    }

    /// The kind of source (e.g. local, git, etc.)
    pub async fn kind(&self) -> Result<ModuleSourceKind, DaggerError> {
        let query = self.selection.select("kind");

        query.execute(&self.graphql_client).await
    }

    /// If set, the name of the module this source references, including any
    /// overrides at runtime by callers.
    pub async fn module_name(&self) -> Result<String, DaggerError> {
        let query = self.selection.select("moduleName");

        query.execute(&self.graphql_client).await
    }

    /// The original name of the module this source references, as defined in
    /// the module configuration.
    pub async fn module_original_name(&self) -> Result<String, DaggerError> {
        let query = self.selection.select("moduleOriginalName");

        query.execute(&self.graphql_client).await
    }

    /// The path to the module source's context directory on the caller's
    /// filesystem. Only valid for local sources.
    pub async fn resolve_context_path_from_caller(&self) -> Result<String, DaggerError> {
        let query = self.selection.select("resolveContextPathFromCaller");

        query.execute(&self.graphql_client).await
    }

    /// Resolve the provided module source arg as a dependency relative to
    /// this module source.
    pub fn resolve_dependency(&self, dep: ModuleSource) -> ModuleSource {
        let query = self
            .selection
            .select("resolveDependency")
            .arg_object("dep", dep);

        self.child(query)
    }

    /// Load the source from its path on the caller's filesystem, including
    /// only needed+configured files and directories. Only valid for local
    /// sources.
    pub fn resolve_from_caller(&self) -> ModuleSource {
        self.child(self.selection.select("resolveFromCaller"))
    }

    /// The path relative to context of the root of the module source.
    pub async fn source_root_subpath(&self) -> Result<String, DaggerError> {
        let query = self.selection.select("sourceRootSubpath");

        query.execute(&self.graphql_client).await
    }

    /// The path relative to context of the module implementation source code.
    pub async fn source_subpath(&self) -> Result<String, DaggerError> {
        let query = self.selection.select("sourceSubpath");

        query.execute(&self.graphql_client).await
    }

    /// Update the module source with a new context directory. Only valid for
    /// local sources.
    pub fn with_context_directory(&self, dir: Directory) -> ModuleSource {
        let query = self
            .selection
            .select("withContextDirectory")
            .arg_object("dir", dir);

        self.child(query)
    }

    /// Append the provided dependencies to the module source's dependency
    /// list.
    pub fn with_dependencies(&self, dependencies: Vec<ModuleDependency>) -> ModuleSource {
        let query = self
            .selection
            .select("withDependencies")
            .arg_objects("dependencies", dependencies);

        self.child(query)
    }

    /// Update the module source with a new name.
    pub fn with_name(&self, name: impl Into<String>) -> ModuleSource {
        let query = self.selection.select("withName").arg("name", name.into());

        self.child(query)
    }

    /// Update the module source with a new SDK.
    pub fn with_sdk(&self, sdk: impl Into<String>) -> ModuleSource {
        let query = self.selection.select("withSDK").arg("sdk", sdk.into());

        self.child(query)
    }

    /// Update the module source with a new source subpath.
    pub fn with_source_subpath(&self, path: impl Into<String>) -> ModuleSource {
        let query = self
            .selection
            .select("withSourceSubpath")
            .arg("path", path.into());

        self.child(query)
    }
}

impl ModuleDependency {
    /// The name of the dependency module.
    pub async fn name(&self) -> Result<String, DaggerError> {
        let query = self.selection.select("name");

        query.execute(&self.graphql_client).await
    }

    /// The source for the dependency module.
    pub fn source(&self) -> ModuleSource {
        self.child(self.selection.select("source"))
    }
}

impl GitModuleSource {
    /// The URL from which the source's git repo can be cloned.
    pub async fn clone_url(&self) -> Result<String, DaggerError> {
        let query = self.selection.select("cloneURL");

        query.execute(&self.graphql_client).await
    }

    /// The resolved commit of the git repo this source points to.
    pub async fn commit(&self) -> Result<String, DaggerError> {
        let query = self.selection.select("commit");

        query.execute(&self.graphql_client).await
    }

    pub fn context_directory(&self) -> Directory {
        self.child(self.selection.select("contextDirectory"))
    }

    /// The URL to the source's git repo in a web browser.
    pub async fn html_url(&self) -> Result<String, DaggerError> {
        let query = self.selection.select("htmlURL");

        query.execute(&self.graphql_client).await
    }

    /// The path to the root of the module source under the context
    /// directory.
    pub async fn root_subpath(&self) -> Result<String, DaggerError> {
        let query = self.selection.select("rootSubpath");

        query.execute(&self.graphql_client).await
    }

    /// The specified version of the git repo this source points to.
    pub async fn version(&self) -> Result<String, DaggerError> {
        let query = self.selection.select("version");

        query.execute(&self.graphql_client).await
    }
}

impl LocalModuleSource {
    pub fn context_directory(&self) -> Directory {
        self.child(self.selection.select("contextDirectory"))
    }

    pub async fn root_subpath(&self) -> Result<String, DaggerError> {
        let query = self.selection.select("rootSubpath");

        query.execute(&self.graphql_client).await
    }
}

impl GeneratedCode {
    /// The directory containing the generated code.
    pub fn code(&self) -> Directory {
        self.child(self.selection.select("code"))
    }

    /// Paths to mark generated in version control (i.e. .gitattributes).
    pub async fn vcs_generated_paths(&self) -> Result<Vec<String>, DaggerError> {
        let query = self.selection.select("vcsGeneratedPaths");

        query.execute(&self.graphql_client).await
    }

    /// Paths to ignore in version control (i.e. .gitignore).
    pub async fn vcs_ignored_paths(&self) -> Result<Vec<String>, DaggerError> {
        let query = self.selection.select("vcsIgnoredPaths");

        query.execute(&self.graphql_client).await
    }

    pub fn with_vcs_generated_paths(&self, paths: Vec<impl Into<String>>) -> GeneratedCode {
        let query = self
            .selection
            .select("withVCSGeneratedPaths")
            .arg("paths", strings(paths));

        self.child(query)
    }

    pub fn with_vcs_ignored_paths(&self, paths: Vec<impl Into<String>>) -> GeneratedCode {
        let query = self
            .selection
            .select("withVCSIgnoredPaths")
            .arg("paths", strings(paths));

        self.child(query)
    }
}
