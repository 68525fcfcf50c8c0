use derive_builder::Builder;

use crate::api::{
    BuildArg, Container, DirectoryId, File, Handle, Module, PipelineLabel, Platform, Secret,
};
use crate::errors::DaggerError;

object!(
    /// A directory.
    Directory,
    DirectoryId
);

#[derive(Builder, Debug, PartialEq, Clone, Default)]
pub struct DirectoryAsModuleOpts {
    /// Subpath of the directory containing the module's configuration file.
    /// Defaults to the root of the directory.
    #[builder(setter(into, strip_option), default)]
    pub source_root_path: Option<String>,
}

#[derive(Builder, Debug, Clone, Default)]
pub struct DirectoryDockerBuildOpts {
    /// The platform to build.
    #[builder(setter(into, strip_option), default)]
    pub platform: Option<Platform>,
    /// Path to the Dockerfile to use (e.g., "frontend.Dockerfile").
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

#[derive(Builder, Debug, PartialEq, Clone, Default)]
pub struct DirectoryEntriesOpts {
    /// Location of the directory to look at (e.g., "/src").
    #[builder(setter(into, strip_option), default)]
    pub path: Option<String>,
}

#[derive(Builder, Debug, PartialEq, Clone, Default)]
pub struct DirectoryPipelineOpts {
    #[builder(setter(into, strip_option), default)]
    pub description: Option<String>,
    #[builder(setter(into, strip_option), default)]
    pub labels: Option<Vec<PipelineLabel>>,
}

#[derive(Builder, Debug, PartialEq, Clone, Default)]
pub struct DirectoryWithDirectoryOpts {
    /// Exclude artifacts that match the given pattern (e.g., ["node_modules/", ".git*"]).
    #[builder(setter(into, strip_option), default)]
    pub exclude: Option<Vec<String>>,
    /// Include only artifacts that match the given pattern (e.g., ["app/", "package.*"]).
    #[builder(setter(into, strip_option), default)]
    pub include: Option<Vec<String>>,
}

#[derive(Builder, Debug, PartialEq, Clone, Default)]
pub struct DirectoryPermissionsOpts {
    /// Permission given to the written entries (e.g., 0600).
    #[builder(setter(into, strip_option), default)]
    pub permissions: Option<isize>,
}

pub type DirectoryWithFileOpts = DirectoryPermissionsOpts;
pub type DirectoryWithFilesOpts = DirectoryPermissionsOpts;
pub type DirectoryWithNewDirectoryOpts = DirectoryPermissionsOpts;
pub type DirectoryWithNewFileOpts = DirectoryPermissionsOpts;

impl Directory {
    /// Load the directory as a module.
    pub fn as_module(&self) -> Module {
        self.as_module_opts(Default::default())
    }

    pub fn as_module_opts(&self, opts: DirectoryAsModuleOpts) -> Module {
        let query = self
            .selection
            .select("asModule")
            .arg_opt("sourceRootPath", opts.source_root_path);

        self.child(query)
    }

    /// Gets the difference between this directory and another directory.
    pub fn diff(&self, other: Directory) -> Directory {
        let query = self.selection.select("diff").arg_object("other", other);

        self.child(query)
    }

    /// Retrieves a directory at the given path.
    pub fn directory(&self, path: impl Into<String>) -> Directory {
        let query = self.selection.select("directory").arg("path", path.into());

        self.child(query)
    }

    /// Builds a new Docker container from this directory.
    pub fn docker_build(&self) -> Container {
        self.docker_build_opts(Default::default())
    }

    pub fn docker_build_opts(&self, opts: DirectoryDockerBuildOpts) -> Container {
        let mut query = self
            .selection
            .select("dockerBuild")
            .arg_opt("platform", opts.platform)
            .arg_opt("dockerfile", opts.dockerfile)
            .arg_opt("target", opts.target)
            .arg_opt("buildArgs", opts.build_args);
        if let Some(secrets) = opts.secrets.filter(|v| !v.is_empty()) {
            query = query.arg_objects("secrets", secrets);
        }

        self.child(query)
    }

    /// Returns a list of files and directories at the given path.
    pub async fn entries(&self) -> Result<Vec<String>, DaggerError> {
        self.entries_opts(Default::default()).await
    }

    pub async fn entries_opts(
        &self,
        opts: DirectoryEntriesOpts,
    ) -> Result<Vec<String>, DaggerError> {
        let query = self
            .selection
            .select("entries")
            .arg_opt("path", opts.path);

        query.execute(&self.graphql_client).await
    }

    /// Writes the contents of the directory to a path on the host.
    pub async fn export(&self, path: impl Into<String>) -> Result<bool, DaggerError> {
        let query = self.selection.select("export").arg("path", path.into());

        query.execute(&self.graphql_client).await
    }

    /// Retrieves a file at the given path.
    pub fn file(&self, path: impl Into<String>) -> File {
        let query = self.selection.select("file").arg("path", path.into());

        self.child(query)
    }

    /// Returns a list of files and directories that match the given pattern.
    pub async fn glob(&self, pattern: impl Into<String>) -> Result<Vec<String>, DaggerError> {
        let query = self
            .selection
            .select("glob")
            .arg("pattern", pattern.into());

        query.execute(&self.graphql_client).await
    }

    /// Creates a named sub-pipeline.
    pub fn pipeline(&self, name: impl Into<String>) -> Directory {
        self.pipeline_opts(name, Default::default())
    }

    pub fn pipeline_opts(&self, name: impl Into<String>, opts: DirectoryPipelineOpts) -> Directory {
        let query = self
            .selection
            .select("pipeline")
            .arg("name", name.into())
            .arg_opt("description", opts.description)
            .arg_opt("labels", opts.labels);

        self.child(query)
    }

    /// Force evaluation in the engine.
    pub async fn sync(&self) -> Result<Directory, DaggerError> {
        let query = self.selection.select("sync");
        query.execute::<DirectoryId>(&self.graphql_client).await?;

        Ok(self.clone())
    }

    /// Retrieves this directory plus a directory written at the given path.
    pub fn with_directory(&self, path: impl Into<String>, directory: Directory) -> Directory {
        self.with_directory_opts(path, directory, Default::default())
    }

    pub fn with_directory_opts(
        &self,
        path: impl Into<String>,
        directory: Directory,
        opts: DirectoryWithDirectoryOpts,
    ) -> Directory {
        let query = self
            .selection
            .select("withDirectory")
            .arg("path", path.into())
            .arg_object("directory", directory)
            .arg_opt("exclude", opts.exclude)
            .arg_opt("include", opts.include);

        self.child(query)
    }

    /// Retrieves this directory plus the contents of the given file copied to
    /// the given path.
    pub fn with_file(&self, path: impl Into<String>, source: File) -> Directory {
        self.with_file_opts(path, source, Default::default())
    }

    pub fn with_file_opts(
        &self,
        path: impl Into<String>,
        source: File,
        opts: DirectoryWithFileOpts,
    ) -> Directory {
        let query = self
            .selection
            .select("withFile")
            .arg("path", path.into())
            .arg_object("source", source)
            .arg_opt("permissions", opts.permissions);

        self.child(query)
    }

    /// Retrieves this directory plus the contents of the given files copied
    /// to the given path.
    pub fn with_files(&self, path: impl Into<String>, sources: Vec<File>) -> Directory {
        self.with_files_opts(path, sources, Default::default())
    }

    pub fn with_files_opts(
        &self,
        path: impl Into<String>,
        sources: Vec<File>,
        opts: DirectoryWithFilesOpts,
    ) -> Directory {
        let query = self
            .selection
            .select("withFiles")
            .arg("path", path.into())
            .arg_objects("sources", sources)
            .arg_opt("permissions", opts.permissions);

        self.child(query)
    }

    /// Retrieves this directory plus a new directory created at the given
    /// path.
    pub fn with_new_directory(&self, path: impl Into<String>) -> Directory {
        self.with_new_directory_opts(path, Default::default())
    }

    pub fn with_new_directory_opts(
        &self,
        path: impl Into<String>,
        opts: DirectoryWithNewDirectoryOpts,
    ) -> Directory {
        let query = self
            .selection
            .select("withNewDirectory")
            .arg("path", path.into())
            .arg_opt("permissions", opts.permissions);

        self.child(query)
    }

    /// Retrieves this directory plus a new file written at the given path.
    pub fn with_new_file(&self, path: impl Into<String>, contents: impl Into<String>) -> Directory {
        self.with_new_file_opts(path, contents, Default::default())
    }

    pub fn with_new_file_opts(
        &self,
        path: impl Into<String>,
        contents: impl Into<String>,
        opts: DirectoryWithNewFileOpts,
    ) -> Directory {
        let query = self
            .selection
            .select("withNewFile")
            .arg("path", path.into())
            .arg("contents", contents.into())
            .arg_opt("permissions", opts.permissions);

        self.child(query)
    }

    /// Retrieves this directory with all file/dir timestamps set to the given
    /// time, in seconds since the Unix epoch.
    pub fn with_timestamps(&self, timestamp: isize) -> Directory {
        let query = self
            .selection
            .select("withTimestamps")
            .arg("timestamp", timestamp);

        self.child(query)
    }

    /// Retrieves this directory with the directory at the given path removed.
    pub fn without_directory(&self, path: impl Into<String>) -> Directory {
        let query = self
            .selection
            .select("withoutDirectory")
            .arg("path", path.into());

        self.child(query)
    }

    /// Retrieves this directory with the file at the given path removed.
    pub fn without_file(&self, path: impl Into<String>) -> Directory {
        let query = self
            .selection
            .select("withoutFile")
            .arg("path", path.into());

        self.child(query)
    }
}
