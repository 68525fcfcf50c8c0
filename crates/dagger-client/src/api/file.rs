use derive_builder::Builder;

use crate::api::{FileId, Handle};
use crate::errors::DaggerError;

object!(
    /// A file.
    File,
    FileId
);

#[derive(Builder, Debug, PartialEq, Clone, Default)]
pub struct FileExportOpts {
    /// Allow `path` to be a directory, in which case the file is created in
    /// that directory.
    #[builder(setter(into, strip_option), default)]
    pub allow_parent_dir_path: Option<bool>,
}

impl File {
    /// Retrieves the contents of the file.
    pub async fn contents(&self) -> Result<String, DaggerError> {
        let query = self.selection.select("contents");

        query.execute(&self.graphql_client).await
    }

    /// Writes the file to a file path on the host.
    pub async fn export(&self, path: impl Into<String>) -> Result<bool, DaggerError> {
        self.export_opts(path, Default::default()).await
    }

    pub async fn export_opts(
        &self,
        path: impl Into<String>,
        opts: FileExportOpts,
    ) -> Result<bool, DaggerError> {
        let query = self
            .selection
            .select("export")
            .arg("path", path.into())
            .arg_opt("allowParentDirPath", opts.allow_parent_dir_path);

        query.execute(&self.graphql_client).await
    }

    /// Retrieves the name of the file.
    pub async fn name(&self) -> Result<String, DaggerError> {
        let query = self.selection.select("name");

        query.execute(&self.graphql_client).await
    }

    /// Retrieves the size of the file, in bytes.
    pub async fn size(&self) -> Result<isize, DaggerError> {
        let query = self.selection.select("size");

        query.execute(&self.graphql_client).await
    }

    /// Force evaluation in the engine.
    pub async fn sync(&self) -> Result<File, DaggerError> {
        let query = self.selection.select("sync");
        query.execute::<FileId>(&self.graphql_client).await?;

        Ok(self.clone())
    }

    /// Retrieves this file with its created/modified timestamps set to the
    /// given time, in seconds since the Unix epoch.
    pub fn with_timestamps(&self, timestamp: isize) -> File {
        let query = self
            .selection
            .select("withTimestamps")
            .arg("timestamp", timestamp);

        self.child(query)
    }
}
