use derive_builder::Builder;

use crate::api::{
    load_objects, CurrentModuleId, Directory, File, FunctionCallArgValueId, FunctionCallId,
    Handle, Json, Void,
};
use crate::errors::DaggerError;

object!(
    /// Reflective module API provided to functions at runtime.
    CurrentModule,
    CurrentModuleId
);

object!(
    /// An active function call.
    FunctionCall,
    FunctionCallId
);

object!(
    /// A value passed as a named argument to a function call.
    FunctionCallArgValue,
    FunctionCallArgValueId
);

#[derive(Builder, Debug, PartialEq, Clone, Default)]
pub struct CurrentModuleWorkdirOpts {
    /// Exclude artifacts that match the given pattern (e.g.,
    /// `["node_modules/", ".git*"]`).
    #[builder(setter(into, strip_option), default)]
    pub exclude: Option<Vec<String>>,
    /// Include only artifacts that match the given pattern (e.g.,
    /// `["app/", "package.*"]`).
    #[builder(setter(into, strip_option), default)]
    pub include: Option<Vec<String>>,
}

impl CurrentModule {
    /// The name of the module being executed in.
    pub async fn name(&self) -> Result<String, DaggerError> {
        let query = self.selection.select("name");

        query.execute(&self.graphql_client).await
    }

    /// The directory containing the module's source code loaded into the
    /// engine, plus any generated code.
    pub fn source(&self) -> Directory {
        self.child(self.selection.select("source"))
    }

    pub fn workdir(&self, path: impl Into<String>) -> Directory {
        self.workdir_opts(path, Default::default())
    }

    /// Load a directory from the module's scratch working directory,
    /// including any changes made to it during function execution.
    pub fn workdir_opts(&self, path: impl Into<String>, opts: CurrentModuleWorkdirOpts) -> Directory {
        let query = self
            .selection
            .select("workdir")
            .arg("path", path.into())
            .arg_opt("exclude", opts.exclude)
            .arg_opt("include", opts.include);

        self.child(query)
    }

    /// Load a file from the module's scratch working directory.
    pub fn workdir_file(&self, path: impl Into<String>) -> File {
        let query = self.selection.select("workdirFile").arg("path", path.into());

        self.child(query)
    }
}

impl FunctionCall {
    /// The argument values the function is being invoked with.
    pub async fn input_args(&self) -> Result<Vec<FunctionCallArgValue>, DaggerError> {
        load_objects(self, self.selection.select("inputArgs")).await
    }

    /// The name of the function being called.
    pub async fn name(&self) -> Result<String, DaggerError> {
        let query = self.selection.select("name");

        query.execute(&self.graphql_client).await
    }

    /// The value of the parent object of the function being called. Always an
    /// empty object for functions at the top level of a module.
    pub async fn parent(&self) -> Result<Json, DaggerError> {
        let query = self.selection.select("parent");

        query.execute(&self.graphql_client).await
    }

    /// The name of the parent object of the function being called. The module
    /// name for functions at the top level of a module.
    pub async fn parent_name(&self) -> Result<String, DaggerError> {
        let query = self.selection.select("parentName");

        query.execute(&self.graphql_client).await
    }

    /// Set the return value of the function call to the provided value.
    pub async fn return_value(&self, value: impl Into<Json>) -> Result<Void, DaggerError> {
        let query = self
            .selection
            .select("returnValue")
            .arg("value", value.into());

        query.execute(&self.graphql_client).await
    }
}

impl FunctionCallArgValue {
    pub async fn name(&self) -> Result<String, DaggerError> {
        let query = self.selection.select("name");

        query.execute(&self.graphql_client).await
    }

    /// The value of the argument represented as a JSON serialized string.
    pub async fn value(&self) -> Result<Json, DaggerError> {
        let query = self.selection.select("value");

        query.execute(&self.graphql_client).await
    }
}
