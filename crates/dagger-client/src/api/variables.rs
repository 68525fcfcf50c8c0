use crate::api::{EnvVariableId, LabelId};
use crate::errors::DaggerError;

object!(
    /// An environment variable name and value.
    EnvVariable,
    EnvVariableId
);

object!(
    /// A simple key value object that represents a label.
    Label,
    LabelId
);

impl EnvVariable {
    pub async fn name(&self) -> Result<String, DaggerError> {
        let query = self.selection.select("name");

        query.execute(&self.graphql_client).await
    }

    pub async fn value(&self) -> Result<String, DaggerError> {
        let query = self.selection.select("value");

        query.execute(&self.graphql_client).await
    }
}

impl Label {
    pub async fn name(&self) -> Result<String, DaggerError> {
        let query = self.selection.select("name");

        query.execute(&self.graphql_client).await
    }

    pub async fn value(&self) -> Result<String, DaggerError> {
        let query = self.selection.select("value");

        query.execute(&self.graphql_client).await
    }
}
