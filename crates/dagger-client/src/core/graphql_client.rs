use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use base64::engine::general_purpose;
use base64::Engine;
use thiserror::Error;

use crate::core::connect_params::ConnectParams;
use crate::core::gql_client::{ClientConfig, GQLClient, GQLClientError, GraphQLErrorMessage};

/// Sends a query document and returns the `data` member of the response.
#[async_trait]
pub trait GraphQLClient {
    async fn query(&self, query: &str) -> Result<Option<serde_json::Value>, GraphQLError>;
}

pub type DynGraphQLClient = Arc<dyn GraphQLClient + Send + Sync>;

#[derive(Debug)]
pub struct DefaultGraphQLClient {
    client: GQLClient,
}

impl DefaultGraphQLClient {
    pub fn new(conn: &ConnectParams, execute_timeout_ms: Option<u64>) -> Result<Self, GraphQLError> {
        let token = general_purpose::STANDARD.encode(format!("{}:", conn.session_token));

        let mut headers = HashMap::new();
        headers.insert("Authorization".to_string(), format!("Basic {}", token));

        let client = GQLClient::new_with_config(ClientConfig {
            endpoint: conn.url(),
            timeout_ms: execute_timeout_ms,
            headers: Some(headers),
        })
        .map_err(map_graphql_error)?;

        Ok(Self { client })
    }
}

#[async_trait]
impl GraphQLClient for DefaultGraphQLClient {
    async fn query(&self, query: &str) -> Result<Option<serde_json::Value>, GraphQLError> {
        self.client.query(query).await.map_err(map_graphql_error)
    }
}

fn map_graphql_error(gql_error: GQLClientError) -> GraphQLError {
    let message = gql_error.message().to_string();

    match gql_error.into_json() {
        Some(json) if !json.is_empty() => GraphQLError::DomainError {
            message,
            fields: GraphqlErrorMessages(json),
        },
        _ => GraphQLError::HttpError(message),
    }
}

#[derive(Error, Debug, Clone)]
pub enum GraphQLError {
    #[error("http error: {0}")]
    HttpError(String),
    #[error("domain error:\n{message}\n{fields}")]
    DomainError {
        message: String,
        fields: GraphqlErrorMessages,
    },
}

impl GraphQLError {
    /// The individual GraphQL errors of the response, if the server sent any.
    pub fn messages(&self) -> Option<&[GraphQLErrorMessage]> {
        match self {
            GraphQLError::HttpError(_) => None,
            GraphQLError::DomainError { fields, .. } => Some(&fields.0),
        }
    }
}

#[derive(Debug, Clone)]
pub struct GraphqlErrorMessages(pub Vec<GraphQLErrorMessage>);

impl std::fmt::Display for GraphqlErrorMessages {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for error in self.0.iter() {
            writeln!(f, "{}", error.message)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{DefaultGraphQLClient, GraphQLClient, GraphQLError};
    use crate::core::connect_params::ConnectParams;

    fn params(server: &mockito::ServerGuard) -> ConnectParams {
        let port = server
            .host_with_port()
            .rsplit(':')
            .next()
            .and_then(|p| p.parse().ok())
            .unwrap();

        ConnectParams::new(port, "token")
    }

    #[tokio::test]
    async fn test_sends_session_token_as_basic_auth() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/query")
            .match_header("authorization", "Basic dG9rZW46")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"data":{"defaultPlatform":"linux/amd64"}}"#)
            .create_async()
            .await;

        let client = DefaultGraphQLClient::new(&params(&server), None).unwrap();
        let data = client.query("query{defaultPlatform}").await.unwrap();

        assert_eq!(
            data,
            Some(serde_json::json!({"defaultPlatform": "linux/amd64"}))
        );
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_maps_graphql_errors_to_domain_errors() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/query")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"data":null,"errors":[{"message":"no such field"}]}"#)
            .create_async()
            .await;

        let client = DefaultGraphQLClient::new(&params(&server), None).unwrap();
        let err = client.query("query{nope}").await.unwrap_err();

        match &err {
            GraphQLError::DomainError { fields, .. } => {
                assert_eq!(fields.0[0].message, "no such field")
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(err.messages().map(|m| m.len()), Some(1));
    }

    #[tokio::test]
    async fn test_maps_transport_failures_to_http_errors() {
        let client = DefaultGraphQLClient::new(&ConnectParams::new(1, "token"), Some(500)).unwrap();

        let err = client.query("query{a}").await.unwrap_err();

        assert!(matches!(err, GraphQLError::HttpError(_)));
    }
}
