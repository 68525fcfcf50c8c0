use std::collections::HashMap;
use std::fmt::{self, Formatter};
use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};

// https://spec.graphql.org/October2021/#sec-Errors
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct GraphQLErrorMessage {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locations: Option<Vec<GraphQLErrorLocation>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<serde_json::Map<String, serde_json::Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<Vec<GraphQLErrorPathParam>>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct GraphQLErrorLocation {
    pub line: u32,
    pub column: u32,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum GraphQLErrorPathParam {
    String(String),
    Number(u32),
}

/// A failed round trip to the GraphQL endpoint.
#[derive(Clone)]
pub struct GQLClientError {
    message: String,
    json: Option<Vec<GraphQLErrorMessage>>,
}

impl GQLClientError {
    pub fn with_text(message: impl AsRef<str>) -> Self {
        Self {
            message: message.as_ref().to_string(),
            json: None,
        }
    }

    pub fn with_message_and_json(message: impl AsRef<str>, json: Vec<GraphQLErrorMessage>) -> Self {
        Self {
            message: message.as_ref().to_string(),
            json: Some(json),
        }
    }

    pub fn with_json(json: Vec<GraphQLErrorMessage>) -> Self {
        Self::with_message_and_json("Look at json field for more details", json)
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn json(&self) -> Option<&[GraphQLErrorMessage]> {
        self.json.as_deref()
    }

    pub fn into_json(self) -> Option<Vec<GraphQLErrorMessage>> {
        self.json
    }
}

fn format(err: &GQLClientError, f: &mut Formatter<'_>) -> fmt::Result {
    writeln!(f, "\nGQLClient Error: {}", err.message)?;

    for msg in err.json.iter().flatten() {
        writeln!(f, "Message: {}", msg.message)?;
    }

    Ok(())
}

impl fmt::Display for GQLClientError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        format(self, f)
    }
}

impl fmt::Debug for GQLClientError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        format(self, f)
    }
}

impl std::error::Error for GQLClientError {}

impl From<reqwest::Error> for GQLClientError {
    fn from(error: reqwest::Error) -> Self {
        Self::with_text(error.to_string())
    }
}

/// GQL client config
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct ClientConfig {
    /// the endpoint of the graphql server
    pub endpoint: String,
    /// query timeout in milliseconds; unbounded when unset
    pub timeout_ms: Option<u64>,
    /// additional request headers
    pub headers: Option<HashMap<String, String>>,
}

#[derive(Clone, Debug)]
pub struct GQLClient {
    config: ClientConfig,
    client: Client,
}

#[derive(Serialize)]
struct RequestBody<'a, T: Serialize> {
    query: &'a str,
    variables: T,
}

#[derive(Deserialize, Debug)]
struct GraphQLResponse<T> {
    data: Option<T>,
    errors: Option<Vec<GraphQLErrorMessage>>,
}

impl GQLClient {
    pub fn new(endpoint: impl AsRef<str>) -> Result<Self, GQLClientError> {
        Self::new_with_config(ClientConfig {
            endpoint: endpoint.as_ref().to_string(),
            ..Default::default()
        })
    }

    pub fn new_with_config(config: ClientConfig) -> Result<Self, GQLClientError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout_ms {
            builder = builder.timeout(Duration::from_millis(timeout));
        }

        let client = builder
            .build()
            .map_err(|e| GQLClientError::with_text(format!("Can not create client: {:?}", e)))?;

        Ok(Self { config, client })
    }

    pub fn endpoint(&self) -> &str {
        &self.config.endpoint
    }

    pub async fn query<K>(&self, query: &str) -> Result<Option<K>, GQLClientError>
    where
        K: for<'de> Deserialize<'de>,
    {
        self.query_with_vars::<K, HashMap<String, ()>>(query, HashMap::new())
            .await
    }

    pub async fn query_with_vars<K, T: Serialize>(
        &self,
        query: &str,
        variables: T,
    ) -> Result<Option<K>, GQLClientError>
    where
        K: for<'de> Deserialize<'de>,
    {
        let body = RequestBody { query, variables };

        let mut request = self.client.post(&self.config.endpoint).json(&body);
        for (name, value) in self.config.headers.iter().flatten() {
            request = request.header(name, value);
        }

        let raw_response = request.send().await?;
        let status = raw_response.status();
        let response_body_text = raw_response
            .text()
            .await
            .map_err(|e| GQLClientError::with_text(format!("Can not get response: {:?}", e)))?;

        let json: GraphQLResponse<K> = match serde_json::from_str(&response_body_text) {
            Ok(json) => json,
            Err(_) if !status.is_success() => {
                return Err(GQLClientError::with_text(format!(
                    "The response is [{}]: {}",
                    status.as_u16(),
                    response_body_text
                )))
            }
            Err(e) => {
                return Err(GQLClientError::with_text(format!(
                    "Failed to parse response: {:?}. The response body is: {}",
                    e, response_body_text
                )))
            }
        };

        if !status.is_success() {
            return Err(GQLClientError::with_message_and_json(
                format!("The response is [{}]", status.as_u16()),
                json.errors.unwrap_or_default(),
            ));
        }

        if let Some(errors) = json.errors.filter(|e| !e.is_empty()) {
            return Err(GQLClientError::with_json(errors));
        }

        if json.data.is_none() {
            tracing::warn!(
                target = "gql-client",
                response_text = response_body_text,
                "The deserialized data is none, the response",
            );
        }

        Ok(json.data)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::{ClientConfig, GQLClient};

    #[tokio::test]
    async fn test_query_returns_data() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/query")
            .match_header("x-test", "1")
            .match_body(mockito::Matcher::PartialJson(
                json!({"query": "query{container{id}}"}),
            ))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"data":{"container":{"id":"abc"}}}"#)
            .create_async()
            .await;

        let client = GQLClient::new_with_config(ClientConfig {
            endpoint: format!("{}/query", server.url()),
            timeout_ms: None,
            headers: Some([("x-test".to_string(), "1".to_string())].into()),
        })
        .unwrap();

        let data: Option<serde_json::Value> = client.query("query{container{id}}").await.unwrap();

        assert_eq!(data, Some(json!({"container": {"id": "abc"}})));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_query_keeps_error_extensions() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/query")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "data": null,
                    "errors": [{
                        "message": "exit code: 1",
                        "path": ["container", "withExec", 0],
                        "extensions": {"_type": "EXEC_ERROR", "exitCode": 1}
                    }]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let client = GQLClient::new(format!("{}/query", server.url())).unwrap();

        let err = client
            .query::<serde_json::Value>("query{container{withExec{stdout}}}")
            .await
            .unwrap_err();

        let errors = err.json().unwrap();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "exit code: 1");
        assert_eq!(
            errors[0].extensions.as_ref().unwrap().get("exitCode"),
            Some(&json!(1))
        );
    }

    #[tokio::test]
    async fn test_query_non_json_server_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/query")
            .with_status(502)
            .with_body("bad gateway")
            .create_async()
            .await;

        let client = GQLClient::new(format!("{}/query", server.url())).unwrap();

        let err = client
            .query::<serde_json::Value>("query{a}")
            .await
            .unwrap_err();

        assert!(err.json().is_none());
        assert_eq!(err.message(), "The response is [502]: bad gateway");
    }
}
