use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use dagger_client::core::gql_client::GraphQLErrorMessage;
use dagger_client::core::graphql_client::GraphqlErrorMessages;
use dagger_client::{GraphQLClient, GraphQLError, Query};

type Response = Result<Option<serde_json::Value>, GraphQLError>;

/// Records every query document and answers with canned responses, in order.
#[derive(Default)]
pub struct Recorder {
    queries: Mutex<Vec<String>>,
    responses: Mutex<VecDeque<Response>>,
}

impl Recorder {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn respond(&self, data: serde_json::Value) {
        self.responses.lock().unwrap().push_back(Ok(Some(data)));
    }

    pub fn fail(&self, err: GraphQLError) {
        self.responses.lock().unwrap().push_back(Err(err));
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl GraphQLClient for Recorder {
    async fn query(&self, query: &str) -> Response {
        self.queries.lock().unwrap().push(query.to_string());

        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(None))
    }
}

pub fn client() -> (Query, Arc<Recorder>) {
    let recorder = Recorder::new();

    (Query::new(recorder.clone()), recorder)
}

pub fn domain_error(message: &str, extensions: serde_json::Value) -> GraphQLError {
    let message: GraphQLErrorMessage = serde_json::from_value(serde_json::json!({
        "message": message,
        "extensions": extensions,
    }))
    .unwrap();

    GraphQLError::DomainError {
        message: "Look at json field for more details".into(),
        fields: GraphqlErrorMessages(vec![message]),
    }
}
