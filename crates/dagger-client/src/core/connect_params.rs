use serde::Deserialize;

/// Where and how to reach a running engine session.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct ConnectParams {
    pub port: u64,
    pub session_token: String,
}

impl ConnectParams {
    pub fn new(port: u64, session_token: &str) -> Self {
        Self {
            port,
            session_token: session_token.to_string(),
        }
    }

    pub fn url(&self) -> String {
        format!("http://127.0.0.1:{}/query", self.port)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::ConnectParams;

    #[test]
    fn test_url() {
        let params = ConnectParams::new(8080, "token");

        assert_eq!(params.url(), "http://127.0.0.1:8080/query");
    }

    #[test]
    fn test_parse_session_line() {
        let params: ConnectParams =
            serde_json::from_str(r#"{"port":1234,"session_token":"abc"}"#).unwrap();

        assert_eq!(params, ConnectParams::new(1234, "abc"));
    }
}
