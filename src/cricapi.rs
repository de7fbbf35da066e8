use serde_json::Value;
use thiserror::Error;

use crate::config::IngestConfig;
use crate::field::Field;
use crate::http_client::http_client;

const SCORECARD_ENDPOINT: &str = "match_scorecard";
const SERIES_INFO_ENDPOINT: &str = "series_info";
const SUCCESS_STATUS: &str = "success";

#[derive(Debug, Error)]
pub enum FetchError {
    /// Network failure, timeout, or a non-2xx response.
    #[error("transport error: {0}")]
    Transport(String),
    #[error("malformed response body: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error(
        "upstream rejected request (status={status}, reason={})",
        .reason.as_deref().unwrap_or("n/a")
    )]
    UpstreamRejected {
        status: String,
        reason: Option<String>,
    },
    #[error("upstream returned no data")]
    Empty,
}

/// Anything that can hand back one match scorecard by identifier.
pub trait ScorecardSource {
    fn fetch_scorecard(&self, match_id: &str) -> Result<Value, FetchError>;
}

#[derive(Debug, Clone)]
pub struct CricApiClient {
    base_url: String,
    api_key: Option<String>,
}

impl CricApiClient {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        }
    }

    pub fn from_config(cfg: &IngestConfig) -> Self {
        Self::new(cfg.base_url.clone(), cfg.api_key.clone())
    }

    pub fn fetch_series_info(&self, series_id: &str) -> Result<Value, FetchError> {
        self.get_data(SERIES_INFO_ENDPOINT, series_id)
    }

    fn get_data(&self, endpoint: &str, id: &str) -> Result<Value, FetchError> {
        let client = http_client().map_err(|err| FetchError::Transport(format!("{err:#}")))?;
        let url = format!("{}/{endpoint}", self.base_url);
        let api_key = self.api_key.as_deref().unwrap_or_default();

        let resp = client
            .get(&url)
            .query(&[("apikey", api_key), ("id", id)])
            .send()
            .map_err(transport)?;
        let status = resp.status();
        let body = resp.text().map_err(transport)?;
        if !status.is_success() {
            return Err(FetchError::Transport(format!(
                "http {}: {}",
                status,
                body_snippet(&body)
            )));
        }
        parse_envelope(&body)
    }
}

impl ScorecardSource for CricApiClient {
    fn fetch_scorecard(&self, match_id: &str) -> Result<Value, FetchError> {
        self.get_data(SCORECARD_ENDPOINT, match_id)
    }
}

/// Unwraps the `{status, data}` envelope every CricAPI endpoint returns.
pub fn parse_envelope(body: &str) -> Result<Value, FetchError> {
    let root: Value = serde_json::from_str(body.trim())?;
    let status = Field::of(&root).get("status").string();
    if status.as_deref() != Some(SUCCESS_STATUS) {
        return Err(FetchError::UpstreamRejected {
            status: status.unwrap_or_else(|| "missing".to_string()),
            reason: Field::of(&root).get("reason").string(),
        });
    }

    let data = match root {
        Value::Object(mut map) => map.remove("data"),
        _ => None,
    };
    match data {
        None | Some(Value::Null) => Err(FetchError::Empty),
        Some(Value::Object(map)) if map.is_empty() => Err(FetchError::Empty),
        Some(Value::Array(items)) if items.is_empty() => Err(FetchError::Empty),
        Some(data) => Ok(data),
    }
}

// The request URL carries the credential, so it is stripped from the error.
fn transport(err: reqwest::Error) -> FetchError {
    FetchError::Transport(err.without_url().to_string())
}

fn body_snippet(body: &str) -> String {
    body.trim()
        .replace(['\n', '\r'], " ")
        .chars()
        .take(220)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread::{self, JoinHandle};

    const KEY: &str = "secret-key-123";

    /// Answers exactly one request with the given status line and body and
    /// hands back the raw request head it received.
    fn serve_once(status_line: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind local listener");
        let addr = listener.local_addr().expect("local addr");
        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().expect("accept");
            let mut head = Vec::new();
            let mut chunk = [0u8; 1024];
            while !head.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = stream.read(&mut chunk).expect("read request");
                if n == 0 {
                    break;
                }
                head.extend_from_slice(&chunk[..n]);
            }
            let resp = format!(
                "{status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(resp.as_bytes()).expect("write response");
            String::from_utf8_lossy(&head).into_owned()
        });
        (format!("http://{addr}/v1/"), handle)
    }

    #[test]
    fn server_error_is_transport_with_snippet() {
        let (base, server) = serve_once("HTTP/1.1 500 Internal Server Error", "upstream exploded");
        let client = CricApiClient::new(base, Some(KEY.to_string()));

        let err = client.fetch_scorecard("m-42").unwrap_err();
        let request = server.join().expect("server thread");

        assert!(request.starts_with("GET /v1/match_scorecard?"), "{request}");
        assert!(request.contains(&format!("apikey={KEY}")));
        assert!(request.contains("id=m-42"));
        match &err {
            FetchError::Transport(msg) => {
                assert!(msg.contains("500"), "{msg}");
                assert!(msg.contains("upstream exploded"), "{msg}");
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(!err.to_string().contains(KEY));
    }

    #[test]
    fn failure_status_over_http_is_rejected() {
        let (base, server) = serve_once(
            "HTTP/1.1 200 OK",
            r#"{"status":"failure","reason":"hits today exceeded hits limit"}"#,
        );
        let client = CricApiClient::new(base, Some(KEY.to_string()));

        let err = client.fetch_series_info("series-1").unwrap_err();
        let request = server.join().expect("server thread");

        assert!(request.starts_with("GET /v1/series_info?"), "{request}");
        match err {
            FetchError::UpstreamRejected { status, reason } => {
                assert_eq!(status, "failure");
                assert_eq!(reason.as_deref(), Some("hits today exceeded hits limit"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn success_over_http_yields_data() {
        let (base, server) = serve_once(
            "HTTP/1.1 200 OK",
            r#"{"status":"success","data":{"id":"m-7","teams":["A","B"]}}"#,
        );
        let client = CricApiClient::new(base, Some(KEY.to_string()));

        let data = client.fetch_scorecard("m-7").expect("scorecard");
        server.join().expect("server thread");
        assert_eq!(data["teams"][0], "A");
    }

    #[test]
    fn refused_connection_is_transport_without_credential() {
        let addr = {
            let listener = TcpListener::bind("127.0.0.1:0").expect("bind local listener");
            listener.local_addr().expect("local addr")
        };
        let client = CricApiClient::new(format!("http://{addr}/v1"), Some(KEY.to_string()));

        let err = client.fetch_scorecard("m-1").unwrap_err();
        assert!(matches!(err, FetchError::Transport(_)), "{err:?}");
        assert!(!err.to_string().contains(KEY), "{err}");
        assert!(!format!("{err:?}").contains(KEY), "{err:?}");
    }

    #[test]
    fn success_envelope_yields_data() {
        let data = parse_envelope(r#"{"status":"success","data":{"id":"m1"}}"#).unwrap();
        assert_eq!(data["id"], "m1");
    }

    #[test]
    fn failure_status_is_rejected_with_reason() {
        let err = parse_envelope(r#"{"status":"failure","reason":"Invalid API Key"}"#)
            .unwrap_err();
        match err {
            FetchError::UpstreamRejected { status, reason } => {
                assert_eq!(status, "failure");
                assert_eq!(reason.as_deref(), Some("Invalid API Key"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn missing_status_is_rejected() {
        assert!(matches!(
            parse_envelope(r#"{"data":{"id":"m1"}}"#),
            Err(FetchError::UpstreamRejected { .. })
        ));
    }

    #[test]
    fn empty_or_absent_data_is_empty() {
        for body in [
            r#"{"status":"success"}"#,
            r#"{"status":"success","data":null}"#,
            r#"{"status":"success","data":{}}"#,
        ] {
            assert!(matches!(parse_envelope(body), Err(FetchError::Empty)), "{body}");
        }
    }

    #[test]
    fn non_json_body_is_malformed() {
        assert!(matches!(
            parse_envelope("<html>gateway</html>"),
            Err(FetchError::Malformed(_))
        ));
    }

    #[test]
    fn snippet_is_single_line_and_bounded() {
        let body = format!("line one\nline two\r\n{}", "x".repeat(500));
        let snippet = body_snippet(&body);
        assert!(!snippet.contains('\n'));
        assert_eq!(snippet.chars().count(), 220);
    }
}
