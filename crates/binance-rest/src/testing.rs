//! In-process HTTP server for exercising the client end to end.

use crate::config::ClientConfig;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::Router;
use rest_client::RetryPolicy;
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub(crate) const TEST_API_KEY: &str = "test-api-key";
pub(crate) const TEST_SECRET: &str = "test-secret";

/// One request as the server saw it.
#[derive(Debug, Clone)]
pub(crate) struct CapturedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub body: String,
    pub api_key: Option<String>,
}

impl CapturedRequest {
    /// Decoded query parameter.
    pub fn query_param(&self, name: &str) -> Option<String> {
        let query = self.query.as_deref()?;
        serde_urlencoded::from_str::<Vec<(String, String)>>(query)
            .ok()?
            .into_iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    /// Decoded form body parameter.
    pub fn body_param(&self, name: &str) -> Option<String> {
        serde_urlencoded::from_str::<Vec<(String, String)>>(&self.body)
            .ok()?
            .into_iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }
}

struct MockState {
    status: StatusCode,
    body: String,
    requests: Mutex<Vec<CapturedRequest>>,
}

/// Answers every request with one fixed status and body.
pub(crate) struct MockServer {
    base_url: String,
    state: Arc<MockState>,
}

impl MockServer {
    pub async fn start(status: u16, body: &str) -> Self {
        let state = Arc::new(MockState {
            status: StatusCode::from_u16(status).unwrap(),
            body: body.to_string(),
            requests: Mutex::new(Vec::new()),
        });

        let router = Router::new()
            .fallback(
                |State(state): State<Arc<MockState>>,
                 method: Method,
                 uri: Uri,
                 headers: HeaderMap,
                 body: String| async move {
                    state.requests.lock().unwrap().push(CapturedRequest {
                        method: method.to_string(),
                        path: uri.path().to_string(),
                        query: uri.query().map(str::to_string),
                        body,
                        api_key: headers
                            .get("x-mbx-apikey")
                            .and_then(|v| v.to_str().ok())
                            .map(str::to_string),
                    });
                    (
                        state.status,
                        [
                            ("content-type", "application/json"),
                            ("x-mbx-used-weight-1m", "12"),
                        ],
                        state.body.clone(),
                    )
                },
            )
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        Self {
            base_url: format!("http://{addr}"),
            state,
        }
    }

    /// Config pointing both hosts at this server, with fast retries.
    pub fn config(&self) -> ClientConfig {
        ClientConfig::default()
            .with_base_url(self.base_url.clone())
            .with_alpha_base_url(self.base_url.clone())
            .with_timeout(Duration::from_secs(5))
            .with_retry(RetryPolicy::fixed(0, Duration::from_millis(1)))
    }

    pub fn hits(&self) -> usize {
        self.state.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<CapturedRequest> {
        self.state.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> CapturedRequest {
        self.requests().pop().expect("no request reached the server")
    }
}
