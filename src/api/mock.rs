use std::sync::Mutex;

use serde_json::Value;

use super::transport::{ApiRequest, Method, Transport};
use crate::error::ApiError;

/// Scripted transport for tests: answers by (method, path) and records every
/// request it sees.
pub struct MockTransport {
    routes: Vec<(Method, String, Result<Value, ApiError>)>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            routes: Vec::new(),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn on(mut self, method: Method, path: &str, response: Result<Value, ApiError>) -> Self {
        self.routes.push((method, path.to_string(), response));
        self
    }

    pub fn ok(self, method: Method, path: &str, body: Value) -> Self {
        self.on(method, path, Ok(body))
    }

    pub fn fail(self, method: Method, path: &str, status: u16) -> Self {
        self.on(
            method,
            path,
            Err(ApiError::Http {
                status,
                message: "server error".to_string(),
            }),
        )
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }

    pub fn last_request(&self) -> Option<ApiRequest> {
        self.requests().pop()
    }
}

impl Transport for MockTransport {
    fn send(&self, request: ApiRequest) -> Result<Value, ApiError> {
        let response = self
            .routes
            .iter()
            .find(|(m, p, _)| *m == request.method && *p == request.path)
            .map(|(_, _, r)| r.clone())
            .unwrap_or_else(|| {
                Err(ApiError::Http {
                    status: 404,
                    message: format!("no route for {} {}", request.method, request.path),
                })
            });
        if let Ok(mut log) = self.requests.lock() {
            log.push(request);
        }
        response
    }
}
