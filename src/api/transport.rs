use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use log::{debug, warn};
use reqwest::StatusCode;
use reqwest::blocking::multipart::Form;
use serde_json::Value;

use crate::config::SessionStore;
use crate::error::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FormPart {
    Text(String),
    File(PathBuf),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Empty,
    Json(Value),
    Multipart(Vec<(String, FormPart)>),
}

/// One backend call, independent of how it is carried over the wire.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Body,
}

impl ApiRequest {
    fn new(method: Method, path: impl Into<String>, body: Body) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path, Body::Empty)
    }

    pub fn post(path: impl Into<String>, body: Body) -> Self {
        Self::new(Method::Post, path, body)
    }

    pub fn put(path: impl Into<String>, body: Body) -> Self {
        Self::new(Method::Put, path, body)
    }

    pub fn patch(path: impl Into<String>, body: Body) -> Self {
        Self::new(Method::Patch, path, body)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path, Body::Empty)
    }

    pub fn with_query(mut self, query: Vec<(String, String)>) -> Self {
        self.query = query;
        self
    }

    /// Auth endpoints are the only ones sent without a bearer token.
    pub fn requires_auth(&self) -> bool {
        !self.path.contains("/auth/")
    }

    pub fn query_value(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

pub trait Transport: Send + Sync {
    fn send(&self, request: ApiRequest) -> Result<Value, ApiError>;
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn send(&self, request: ApiRequest) -> Result<Value, ApiError> {
        (**self).send(request)
    }
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn send(&self, request: ApiRequest) -> Result<Value, ApiError> {
        (**self).send(request)
    }
}

/// Blocking HTTP transport. The bearer token is re-read from the session
/// store before every request so a `login` in another shell takes effect
/// without restarting.
pub struct HttpTransport {
    client: reqwest::blocking::Client,
    base_url: String,
    timeout_secs: u64,
    session: SessionStore,
}

impl HttpTransport {
    pub fn new(base_url: &str, timeout_secs: u64, session: SessionStore) -> Result<Self, ApiError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout_secs,
            session,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn map_send_error(&self, e: reqwest::Error) -> ApiError {
        if e.is_timeout() {
            ApiError::Timeout(self.timeout_secs)
        } else if e.is_connect() {
            ApiError::Network(format!("Cannot reach {}", self.base_url))
        } else {
            ApiError::Network(e.to_string())
        }
    }
}

fn build_form(parts: Vec<(String, FormPart)>) -> Result<Form, ApiError> {
    let mut form = Form::new();
    for (name, part) in parts {
        form = match part {
            FormPart::Text(value) => form.text(name, value),
            FormPart::File(path) => form
                .file(name, &path)
                .map_err(|e| ApiError::Validation(format!("Cannot read {}: {}", path.display(), e)))?,
        };
    }
    Ok(form)
}

/// Pull a human message out of an error body, falling back to the raw text.
pub(crate) fn error_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        if let Some(msg) = value.get("message").and_then(Value::as_str) {
            return msg.to_string();
        }
        if let Some(msg) = value.get("error").and_then(Value::as_str) {
            return msg.to_string();
        }
    }
    let trimmed = body.trim();
    if trimmed.len() > 200 {
        let mut end = 200;
        while !trimmed.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}…", &trimmed[..end])
    } else {
        trimmed.to_string()
    }
}

impl Transport for HttpTransport {
    fn send(&self, request: ApiRequest) -> Result<Value, ApiError> {
        let url = format!("{}{}", self.base_url, request.path);
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self.client.request(method, &url).query(&request.query);
        if request.requires_auth() {
            if let Some(token) = self.session.token() {
                builder = builder.bearer_auth(token);
            }
        }
        builder = match request.body {
            Body::Empty => builder,
            Body::Json(value) => builder.json(&value),
            Body::Multipart(parts) => builder.multipart(build_form(parts)?),
        };

        debug!("{} {} {:?}", request.method, url, request.query);
        let response = builder.send().map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            warn!("{} {} rejected: unauthorized", request.method, request.path);
            return Err(ApiError::NotAuthenticated);
        }
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            warn!("{} {} failed with {}", request.method, request.path, status);
            return Err(ApiError::Http {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        let text = response
            .text()
            .map_err(|e| ApiError::Network(e.to_string()))?;
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_paths_skip_bearer_token() {
        assert!(!ApiRequest::post("/auth/send-otp", Body::Empty).requires_auth());
        assert!(!ApiRequest::post("/auth/verify-otp", Body::Empty).requires_auth());
        assert!(ApiRequest::get("/service-booked").requires_auth());
        assert!(ApiRequest::delete("/doula/u1").requires_auth());
    }

    #[test]
    fn error_message_prefers_json_message() {
        assert_eq!(error_message(r#"{"message":"Region not found"}"#), "Region not found");
        assert_eq!(error_message(r#"{"error":"bad status"}"#), "bad status");
        assert_eq!(error_message("  plain text  "), "plain text");
    }

    #[test]
    fn transport_trims_trailing_slash() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::at(dir.path().join("session.json"));
        let transport = HttpTransport::new("http://localhost:4000/api/", 5, store).unwrap();
        assert_eq!(transport.base_url(), "http://localhost:4000/api");
    }

    #[test]
    fn query_value_lookup() {
        let req = ApiRequest::get("/doula")
            .with_query(vec![("page".into(), "2".into()), ("search".into(), "asha".into())]);
        assert_eq!(req.query_value("search"), Some("asha"));
        assert_eq!(req.query_value("limit"), None);
    }
}
