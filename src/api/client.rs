use serde::de::DeserializeOwned;
use serde_json::Value;

use super::envelope::{decode_item, decode_list, Page};
use super::transport::{ApiRequest, Transport};
use crate::error::ApiError;

/// Typed front of the admin REST API. Endpoint methods live in
/// `endpoints.rs`; this file holds the decoding plumbing they share.
pub struct AdminClient<T: Transport> {
    transport: T,
    image_base_url: Option<String>,
}

impl<T: Transport> AdminClient<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            image_base_url: None,
        }
    }

    pub fn with_image_base_url(mut self, url: Option<String>) -> Self {
        self.image_base_url = url.filter(|u| !u.trim().is_empty());
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn image_base_url(&self) -> Option<&str> {
        self.image_base_url.as_deref()
    }

    pub(crate) fn get_value(
        &self,
        path: &str,
        query: Vec<(String, String)>,
    ) -> Result<Value, ApiError> {
        self.transport.send(ApiRequest::get(path).with_query(query))
    }

    pub(crate) fn get_list<E: DeserializeOwned>(
        &self,
        path: &str,
        query: Vec<(String, String)>,
    ) -> Result<Page<E>, ApiError> {
        decode_list(self.get_value(path, query)?)
    }

    pub(crate) fn get_item<E: DeserializeOwned>(&self, path: &str) -> Result<E, ApiError> {
        decode_item(self.get_value(path, Vec::new())?)
    }

    /// Lookup lists come either wrapped in `{data: [...]}` or bare.
    pub(crate) fn get_vec<E: DeserializeOwned>(
        &self,
        path: &str,
        query: Vec<(String, String)>,
    ) -> Result<Vec<E>, ApiError> {
        let value = self.get_value(path, query)?;
        let data = match value {
            Value::Object(mut map) => map.remove("data").unwrap_or(Value::Null),
            other => other,
        };
        if data.is_null() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_value(data)?)
    }

    /// Mutations whose response body is not needed.
    pub(crate) fn send_unit(&self, request: ApiRequest) -> Result<(), ApiError> {
        self.transport.send(request).map(|_| ())
    }

    pub(crate) fn send_item<E: DeserializeOwned>(&self, request: ApiRequest) -> Result<E, ApiError> {
        decode_item(self.transport.send(request)?)
    }
}
