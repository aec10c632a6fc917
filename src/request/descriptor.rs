use std::collections::BTreeMap;

use http::Method;
use serde_json::Value;

/// How the response body should be decoded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResponseType {
    /// Structured JSON (the default)
    #[default]
    Json,

    /// Raw bytes, e.g. an image
    Binary,
}

impl ResponseType {
    /// Value for the `Accept` header.
    pub fn accept(&self) -> &'static str {
        match self {
            ResponseType::Json => "application/json",
            ResponseType::Binary => "*/*",
        }
    }
}

/// Fully specified description of one outbound call.
///
/// Built once per call and consumed by the transport. Fields are only
/// readable after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    route: String,
    method: Method,
    query: BTreeMap<String, String>,
    body: Option<Value>,
    response_type: ResponseType,
}

impl RequestDescriptor {
    /// A GET request for `route` with no parameters.
    pub fn get(route: impl Into<String>) -> Self {
        Self {
            route: route.into(),
            method: Method::GET,
            query: BTreeMap::new(),
            body: None,
            response_type: ResponseType::Json,
        }
    }

    /// A POST request for `route` carrying `body`.
    pub fn post(route: impl Into<String>, body: Value) -> Self {
        Self {
            route: route.into(),
            method: Method::POST,
            query: BTreeMap::new(),
            body: Some(body),
            response_type: ResponseType::Json,
        }
    }

    /// Add a query parameter. A repeated key replaces the earlier value.
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    /// Expect a raw binary response.
    pub fn binary(mut self) -> Self {
        self.response_type = ResponseType::Binary;
        self
    }

    pub fn route(&self) -> &str {
        &self.route
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn query_params(&self) -> &BTreeMap<String, String> {
        &self.query
    }

    pub fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    pub fn response_type(&self) -> ResponseType {
        self.response_type
    }
}
