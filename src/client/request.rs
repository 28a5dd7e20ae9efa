//! Description of one logical API call, before URL and header assembly.

use serde_json::Value;

/// Method, path, query, body and extra headers for [`SendlyClient::request`](super::SendlyClient::request).
///
/// Query parameters keep insertion order. Values passed through
/// [`RequestOptions::query_opt`] as `None` are dropped.
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub(crate) method: http::Method,
    pub(crate) path: String,
    pub(crate) query: Vec<(String, String)>,
    pub(crate) body: Option<Value>,
    pub(crate) headers: Vec<(String, String)>,
}

impl RequestOptions {
    pub fn new(method: http::Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            headers: Vec::new(),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(http::Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(http::Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(http::Method::PUT, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(http::Method::PATCH, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(http::Method::DELETE, path)
    }

    /// Append a query parameter.
    #[must_use]
    pub fn query(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((name.into(), value.to_string()));
        self
    }

    /// Append a query parameter only when `value` is present.
    #[must_use]
    pub fn query_opt<V: ToString>(self, name: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(value) => self.query(name, value),
            None => self,
        }
    }

    /// Set the JSON body.
    #[must_use]
    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Add a header. Replaces a default header with the same name.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn method(&self) -> &http::Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}
