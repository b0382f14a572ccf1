use bytes::Bytes;
use http::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use http::{Extensions, Request, StatusCode};
use std::collections::HashMap;

/// A query-string value: single, or a list when the key repeats.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryValue {
    One(String),
    Many(Vec<String>),
}

impl QueryValue {
    /// The first (or only) value.
    pub fn first(&self) -> &str {
        match self {
            QueryValue::One(value) => value,
            QueryValue::Many(values) => values.first().map(String::as_str).unwrap_or(""),
        }
    }

    /// Every value, in query order.
    pub fn all(&self) -> &[String] {
        match self {
            QueryValue::One(value) => std::slice::from_ref(value),
            QueryValue::Many(values) => values,
        }
    }
}

/// Per-request state threaded through a middleware chain.
///
/// A Context belongs to exactly one in-flight request. The router zips
/// captured path parameters into `params` when a binding executes; the
/// transport fills `query` before dispatch. Response state accumulates
/// in `status`/`headers`/`body`; the status starts at 404, so a
/// request no step claims is already a miss.
pub struct Context {
    pub req: Request<Bytes>,
    pub params: HashMap<String, String>,
    pub query: HashMap<String, QueryValue>,
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Option<Bytes>,
    extra: Extensions,
}

impl Context {
    pub fn new(req: Request<Bytes>) -> Self {
        Self {
            req,
            params: HashMap::new(),
            query: HashMap::new(),
            status: StatusCode::NOT_FOUND,
            headers: HeaderMap::new(),
            body: None,
            extra: Extensions::new(),
        }
    }

    /// Captured path parameter, by declared name.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    /// Query-string value, by key.
    pub fn query(&self, name: &str) -> Option<&QueryValue> {
        self.query.get(name)
    }

    /// Claims the request: 200 with the given body.
    pub fn ok(&mut self, body: impl Into<Bytes>) -> &mut Self {
        self.status = StatusCode::OK;
        self.body = Some(body.into());
        self
    }

    /// Marks the request a miss, keeping whatever body is set.
    pub fn not_found(&mut self) -> &mut Self {
        self.status = StatusCode::NOT_FOUND;
        self
    }

    pub fn header(&mut self, name: HeaderName, value: HeaderValue) -> &mut Self {
        self.headers.insert(name, value);
        self
    }

    pub fn content_type(&mut self, value: &'static str) -> &mut Self {
        self.headers.insert(CONTENT_TYPE, HeaderValue::from_static(value));
        self
    }

    /// Insert a typed extension value.
    ///
    /// If a value of this type already exists, it is replaced.
    pub fn insert<T: Clone + Send + Sync + 'static>(&mut self, val: T) {
        self.extra.insert(val);
    }

    pub fn get<T: Send + Sync + 'static>(&self) -> Option<&T> {
        self.extra.get()
    }

    pub fn get_mut<T: Send + Sync + 'static>(&mut self) -> Option<&mut T> {
        self.extra.get_mut()
    }
}
