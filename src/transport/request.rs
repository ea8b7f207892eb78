//! Outbound request and per-call context.

use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

use super::{HttpMethod, HEADER_CONTENT_TYPE};
use crate::errors::OrchestratorResult;

/// Request body, serialized at construction time.
#[derive(Clone, PartialEq, Eq)]
pub enum RequestBody {
    /// JSON document.
    Json(Vec<u8>),
    /// `application/x-www-form-urlencoded` pairs.
    Form(String),
}

impl RequestBody {
    /// Returns the raw payload bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            RequestBody::Json(bytes) => bytes,
            RequestBody::Form(encoded) => encoded.into_bytes(),
        }
    }

    /// Returns the payload length in bytes.
    pub fn len(&self) -> usize {
        match self {
            RequestBody::Json(bytes) => bytes.len(),
            RequestBody::Form(encoded) => encoded.len(),
        }
    }

    /// Returns true if the payload is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for RequestBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Form bodies carry client secrets.
        match self {
            RequestBody::Json(bytes) => write!(f, "Json({} bytes)", bytes.len()),
            RequestBody::Form(encoded) => write!(f, "Form({} bytes)", encoded.len()),
        }
    }
}

/// A request as built by a caller of the pipeline.
///
/// Header names are unique without regard to case; setting a header that is
/// already present replaces it.
#[derive(Clone)]
pub struct OutboundRequest {
    /// HTTP method.
    pub method: HttpMethod,
    /// Absolute URL without the query parameters below.
    pub url: String,
    /// Request body.
    pub body: Option<RequestBody>,
    /// Request headers.
    pub headers: HashMap<String, String>,
    /// Query parameters, appended URL-encoded at dispatch.
    pub query: BTreeMap<String, String>,
}

impl OutboundRequest {
    /// Creates a request with no body, headers or query parameters.
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            body: None,
            headers: HashMap::new(),
            query: BTreeMap::new(),
        }
    }

    /// Creates a new GET request.
    pub fn get(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, url)
    }

    /// Creates a new POST request.
    pub fn post(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, url)
    }

    /// Creates a new PUT request.
    pub fn put(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Put, url)
    }

    /// Creates a new DELETE request.
    pub fn delete(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, url)
    }

    /// Serializes `body` as the JSON payload.
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> OrchestratorResult<Self> {
        self.body = Some(RequestBody::Json(serde_json::to_vec(body)?));
        Ok(self)
    }

    /// Sets a form-encoded payload and the matching content type.
    pub fn form<'a, I>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let encoded = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(pairs)
            .finish();
        self.body = Some(RequestBody::Form(encoded));
        self.header(
            HEADER_CONTENT_TYPE,
            mime::APPLICATION_WWW_FORM_URLENCODED.as_ref(),
        )
    }

    /// Sets a header, replacing any existing header of the same name.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        set_header(&mut self.headers, name.into(), value.into());
        self
    }

    /// Sets every header from `headers`.
    pub fn headers<I, K, V>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (name, value) in headers {
            set_header(&mut self.headers, name.into(), value.into());
        }
        self
    }

    /// Adds a query parameter.
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    /// Adds every query parameter from `params`.
    pub fn queries<I, K, V>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.query
            .extend(params.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Returns the value of a header, matched without regard to case.
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

impl fmt::Debug for OutboundRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut header_names: Vec<&String> = self.headers.keys().collect();
        header_names.sort();

        f.debug_struct("OutboundRequest")
            .field("method", &self.method)
            .field("url", &self.url)
            .field("headers", &header_names)
            .field("query", &self.query)
            .field("body", &self.body)
            .finish()
    }
}

/// Inserts a header, dropping any existing entry whose name differs only in case.
pub(crate) fn set_header(headers: &mut HashMap<String, String>, name: String, value: String) {
    headers.retain(|k, _| !k.eq_ignore_ascii_case(&name));
    headers.insert(name, value);
}

/// Tenant and folder scope for one pipeline call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    /// Tenant the request is addressed to.
    pub tenant_name: String,
    /// Folder (organization unit) the request is scoped to.
    pub organization_unit_id: Option<u64>,
}

impl RequestContext {
    /// Creates a context for a tenant with no folder scope.
    pub fn new(tenant_name: impl Into<String>) -> Self {
        Self {
            tenant_name: tenant_name.into(),
            organization_unit_id: None,
        }
    }

    /// Scopes the context to a folder.
    pub fn with_organization_unit(mut self, organization_unit_id: u64) -> Self {
        self.organization_unit_id = Some(organization_unit_id);
        self
    }
}
