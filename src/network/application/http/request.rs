//! Parsed HTTP request.

use super::{
    Header, MAX_HEADERS, MAX_METHOD_LEN, MAX_PROTOCOL_LEN, MAX_REQUEST_BODY, MAX_TARGET_LEN,
};
use heapless::{String, Vec};

/// Request methods recognised by [`Request::method_kind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Head,
    Post,
    Put,
    Delete,
    Options,
    Patch,
}

impl Method {
    /// The method token as it appears on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Head => "HEAD",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
            Method::Options => "OPTIONS",
            Method::Patch => "PATCH",
        }
    }

    /// Match a method token exactly (tokens are case-sensitive).
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "GET" => Some(Method::Get),
            "HEAD" => Some(Method::Head),
            "POST" => Some(Method::Post),
            "PUT" => Some(Method::Put),
            "DELETE" => Some(Method::Delete),
            "OPTIONS" => Some(Method::Options),
            "PATCH" => Some(Method::Patch),
            _ => None,
        }
    }
}

/// One request as seen by a handler.
///
/// Every field has a fixed capacity. Fields the input never reached stay
/// empty; the parser never fails, so [`complete`](Self::complete) and
/// [`truncated`](Self::truncated) are the only quality signals.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Request {
    pub method: String<MAX_METHOD_LEN>,
    pub target: String<MAX_TARGET_LEN>,
    pub protocol: String<MAX_PROTOCOL_LEN>,
    /// Stored headers in the order they arrived.
    pub headers: Vec<Header, MAX_HEADERS>,
    /// Value of the `Content-Length` header, 0 when absent or unparsable.
    pub content_length: usize,
    pub body: Vec<u8, MAX_REQUEST_BODY>,
    /// The blank line ending the header block was seen.
    pub complete: bool,
    /// Some token, header or body bytes did not fit and were cut.
    pub truncated: bool,
}

impl Request {
    /// Create an empty request.
    pub fn new() -> Self {
        Self::default()
    }

    /// The method as a known [`Method`], if it is one.
    pub fn method_kind(&self) -> Option<Method> {
        Method::from_token(&self.method)
    }

    /// Value of the first header whose name equals `name` exactly.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|h| h.name.as_str() == name)
            .map(|h| h.value.as_str())
    }

    /// The body as text, if it is valid UTF-8.
    pub fn body_str(&self) -> Option<&str> {
        core::str::from_utf8(&self.body).ok()
    }
}
