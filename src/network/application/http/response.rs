//! Response built by a handler.

use super::text::{bounded, has_line_break, single_line};
use super::{
    DEFAULT_CONTENT_TYPE, Header, MAX_CONTENT_TYPE_LEN, MAX_HEADERS, MAX_RESPONSE_LEN,
    MAX_STATUS_MESSAGE_LEN,
};
use crate::network::error::Error;
use heapless::{String, Vec};

/// Default status message for a status code.
///
/// Codes without a dedicated message get `"Unknown"` so the status line is
/// never left without one.
pub fn reason_phrase(code: u16) -> &'static str {
    match code {
        200 => "Success",
        201 => "Created",
        204 => "No content",
        400 => "Bad request",
        404 => "Not found",
        405 => "Method not allowed",
        413 => "Payload too large",
        500 => "Internal error",
        503 => "Service unavailable",
        _ => "Unknown",
    }
}

/// A response on its way to the serializer.
///
/// `Content-Length` is never stored here: the serializer derives it from
/// [`body`](Self::body) and drops any header that tries to set it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub code: u16,
    pub message: String<MAX_STATUS_MESSAGE_LEN>,
    pub content_type: String<MAX_CONTENT_TYPE_LEN>,
    pub headers: Vec<Header, MAX_HEADERS>,
    pub body: Vec<u8, MAX_RESPONSE_LEN>,
}

impl Default for Response {
    fn default() -> Self {
        Self::ok()
    }
}

impl Response {
    /// A response with `code`, its default message and no body.
    pub fn with_status(code: u16) -> Self {
        Self::new(code, reason_phrase(code))
    }

    /// A response with an explicit status message.
    ///
    /// Line breaks are removed from the message and the rest is truncated to
    /// capacity.
    pub fn new(code: u16, message: &str) -> Self {
        Self {
            code,
            message: single_line(message),
            content_type: bounded(DEFAULT_CONTENT_TYPE.as_bytes()).0,
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    /// `200 Success`.
    pub fn ok() -> Self {
        Self::with_status(200)
    }

    /// `404 Not found`.
    pub fn not_found() -> Self {
        Self::with_status(404)
    }

    /// `500 Internal error`.
    pub fn internal_error() -> Self {
        Self::with_status(500)
    }

    /// Replace the content type.
    ///
    /// A value containing `\r` or `\n` is refused with
    /// [`Error::ProtocolError`].
    pub fn with_content_type(mut self, content_type: &str) -> Result<Self, Error> {
        if has_line_break(content_type) {
            return Err(Error::ProtocolError);
        }
        self.content_type =
            String::try_from(content_type).map_err(|_| Error::BufferOverflow)?;
        Ok(self)
    }

    /// Append a header.
    pub fn with_header(mut self, name: &str, value: &str) -> Result<Self, Error> {
        self.push_header(name, value)?;
        Ok(self)
    }

    /// Replace the body.
    pub fn with_body(mut self, body: &[u8]) -> Result<Self, Error> {
        self.body = Vec::from_slice(body).map_err(|_| Error::BufferOverflow)?;
        Ok(self)
    }

    /// Append a header in place.
    ///
    /// Names or values containing `\r` or `\n` are refused with
    /// [`Error::ProtocolError`].
    pub fn push_header(&mut self, name: &str, value: &str) -> Result<(), Error> {
        if has_line_break(name) || has_line_break(value) {
            return Err(Error::ProtocolError);
        }
        let header = Header {
            name: String::try_from(name).map_err(|_| Error::BufferOverflow)?,
            value: String::try_from(value).map_err(|_| Error::BufferOverflow)?,
        };
        self.headers.push(header).map_err(|_| Error::BufferOverflow)
    }

    /// A formatter appending to the body.
    ///
    /// ```rust
    /// use core::fmt::Write;
    /// use ethttp::network::application::http::Response;
    ///
    /// let mut resp = Response::ok();
    /// write!(resp.body_writer(), "uptime {}", 42).unwrap();
    /// assert_eq!(&resp.body[..], b"uptime 42");
    /// ```
    pub fn body_writer(&mut self) -> BodyWriter<'_> {
        BodyWriter {
            body: &mut self.body,
        }
    }
}

/// [`core::fmt::Write`] adapter over a response body.
///
/// Writing past the body capacity fails with [`core::fmt::Error`] and keeps
/// the bytes that did fit.
#[derive(Debug)]
pub struct BodyWriter<'a> {
    body: &'a mut Vec<u8, MAX_RESPONSE_LEN>,
}

impl core::fmt::Write for BodyWriter<'_> {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        let room = self.body.capacity() - self.body.len();
        let fits = s.len().min(room);
        // Cannot fail: `fits` is within the remaining capacity.
        let _ = self.body.extend_from_slice(&s.as_bytes()[..fits]);
        if fits < s.len() {
            Err(core::fmt::Error)
        } else {
            Ok(())
        }
    }
}
