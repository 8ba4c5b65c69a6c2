//! HTTP server engine for embedded systems.
//!
//! This module provides a lightweight HTTP server designed specifically for
//! microcontrollers and `no_std` environments. It focuses on predictable
//! memory usage: every buffer has a fixed capacity that is known at compile
//! time, and nothing is allocated.
//!
//! # Pipeline
//!
//! ```text
//! ┌──────────┐   ┌──────────┐   ┌─────────────┐   ┌─────────┐   ┌────────────┐
//! │ Listener │──▶│  Parser  │──▶│ Route Table │──▶│ Handler │──▶│ Serializer │
//! └──────────┘   └──────────┘   └─────────────┘   └─────────┘   └────────────┘
//!       ▲                                                              │
//!       └────────────────────── write + close ◀────────────────────────┘
//! ```
//!
//! # Wire format
//!
//! Lines are separated by a single `\n` (a `\r\n` pair is tolerated on
//! input), header names are case-sensitive, and the connection is closed
//! after every response:
//!
//! ```text
//! HTTP/1.1 200 Success
//! Content-Type: text/plain; charset=utf-8
//! Content-Length: 12
//!
//! Hello World!
//! ```
//!
//! # Usage
//!
//! ```rust
//! use ethttp::network::application::http::{Parser, Request, Response, RouteTable, Serializer};
//!
//! fn hello(_req: &Request) -> Response {
//!     Response::ok().with_body(b"Hello World!").unwrap_or_default()
//! }
//!
//! let mut routes: RouteTable<'_> = RouteTable::new();
//! routes.register_fn("/", hello).unwrap();
//!
//! let request = Parser::new().parse(b"GET / HTTP/1.1\nHost: device\n\n");
//! let response = routes.dispatch(&request);
//!
//! let mut wire: heapless::Vec<u8, 512> = heapless::Vec::new();
//! Serializer::new().serialize(&response, &mut wire).unwrap();
//! assert!(wire.starts_with(b"HTTP/1.1 200 Success\n"));
//! ```

use heapless::String;

pub mod parser;
pub mod request;
pub mod response;
pub mod router;
pub mod serializer;
pub mod server;
mod text;


pub use parser::{BodyFraming, Parser, ParserConfig, Stage};
pub use request::{Method, Request};
pub use response::{BodyWriter, Response, reason_phrase};
pub use router::{Handler, HandlerFn, Route, RouteError, RouteTable};
pub use serializer::{LineEnding, Serializer};
pub use server::{Indicator, PollOutcome, Server, ServerStats, State};

/// Maximum number of headers stored on a request or response.
pub const MAX_HEADERS: usize = 10;
/// Maximum length of a header name.
pub const MAX_HEADER_NAME_LEN: usize = 64;
/// Maximum length of a header value.
pub const MAX_HEADER_VALUE_LEN: usize = 256;
/// Maximum length of the request method token.
pub const MAX_METHOD_LEN: usize = 16;
/// Maximum length of the request target.
pub const MAX_TARGET_LEN: usize = 128;
/// Maximum length of the protocol token.
pub const MAX_PROTOCOL_LEN: usize = 16;
/// Maximum request body kept by the parser.
pub const MAX_REQUEST_BODY: usize = 2048;
/// Maximum response body a handler can produce.
pub const MAX_RESPONSE_LEN: usize = 2048;
/// Maximum length of a response status message.
pub const MAX_STATUS_MESSAGE_LEN: usize = 32;
/// Maximum length of a response content type.
pub const MAX_CONTENT_TYPE_LEN: usize = 32;
/// Maximum length of a registered route path.
pub const MAX_ROUTE_TARGET: usize = 64;
/// Default route table capacity.
pub const MAX_ROUTES: usize = 32;
/// Raw bytes read from a connection per request; the rest is dropped.
pub const REQUEST_BUFFER_SIZE: usize = 4096;
/// Scratch space for one serialized response.
///
/// Large enough for a full status line, a maximal header set and a maximal
/// body, so a response built through the public API always fits.
pub const RESPONSE_BUFFER_SIZE: usize = 6144;

/// Content type used when a handler doesn't set one.
pub const DEFAULT_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

/// A header name/value pair.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Header {
    pub name: String<MAX_HEADER_NAME_LEN>,
    pub value: String<MAX_HEADER_VALUE_LEN>,
}

impl Header {
    /// Build a header, truncating either side that exceeds its capacity.
    pub fn new(name: &str, value: &str) -> Self {
        Self {
            name: text::bounded(name.as_bytes()).0,
            value: text::bounded(value.as_bytes()).0,
        }
    }
}
