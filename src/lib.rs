//! # ethttp - Embedded HTTP engine
//!
//! A minimal HTTP request/response engine designed to run on a microcontroller
//! behind a hardware network interface (W5500-class Ethernet chips, WiFi
//! co-processors, or anything that can expose a TCP connection byte by byte).
//! The library supports `no_std` environments and never allocates.
//!
//! ## Features
//!
//! ### HTTP Engine
//! - **Request Parser**: single forward scan over a bounded buffer
//! - **Route Table**: exact-path dispatch with a configurable not-found handler
//! - **Response Serializer**: Content-Length always derived from the body
//! - **Server Loop**: non-blocking, one request per poll
//!
//! ### Metrics
//! - Prometheus text exposition writer
//! - Cached climate-sensor `/metrics` handler
//!
//! ### Configuration
//! - Network identity and server behaviour, loadable from JSON
//!
//! ## Usage
//!
//! ```rust,no_run
//! use ethttp::network::application::http::{Request, Response, Server};
//! # use ethttp::network::{Close, Connection, Listener, Read, Write};
//! # struct MockConnection;
//! # impl Read for MockConnection {
//! #     type Error = ();
//! #     fn available(&self) -> usize { 0 }
//! #     fn read_byte(&mut self) -> Result<u8, Self::Error> { Err(()) }
//! # }
//! # impl Write for MockConnection {
//! #     type Error = ();
//! #     fn write_byte(&mut self, _byte: u8) -> Result<(), Self::Error> { Ok(()) }
//! #     fn flush(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! # }
//! # impl Close for MockConnection {
//! #     type Error = ();
//! #     fn close(self) -> Result<(), Self::Error> { Ok(()) }
//! # }
//! # impl Connection for MockConnection {}
//! # struct MockListener;
//! # impl Listener for MockListener {
//! #     type Connection = MockConnection;
//! #     type Error = ();
//! #     fn accept(&mut self) -> Result<Option<MockConnection>, ()> { Ok(None) }
//! # }
//!
//! fn hello(_req: &Request) -> Response {
//!     Response::ok().with_body(b"Hello World!").unwrap_or_default()
//! }
//!
//! let mut server: Server<'_, MockListener> = Server::new(MockListener);
//! server.routes_mut().register_fn("/", hello).unwrap();
//!
//! loop {
//!     server.poll();
//!     // sensor polling, display refresh, ...
//! #   break;
//! }
//! ```
//!
//! ## Platform Support
//!
//! This library is designed to work on:
//! - Embedded microcontrollers (ARM Cortex-M, RISC-V, etc.)
//! - Linux-based devices for host-side testing
//! - Any platform supporting Rust's `core` library
//!
//! ## Optional Features
//!
//! - `std`: Enable standard library support (default: disabled)
//! - `defmt`: Enable defmt logging support for embedded debugging

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(missing_docs)]
#![warn(missing_debug_implementations)]

#[macro_use]
mod fmt;

/// Network abstraction layer and the HTTP engine built on top of it.
///
/// The byte-level connection traits live at the root of this module; the
/// HTTP parser, router, serializer and server live under
/// [`application::http`](network::application::http).
pub mod network;

/// Prometheus text exposition and the climate-sensor metrics handler.
pub mod metrics;

/// Static configuration consumed at startup.
pub mod config;
