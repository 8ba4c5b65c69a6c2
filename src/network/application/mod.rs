//! # Application Layer Network Protocols
//!
//! This module contains the application layer (OSI Layer 7) protocols that
//! run on top of the core network traits.
//!
//! ## Available Protocols
//!
//! - **[`http`]**: HTTP/1.1-shaped request parser, route table, response
//!   serializer and polling server loop
//!
//! ## Design Principles
//!
//! - **Connection Agnostic**: Work with any type implementing [`Connection`](crate::network::Connection)
//! - **No-std Compatible**: Designed for embedded systems without heap allocation
//! - **Resource Conscious**: Use fixed-size buffers and minimal memory
//! - **Never Blocking**: Every entry point returns as soon as no data is ready

/// HTTP server engine.
///
/// Provides a bounded request parser, exact-match route dispatch and a
/// response serializer, tied together by a non-blocking [`Server`](http::Server).
pub mod http;
