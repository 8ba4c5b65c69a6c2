//! A network abstraction layer for embedded systems
//!
//! The HTTP engine only ever talks to the network through the narrow,
//! byte-oriented traits defined here: "is a client ready?", "how many bytes
//! are available?", "read one byte", "write one byte". Any network stack
//! (W5500 socket registers, smoltcp, a WiFi co-processor, `std::net` on the
//! host) can sit behind them.
//!

#![allow(missing_docs)]
#![deny(unsafe_code)]

/// Common error types for network operations
pub mod error;

/// Application layer protocols built on the connection traits
pub mod application;

/// Re-exports of common traits
pub mod prelude {
    pub use super::{Close, Connection, Listener, Read, Write};
}

pub trait Read {
    /// Associated error type
    type Error: core::fmt::Debug;
    /// Number of bytes that can be read right now without blocking
    fn available(&self) -> usize;
    /// Read a single byte from the connection
    fn read_byte(&mut self) -> Result<u8, Self::Error>;
}

pub trait Write {
    /// Associated error type
    type Error: core::fmt::Debug;
    /// Write a single byte to the connection
    fn write_byte(&mut self, byte: u8) -> Result<(), Self::Error>;
    /// Flush the write buffer
    fn flush(&mut self) -> Result<(), Self::Error>;

    /// Write every byte of `buf`, stopping at the first failure.
    fn write_all(&mut self, buf: &[u8]) -> Result<(), Self::Error> {
        for &byte in buf {
            self.write_byte(byte)?;
        }
        Ok(())
    }
}

pub trait Close {
    /// Associated error type
    type Error: core::fmt::Debug;
    /// Close the connection
    fn close(self) -> Result<(), Self::Error>;
}

/// A single client connection
pub trait Connection: Read + Write + Close {}

/// A non-blocking server socket.
///
/// `accept` is polled once per server iteration and must return immediately:
/// `Ok(None)` when no client is waiting.
pub trait Listener {
    /// Associated connection type
    type Connection: Connection;
    /// Associated error type
    type Error: core::fmt::Debug;
    /// Take the next ready client, if any
    fn accept(&mut self) -> Result<Option<Self::Connection>, Self::Error>;

    /// Whether the network hardware is present and usable.
    ///
    /// Interfaces that cannot detect this report `true`.
    fn hardware_present(&self) -> bool {
        true
    }
}
