//! Response serializer.
//!
//! Writes a [`Response`] as:
//!
//! ```text
//! <protocol> <code> <message>
//! Content-Type: <content type>
//! Content-Length: <body length>
//! <Name>: <Value>            (only with header support enabled)
//!
//! <body>
//! ```
//!
//! `Content-Length` is computed here from the body actually written. A
//! handler header with that name is never emitted, so a stale or forged
//! length cannot reach the wire. Handler text never starts a new line
//! either: `\r` and `\n` are dropped from the status message and content
//! type, and headers containing them are skipped.

use super::Response;
use super::text::has_line_break;
use crate::network::error::Error;
use core::fmt::Write as _;
use heapless::Vec;
use serde::Deserialize;

/// Line terminator used on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineEnding {
    /// A single `\n`.
    #[default]
    Lf,
    /// `\r\n`, for strict HTTP clients.
    CrLf,
}

impl LineEnding {
    fn as_bytes(&self) -> &'static [u8] {
        match self {
            LineEnding::Lf => b"\n",
            LineEnding::CrLf => b"\r\n",
        }
    }
}

/// Turns a [`Response`] into wire bytes.
#[derive(Debug, Clone, Copy)]
pub struct Serializer {
    protocol: &'static str,
    header_support: bool,
    line_ending: LineEnding,
}

impl Default for Serializer {
    fn default() -> Self {
        Self::new()
    }
}

impl Serializer {
    /// `HTTP/1.1`, header support on, `\n` line endings.
    pub fn new() -> Self {
        Self {
            protocol: "HTTP/1.1",
            header_support: true,
            line_ending: LineEnding::Lf,
        }
    }

    /// Protocol token written at the start of the status line.
    pub fn protocol(mut self, protocol: &'static str) -> Self {
        self.protocol = protocol;
        self
    }

    /// Whether handler headers are written.
    pub fn header_support(mut self, enabled: bool) -> Self {
        self.header_support = enabled;
        self
    }

    pub fn line_ending(mut self, line_ending: LineEnding) -> Self {
        self.line_ending = line_ending;
        self
    }

    /// Serialize `resp` into `out`, replacing its contents.
    ///
    /// Returns the frame length. If the frame doesn't fit, `out` is left
    /// empty and [`Error::BufferOverflow`] is returned.
    pub fn serialize<const N: usize>(
        &self,
        resp: &Response,
        out: &mut Vec<u8, N>,
    ) -> Result<usize, Error> {
        out.clear();
        let result = self.write_frame(resp, out);
        if result.is_err() {
            out.clear();
        }
        result.map(|_| out.len())
    }

    fn write_frame<const N: usize>(&self, resp: &Response, out: &mut Vec<u8, N>) -> Result<(), Error> {
        let eol = self.line_ending.as_bytes();

        // Status line
        extend(out, self.protocol.as_bytes())?;
        extend(out, b" ")?;
        write_decimal(out, resp.code as usize)?;
        extend(out, b" ")?;
        extend_line(out, &resp.message)?;
        extend(out, eol)?;

        extend(out, b"Content-Type: ")?;
        extend_line(out, &resp.content_type)?;
        extend(out, eol)?;

        extend(out, b"Content-Length: ")?;
        write_decimal(out, resp.body.len())?;
        extend(out, eol)?;

        if self.header_support {
            for header in resp
                .headers
                .iter()
                .filter(|h| !h.name.eq_ignore_ascii_case("Content-Length"))
                .filter(|h| !has_line_break(&h.name) && !has_line_break(&h.value))
            {
                extend(out, header.name.as_bytes())?;
                extend(out, b": ")?;
                extend(out, header.value.as_bytes())?;
                extend(out, eol)?;
            }
        }

        extend(out, eol)?;
        extend(out, &resp.body)
    }
}

fn extend<const N: usize>(out: &mut Vec<u8, N>, bytes: &[u8]) -> Result<(), Error> {
    out.extend_from_slice(bytes).map_err(|_| Error::BufferOverflow)
}

/// Append `text` without its line breaks.
fn extend_line<const N: usize>(out: &mut Vec<u8, N>, text: &str) -> Result<(), Error> {
    for byte in text.bytes().filter(|b| !matches!(b, b'\r' | b'\n')) {
        out.push(byte).map_err(|_| Error::BufferOverflow)?;
    }
    Ok(())
}

fn write_decimal<const N: usize>(out: &mut Vec<u8, N>, value: usize) -> Result<(), Error> {
    let mut digits: heapless::String<20> = heapless::String::new();
    write!(digits, "{}", value).map_err(|_| Error::BufferOverflow)?;
    extend(out, digits.as_bytes())
}
