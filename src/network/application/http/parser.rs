//! Single-pass request parser.
//!
//! The parser walks a raw byte buffer exactly once, driven by an explicit
//! [`Stage`]:
//!
//! ```text
//! Method ──▶ Target ──▶ Protocol ──▶ Headers ──▶ Body
//!    │          │                       ▲
//!    └──────────┴──── newline ──────────┘
//! ```
//!
//! It never fails. Malformed or truncated input yields a partially populated
//! [`Request`] whose [`complete`](Request::complete) and
//! [`truncated`](Request::truncated) flags tell the handler how much to trust
//! it.

use super::text::{bounded, parse_decimal};
use super::{Header, MAX_HEADER_NAME_LEN, MAX_HEADER_VALUE_LEN, MAX_REQUEST_BODY, Request};
use heapless::String;
use serde::Deserialize;

const ASCII_LF: u8 = b'\n';
const ASCII_CR: u8 = b'\r';
const ASCII_SPACE: u8 = b' ';
const ASCII_TAB: u8 = b'\t';

/// Phase of the parsing state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Method,
    Target,
    Protocol,
    Headers,
    Body,
}

impl Stage {
    fn next(self) -> Self {
        match self {
            Stage::Method => Stage::Target,
            Stage::Target => Stage::Protocol,
            Stage::Protocol => Stage::Headers,
            Stage::Headers | Stage::Body => Stage::Body,
        }
    }
}

/// How the body extent is decided once the header block ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyFraming {
    /// Take exactly `Content-Length` bytes (bounded by what was read and by
    /// the body capacity). No `Content-Length` means no body.
    #[default]
    ContentLength,
    /// Take everything up to the first newline after the header block.
    ///
    /// This is how early firmware framed bodies. It cuts any body that
    /// contains a newline and is kept only for peers that relied on it.
    FirstLine,
}

/// Parser behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Store header lines on the request. `Content-Length` is honoured
    /// either way.
    pub headers_enabled: bool,
    pub body_framing: BodyFraming,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            headers_enabled: true,
            body_framing: BodyFraming::ContentLength,
        }
    }
}

/// Turns raw request bytes into a [`Request`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Parser {
    config: ParserConfig,
}

impl Parser {
    /// Create a parser with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a parser with an explicit configuration.
    pub fn with_config(config: ParserConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parse one request out of `bytes`.
    pub fn parse(&self, bytes: &[u8]) -> Request {
        self.scan(bytes).0
    }

    /// Parse one request and also report the stage the scan ended in.
    ///
    /// A scan that ends before [`Stage::Body`] ran out of input inside the
    /// request line or the header block.
    pub fn scan(&self, bytes: &[u8]) -> (Request, Stage) {
        let mut req = Request::new();
        let mut stage = Stage::Method;
        let mut cursor = 0;

        while cursor < bytes.len() {
            let data = &bytes[cursor..];

            match stage {
                Stage::Method | Stage::Target | Stage::Protocol => {
                    let end = find_whitespace(data);
                    let token = &data[..end];
                    req.truncated |= match stage {
                        Stage::Method => store(&mut req.method, token),
                        Stage::Target => store(&mut req.target, token),
                        _ => store(&mut req.protocol, token),
                    };

                    if stage == Stage::Protocol {
                        // Anything after the protocol token belongs to the request line.
                        cursor += find_endline(data) + 1;
                        stage = Stage::Headers;
                    } else {
                        let (consumed, ended_line) = delimiter(&data[end..]);
                        cursor += end + consumed;
                        stage = if ended_line {
                            Stage::Headers
                        } else {
                            stage.next()
                        };
                    }
                }
                Stage::Headers => {
                    let line_len = find_endline(data);
                    let line = &data[..line_len];

                    if line_len < 2 {
                        // The blank line between headers and body.
                        req.complete = true;
                        stage = Stage::Body;
                    } else if let Some((name, value)) = split_header(line) {
                        self.record_header(&mut req, name, value);
                    } else {
                        trace!("skipping header line without value");
                    }

                    cursor += line_len + 1;
                }
                Stage::Body => {
                    let wanted = match self.config.body_framing {
                        BodyFraming::ContentLength => req.content_length.min(data.len()),
                        BodyFraming::FirstLine => find_endline(data),
                    };
                    let kept = wanted.min(MAX_REQUEST_BODY);
                    // Cannot fail: `kept` is within the body capacity.
                    let _ = req.body.extend_from_slice(&data[..kept]);
                    req.truncated |= kept < wanted;
                    break;
                }
            }
        }

        (req, stage)
    }

    fn record_header(&self, req: &mut Request, name: &[u8], value: &[u8]) {
        let (name, name_cut) = bounded::<MAX_HEADER_NAME_LEN>(name);
        let (value, value_cut) = bounded::<MAX_HEADER_VALUE_LEN>(value);

        if name.as_str() == "Content-Length" {
            req.content_length = parse_decimal(&value);
        }

        if !self.config.headers_enabled {
            return;
        }

        req.truncated |= name_cut || value_cut;
        if req.headers.push(Header { name, value }).is_err() {
            // Past the header cap: dropped, but scanning carries on.
            req.truncated = true;
        }
    }
}

/// Copy a token into a bounded field, returning whether it was cut.
fn store<const N: usize>(field: &mut String<N>, token: &[u8]) -> bool {
    let (text, cut) = bounded(token);
    *field = text;
    cut
}

fn find_byte(data: &[u8], byte: u8) -> usize {
    data.iter().position(|&b| b == byte).unwrap_or(data.len())
}

fn find_endline(data: &[u8]) -> usize {
    find_byte(data, ASCII_LF)
}

fn find_whitespace(data: &[u8]) -> usize {
    data.iter()
        .position(|&b| matches!(b, ASCII_SPACE | ASCII_TAB | ASCII_CR | ASCII_LF))
        .unwrap_or(data.len())
}

/// Consume the delimiter at the start of `rest`.
///
/// Returns the number of bytes consumed and whether it ended the line. A
/// `\r\n` pair counts as one delimiter.
fn delimiter(rest: &[u8]) -> (usize, bool) {
    match rest {
        [] => (0, false),
        [ASCII_LF, ..] => (1, true),
        [ASCII_CR, ASCII_LF, ..] => (2, true),
        [_, ..] => (1, false),
    }
}

/// Split a header line into name and value.
///
/// The colon must be followed by at least one space or tab and a non-empty
/// value before the end of the line; a trailing `\r` is not part of the
/// value.
fn split_header(line: &[u8]) -> Option<(&[u8], &[u8])> {
    let colon = line.iter().position(|&b| b == b':')?;
    let rest = &line[colon + 1..];
    if !matches!(rest.first(), Some(&ASCII_SPACE | &ASCII_TAB)) {
        return None;
    }

    let value = trim(rest);
    if value.is_empty() {
        return None;
    }
    Some((&line[..colon], value))
}

fn trim(bytes: &[u8]) -> &[u8] {
    let is_pad = |b: &u8| matches!(*b, ASCII_SPACE | ASCII_TAB | ASCII_CR);
    let start = bytes.iter().position(|b| !is_pad(b)).unwrap_or(bytes.len());
    let end = bytes.iter().rposition(|b| !is_pad(b)).map_or(start, |i| i + 1);
    &bytes[start..end]
}
