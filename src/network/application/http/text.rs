//! Bounded text copies.

use heapless::String;

/// Copy `bytes` into a `String<N>`, truncating to capacity.
///
/// The cut always lands on a UTF-8 boundary, and an invalid sequence ends the
/// copy as if the buffer had run out. The second element reports whether
/// anything was left behind.
pub(crate) fn bounded<const N: usize>(bytes: &[u8]) -> (String<N>, bool) {
    let valid = match core::str::from_utf8(bytes) {
        Ok(s) => s,
        // `valid_up_to` is always a char boundary.
        Err(e) => core::str::from_utf8(&bytes[..e.valid_up_to()]).unwrap_or_default(),
    };

    let mut end = valid.len().min(N);
    while !valid.is_char_boundary(end) {
        end -= 1;
    }

    let mut out = String::new();
    // Cannot fail: `end <= N`.
    let _ = out.push_str(&valid[..end]);
    (out, end < bytes.len())
}

/// Copy `s` into a `String<N>` without its `\r` and `\n` characters,
/// truncating to capacity.
pub(crate) fn single_line<const N: usize>(s: &str) -> String<N> {
    let mut out = String::new();
    for c in s.chars().filter(|c| !is_line_break(*c)) {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}

pub(crate) fn is_line_break(c: char) -> bool {
    matches!(c, '\r' | '\n')
}

pub(crate) fn has_line_break(s: &str) -> bool {
    s.contains(is_line_break)
}

/// Leading decimal digits of `s` after optional spaces, saturating; anything
/// unparsable yields 0.
pub(crate) fn parse_decimal(s: &str) -> usize {
    s.trim_start()
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0usize, |acc, d| {
            acc.saturating_mul(10).saturating_add((d - b'0') as usize)
        })
}
