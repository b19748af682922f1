use std::borrow::Cow;

use super::escape::{decode_pair, next_percent};
use crate::error::DecodeError;

/// Decode `input`, whose first `%` sits at `first`, failing on the first
/// malformed escape or if the decoded bytes are not UTF-8.
pub(super) fn decode(input: &str, first: usize) -> Result<Cow<'_, str>, DecodeError> {
    let bytes = input.as_bytes();
    let len = bytes.len();

    let mut buf: Vec<u8> = Vec::with_capacity(len);
    buf.extend_from_slice(&bytes[..first]);

    let mut i = first;
    while i < len {
        if bytes[i] != b'%' {
            let next = next_percent(bytes, i);
            buf.extend_from_slice(&bytes[i..next]);
            i = next;
            continue;
        }

        if i + 2 >= len {
            return Err(DecodeError::TruncatedEscape { offset: i });
        }

        match decode_pair(&bytes[i + 1..i + 3]) {
            Ok(byte) => buf.push(byte),
            Err(index) => {
                // Everything before the bad digit is ASCII, so this is a char boundary.
                let found = input[i + 1 + index..].chars().next().unwrap_or('\u{FFFD}');
                return Err(DecodeError::InvalidHexDigit { offset: i, found });
            }
        }
        i += 3;
    }

    String::from_utf8(buf)
        .map(Cow::Owned)
        .map_err(|err| DecodeError::InvalidUtf8 {
            offset: err.utf8_error().valid_up_to(),
        })
}
