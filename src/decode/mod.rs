//! Percent-decoding of URI components that never panics on bad input.
//!
//! Every entry point shares the same fast path: if the input has no `%` it is
//! handed back borrowed, without allocating. Otherwise the text from the first
//! `%` onwards is decoded under one of three [`Policy`] values.

mod escape;
mod recover;
mod strict;
mod utf8;

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{DecodeError, ParsePolicyError};
use crate::log_debug;
use recover::Recovery;

/// How malformed input is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Policy {
    /// Any malformed escape or invalid UTF-8 is a [`DecodeError`].
    Strict,
    /// Malformed escapes are copied literally, invalid UTF-8 becomes U+FFFD.
    Lenient,
    /// Malformed escapes and escape runs that are not valid UTF-8 are both
    /// left in the output exactly as written.
    #[default]
    PassThrough,
}

impl Policy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Policy::Strict => "strict",
            Policy::Lenient => "lenient",
            Policy::PassThrough => "pass-through",
        }
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Policy {
    type Err = ParsePolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "strict" => Ok(Policy::Strict),
            "lenient" | "replace" => Ok(Policy::Lenient),
            "pass-through" | "passthrough" | "pass_through" => Ok(Policy::PassThrough),
            _ => Err(ParsePolicyError(s.to_string())),
        }
    }
}

/// Options for a [`Decoder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DecodeOptions {
    #[serde(default)]
    pub policy: Policy,
}

impl DecodeOptions {
    pub fn strict() -> Self {
        Self {
            policy: Policy::Strict,
        }
    }

    pub fn lenient() -> Self {
        Self {
            policy: Policy::Lenient,
        }
    }

    pub fn pass_through() -> Self {
        Self {
            policy: Policy::PassThrough,
        }
    }
}

/// A configured percent-decoder. Cheap to copy and free of shared state.
#[derive(Debug, Clone, Copy, Default)]
pub struct Decoder {
    options: DecodeOptions,
}

impl Decoder {
    pub fn new(options: DecodeOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> DecodeOptions {
        self.options
    }

    /// Decode `input`. Only fails under [`Policy::Strict`].
    pub fn decode<'a>(&self, input: &'a str) -> Result<Cow<'a, str>, DecodeError> {
        self.decode_from(input, None)
    }

    /// Decode `input`, starting the search for `%` at `start`.
    ///
    /// `start` is a hint from a caller that has already scanned a prefix. The
    /// bytes before it are copied without inspection, so it must not be past
    /// the first `%`. An offset beyond the input or inside a multi-byte
    /// character is ignored and the whole input is scanned instead.
    pub fn decode_from<'a>(
        &self,
        input: &'a str,
        start: Option<usize>,
    ) -> Result<Cow<'a, str>, DecodeError> {
        let Some(first) = first_escape(input, start) else {
            return Ok(Cow::Borrowed(input));
        };

        match self.options.policy {
            Policy::Strict => strict::decode(input, first),
            Policy::Lenient => Ok(recover::decode(input, first, Recovery::Replace)),
            Policy::PassThrough => Ok(recover::decode(input, first, Recovery::Verbatim)),
        }
    }
}

/// Decode with [`Policy::PassThrough`]: never fails, and anything that cannot
/// be decoded is left as written.
pub fn decode(input: &str) -> Cow<'_, str> {
    decode_from(input, None)
}

/// [`decode`] with a start-offset hint, see [`Decoder::decode_from`].
pub fn decode_from(input: &str, start: Option<usize>) -> Cow<'_, str> {
    match first_escape(input, start) {
        Some(first) => recover::decode(input, first, Recovery::Verbatim),
        None => Cow::Borrowed(input),
    }
}

/// Decode with [`Policy::Lenient`]: never fails, invalid UTF-8 becomes U+FFFD.
pub fn decode_lossy(input: &str) -> Cow<'_, str> {
    match first_escape(input, None) {
        Some(first) => recover::decode(input, first, Recovery::Replace),
        None => Cow::Borrowed(input),
    }
}

/// Decode with [`Policy::Strict`].
pub fn try_decode(input: &str) -> Result<Cow<'_, str>, DecodeError> {
    match first_escape(input, None) {
        Some(first) => strict::decode(input, first),
        None => Ok(Cow::Borrowed(input)),
    }
}

fn first_escape(input: &str, start: Option<usize>) -> Option<usize> {
    let from = match start {
        Some(offset) if input.is_char_boundary(offset) => offset,
        Some(offset) => {
            log_debug!(
                "Decoder",
                "ignoring start offset {} for input of {} bytes",
                offset,
                input.len()
            );
            0
        }
        None => 0,
    };

    let bytes = input.as_bytes();
    let first = escape::next_percent(bytes, from);
    (first < bytes.len()).then_some(first)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fast_path_borrows() {
        assert!(matches!(decode("abcd"), Cow::Borrowed("abcd")));
        assert!(matches!(decode_lossy(""), Cow::Borrowed("")));
        assert!(matches!(try_decode("tést 💩"), Ok(Cow::Borrowed("tést 💩"))));
    }

    #[test]
    fn start_offset_skips_clean_prefix() {
        let input = "prefix%20tail";
        assert_eq!(decode_from(input, Some(6)), "prefix tail");
        assert_eq!(decode_from(input, Some(0)), "prefix tail");
        assert_eq!(decode_from(input, Some(input.len())), input);
    }

    #[test]
    fn bad_start_offset_falls_back_to_full_scan() {
        assert_eq!(decode_from("a%20b", Some(99)), "a b");
        // Offset 2 is inside the two-byte 'é'.
        assert_eq!(decode_from("té%21", Some(2)), "té!");
    }

    #[test]
    fn prefix_before_hint_is_trusted() {
        assert_eq!(decode_from("%41%42", Some(3)), "%41B");
    }

    #[test]
    fn decoder_dispatches_on_policy() {
        let input = "%C3%28";
        assert_eq!(
            Decoder::new(DecodeOptions::strict()).decode(input),
            Err(DecodeError::InvalidUtf8 { offset: 0 })
        );
        assert_eq!(
            Decoder::new(DecodeOptions::lenient()).decode(input).unwrap(),
            "\u{FFFD}("
        );
        assert_eq!(Decoder::default().decode(input).unwrap(), "%C3(");
    }

    #[test]
    fn policy_parses_and_displays() {
        for policy in [Policy::Strict, Policy::Lenient, Policy::PassThrough] {
            assert_eq!(policy.to_string().parse::<Policy>(), Ok(policy));
        }
        assert_eq!("PassThrough".parse::<Policy>(), Ok(Policy::PassThrough));
        assert!("loose".parse::<Policy>().is_err());
    }

    #[test]
    fn options_deserialize_with_default_policy() {
        let opts: DecodeOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(opts, DecodeOptions::pass_through());
        let opts: DecodeOptions = serde_json::from_str(r#"{"policy":"strict"}"#).unwrap();
        assert_eq!(opts, DecodeOptions::strict());
    }
}
