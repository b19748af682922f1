//! Incremental UTF-8 validation for runs of `%XX` escapes.
//!
//! Table-driven DFA after Bjoern Hoehrmann's decoder
//! (<http://bjoern.hoehrmann.de/utf-8/decoder/dfa/>). Each byte is first
//! mapped to a character class; the transition table then maps
//! `state + class` to the next state. States are multiples of 12 so they can
//! be used directly as row offsets.

const ACCEPT: u8 = 0;
const REJECT: u8 = 12;

const fn byte_class(byte: u8) -> u8 {
    match byte {
        0x00..=0x7F => 0,
        0x80..=0x8F => 1,
        0x90..=0x9F => 9,
        0xA0..=0xBF => 7,
        0xC0 | 0xC1 => 8,
        0xC2..=0xDF => 2,
        0xE0 => 10,
        0xE1..=0xEC | 0xEE | 0xEF => 3,
        0xED => 4,
        0xF0 => 11,
        0xF1..=0xF3 => 6,
        0xF4 => 5,
        0xF5..=0xFF => 8,
    }
}

const CLASSES: [u8; 256] = {
    let mut table = [0u8; 256];
    let mut i = 0;
    while i < 256 {
        table[i] = byte_class(i as u8);
        i += 1;
    }
    table
};

#[rustfmt::skip]
const TRANSITIONS: [u8; 108] = [
    // accept
     0, 12, 24, 36, 60, 96, 84, 12, 12, 12, 48, 72,
    // reject
    12, 12, 12, 12, 12, 12, 12, 12, 12, 12, 12, 12,
    // one continuation byte left
    12,  0, 12, 12, 12, 12, 12,  0, 12,  0, 12, 12,
    // two continuation bytes left
    12, 24, 12, 12, 12, 12, 12, 24, 12, 24, 12, 12,
    // after E0: A0..BF only (no overlongs)
    12, 12, 12, 12, 12, 12, 12, 24, 12, 12, 12, 12,
    // after ED: 80..9F only (no surrogates)
    12, 24, 12, 12, 12, 12, 12, 12, 12, 24, 12, 12,
    // after F0: 90..BF only (no overlongs)
    12, 12, 12, 12, 12, 12, 12, 36, 12, 36, 12, 12,
    // after F1..F3
    12, 36, 12, 12, 12, 12, 12, 36, 12, 36, 12, 12,
    // after F4: 80..8F only (nothing above U+10FFFF)
    12, 36, 12, 12, 12, 12, 12, 12, 12, 12, 12, 12,
];

/// Outcome of feeding one byte to [`Utf8Dfa`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Step {
    /// The byte completed a code point.
    Accept(char),
    /// The byte is a valid prefix; more continuation bytes are needed.
    Incomplete,
    /// The byte cannot continue (or start) a well-formed sequence.
    Reject,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Utf8Dfa {
    state: u8,
    codepoint: u32,
}

impl Utf8Dfa {
    pub(crate) fn new() -> Self {
        Self {
            state: ACCEPT,
            codepoint: 0,
        }
    }

    pub(crate) fn reset(&mut self) {
        self.state = ACCEPT;
        self.codepoint = 0;
    }

    pub(crate) fn feed(&mut self, byte: u8) -> Step {
        let class = CLASSES[byte as usize];

        self.codepoint = if self.state == ACCEPT {
            (0xFFu32 >> class) & byte as u32
        } else {
            (self.codepoint << 6) | (byte as u32 & 0x3F)
        };
        self.state = TRANSITIONS[(self.state + class) as usize];

        match self.state {
            ACCEPT => {
                let step = char::from_u32(self.codepoint).map_or(Step::Reject, Step::Accept);
                self.codepoint = 0;
                step
            }
            REJECT => {
                self.reset();
                Step::Reject
            }
            _ => Step::Incomplete,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(bytes: &[u8]) -> Vec<Step> {
        let mut dfa = Utf8Dfa::new();
        bytes.iter().map(|&b| dfa.feed(b)).collect()
    }

    #[test]
    fn accepts_ascii_immediately() {
        assert_eq!(run(b"A"), vec![Step::Accept('A')]);
        assert_eq!(run(&[0x00]), vec![Step::Accept('\0')]);
    }

    #[test]
    fn reassembles_multi_byte_sequences() {
        assert_eq!(run(&[0xC3, 0xA9]), vec![Step::Incomplete, Step::Accept('é')]);
        assert_eq!(
            run(&[0xE2, 0x82, 0xAC]),
            vec![Step::Incomplete, Step::Incomplete, Step::Accept('€')]
        );
        assert_eq!(
            run(&[0xF0, 0x9F, 0x92, 0xA9]),
            vec![
                Step::Incomplete,
                Step::Incomplete,
                Step::Incomplete,
                Step::Accept('💩')
            ]
        );
        assert_eq!(
            run(&[0xF4, 0x8F, 0xBF, 0xBF]).last(),
            Some(&Step::Accept('\u{10FFFF}'))
        );
    }

    #[test]
    fn agrees_with_std_on_every_two_byte_prefix() {
        for lead in 0u8..=0xFF {
            for cont in 0u8..=0xFF {
                let bytes = [lead, cont];
                let steps = run(&bytes);
                let dfa_ok = matches!(steps.last(), Some(Step::Accept(_)))
                    && (lead < 0x80 || steps[0] == Step::Incomplete);
                let std_ok = std::str::from_utf8(&bytes).is_ok();
                assert_eq!(dfa_ok, std_ok, "mismatch on {bytes:02X?}");
            }
        }
    }

    #[test]
    fn rejects_invalid_lead_bytes() {
        for byte in [0x80, 0xBF, 0xC0, 0xC1, 0xF5, 0xFF] {
            assert_eq!(run(&[byte]), vec![Step::Reject], "byte {byte:02X}");
        }
    }

    #[test]
    fn rejects_overlong_encodings() {
        assert_eq!(run(&[0xE0, 0x80]), vec![Step::Incomplete, Step::Reject]);
        assert_eq!(run(&[0xF0, 0x80]), vec![Step::Incomplete, Step::Reject]);
    }

    #[test]
    fn rejects_surrogates_and_out_of_range() {
        assert_eq!(run(&[0xED, 0xA0]), vec![Step::Incomplete, Step::Reject]);
        assert_eq!(run(&[0xF4, 0x90]), vec![Step::Incomplete, Step::Reject]);
    }

    #[test]
    fn recovers_after_reject() {
        let mut dfa = Utf8Dfa::new();
        assert_eq!(dfa.feed(0xC3), Step::Incomplete);
        assert_eq!(dfa.feed(b'('), Step::Reject);
        assert_eq!(dfa.feed(b'('), Step::Accept('('));
    }
}
