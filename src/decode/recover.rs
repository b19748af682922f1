use std::borrow::Cow;

use super::escape::{decode_pair, next_percent};
use super::utf8::{Step, Utf8Dfa};
use crate::log_debug;

/// What to emit for an escape run that does not decode to well-formed UTF-8.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Recovery {
    /// Leave the escape text in the output untouched.
    Verbatim,
    /// Emit one U+FFFD per maximal invalid subpart.
    Replace,
}

/// Decode `input`, whose first `%` sits at `first`, without ever failing.
///
/// Escapes are decoded in runs: consecutive `%XX` triplets are fed through the
/// UTF-8 automaton and written out once a code point completes. Malformed
/// escapes (`%`, `%1`, `%zz`) are always copied literally; what happens to a
/// run that is not valid UTF-8 depends on `recovery`.
///
/// Returns the input borrowed when nothing was decoded or replaced.
pub(super) fn decode(input: &str, first: usize, recovery: Recovery) -> Cow<'_, str> {
    let bytes = input.as_bytes();
    let len = bytes.len();

    let mut out = String::with_capacity(len);
    let mut dfa = Utf8Dfa::new();
    let mut changed = false;
    let mut rejected = 0usize;

    // Input from `literal_start` up to `run_start` has not been written yet.
    let mut literal_start = 0;
    // First escape of the run currently being assembled.
    let mut run_start = first;
    let mut k = first;

    // A `%` in the last two positions can never start a complete escape.
    while k + 2 < len {
        let pending = k > run_start;

        match decode_pair(&bytes[k + 1..k + 3]) {
            Err(_) if !pending => {
                // Not an escape at all: the `%` stays literal.
                k = next_percent(bytes, k + 1);
                run_start = k;
            }
            Err(_) => {
                rejected += 1;
                match recovery {
                    Recovery::Verbatim => {
                        k = next_percent(bytes, run_start + 1);
                        run_start = k;
                    }
                    Recovery::Replace => {
                        out.push_str(&input[literal_start..run_start]);
                        out.push(char::REPLACEMENT_CHARACTER);
                        changed = true;
                        literal_start = k;
                        run_start = k;
                    }
                }
                dfa.reset();
            }
            Ok(byte) => match dfa.feed(byte) {
                Step::Accept(ch) => {
                    out.push_str(&input[literal_start..run_start]);
                    out.push(ch);
                    changed = true;
                    literal_start = k + 3;
                    k = next_percent(bytes, literal_start);
                    run_start = k;
                }
                Step::Incomplete => {
                    k += 3;
                    if k < len && bytes[k] == b'%' {
                        continue;
                    }
                    // The run was cut short by a literal character or the end of input.
                    rejected += 1;
                    match recovery {
                        Recovery::Verbatim => {
                            k = next_percent(bytes, run_start + 1);
                        }
                        Recovery::Replace => {
                            out.push_str(&input[literal_start..run_start]);
                            out.push(char::REPLACEMENT_CHARACTER);
                            changed = true;
                            literal_start = k;
                            k = next_percent(bytes, k);
                        }
                    }
                    run_start = k;
                    dfa.reset();
                }
                Step::Reject => {
                    rejected += 1;
                    match (recovery, pending) {
                        (Recovery::Verbatim, _) => {
                            k = next_percent(bytes, run_start + 1);
                        }
                        (Recovery::Replace, true) => {
                            // Replace what we had and retry this escape as a new run.
                            out.push_str(&input[literal_start..run_start]);
                            out.push(char::REPLACEMENT_CHARACTER);
                            changed = true;
                            literal_start = k;
                        }
                        (Recovery::Replace, false) => {
                            out.push_str(&input[literal_start..run_start]);
                            out.push(char::REPLACEMENT_CHARACTER);
                            changed = true;
                            literal_start = k + 3;
                            k = next_percent(bytes, literal_start);
                        }
                    }
                    run_start = k;
                }
            },
        }
    }

    // A run still open here was truncated by the end of input.
    if k > run_start {
        rejected += 1;
        if recovery == Recovery::Replace {
            out.push_str(&input[literal_start..run_start]);
            out.push(char::REPLACEMENT_CHARACTER);
            changed = true;
            literal_start = k;
        }
    }

    if rejected > 0 {
        log_debug!(
            "Decoder",
            "recovered {} malformed escape run(s) ({:?})",
            rejected,
            recovery
        );
    }

    if !changed {
        return Cow::Borrowed(input);
    }

    out.push_str(&input[literal_start..]);
    Cow::Owned(out)
}
