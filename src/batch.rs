use std::path::Path;

use anyhow::Context;
use serde::Serialize;

use crate::decode::Decoder;
use crate::error::DecodeError;
use crate::log_debug;

/// Outcome of decoding one input with a [`Decoder`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecodeReport {
    pub input: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decoded: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<DecodeError>,
}

impl DecodeReport {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Decode every input independently; a failure never stops the batch.
pub fn decode_all<I, S>(decoder: &Decoder, inputs: I) -> Vec<DecodeReport>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    inputs
        .into_iter()
        .map(|input| {
            let input = input.as_ref();
            match decoder.decode(input) {
                Ok(decoded) => DecodeReport {
                    input: input.to_string(),
                    decoded: Some(decoded.into_owned()),
                    error: None,
                },
                Err(err) => DecodeReport {
                    input: input.to_string(),
                    decoded: None,
                    error: Some(err),
                },
            }
        })
        .collect()
}

/// Decode a file line by line. Line terminators (`\n` or `\r\n`) are not part
/// of the decoded input.
pub fn decode_file(decoder: &Decoder, path: impl AsRef<Path>) -> anyhow::Result<Vec<DecodeReport>> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;

    log_debug!(
        "Batch",
        "decoding {} line(s) from {}",
        contents.lines().count(),
        path.display()
    );

    Ok(decode_all(decoder, contents.lines()))
}
