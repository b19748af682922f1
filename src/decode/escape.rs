/// Decode the two hex digits that follow a `%` into one byte.
///
/// On failure returns the index (0 or 1) of the first digit that is not
/// `0-9`, `a-f` or `A-F`.
pub(crate) fn decode_pair(pair: &[u8]) -> Result<u8, usize> {
    let mut out = [0u8; 1];
    match hex::decode_to_slice(pair, &mut out) {
        Ok(()) => Ok(out[0]),
        Err(hex::FromHexError::InvalidHexCharacter { index, .. }) => Err(index),
        // Only reachable if the caller hands us something other than two bytes.
        Err(_) => Err(0),
    }
}

/// Index of the next `%` at or after `from`, or `bytes.len()` if there is none.
pub(crate) fn next_percent(bytes: &[u8], from: usize) -> usize {
    match bytes.get(from..) {
        Some(rest) => rest
            .iter()
            .position(|&b| b == b'%')
            .map_or(bytes.len(), |pos| from + pos),
        None => bytes.len(),
    }
}
