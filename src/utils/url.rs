/// Percent-encode text into a URI-component-safe string (RFC 3986).
///
/// Unreserved characters (ALPHA / DIGIT / '-' / '.' / '_' / '~') are left as-is.
/// Every other UTF-8 byte is encoded as `%HH` (uppercase hex), so multi-byte
/// characters become runs of escapes.
pub fn url_encode(input: &str) -> String {
    const HEX: &[u8; 16] = b"0123456789ABCDEF";

    // In the worst case, every byte becomes "%XX" (3 chars)
    let mut out = String::with_capacity(input.len() * 3);

    for &b in input.as_bytes() {
        match b {
            // Unreserved characters according to RFC 3986
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(b as char);
            }
            _ => {
                out.push('%');
                out.push(HEX[(b >> 4) as usize] as char);
                out.push(HEX[(b & 0x0F) as usize] as char);
            }
        }
    }

    out
}
