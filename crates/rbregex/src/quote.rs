// Metacharacter quoting.
//
// Escapes every byte that is syntax in a pattern, so the quoted text
// matches itself literally. The table matches Ruby's `Regexp.escape`:
// control whitespace gets a named escape, space gets `\ `, and the
// metacharacters get a backslash.

/// Quote raw bytes for literal use in a pattern.
pub fn quote(text: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len());
    for &b in text {
        match b {
            b'\t' => out.extend_from_slice(b"\\t"),
            b'\n' => out.extend_from_slice(b"\\n"),
            0x0B => out.extend_from_slice(b"\\v"),
            0x0C => out.extend_from_slice(b"\\f"),
            b'\r' => out.extend_from_slice(b"\\r"),
            b' ' => out.extend_from_slice(b"\\ "),
            b'#' | b'$' | b'(' | b')' | b'*' | b'+' | b'-' | b'.' | b'?' | b'[' | b'\\'
            | b']' | b'^' | b'{' | b'|' | b'}' => {
                out.push(b'\\');
                out.push(b);
            }
            _ => out.push(b),
        }
    }
    out
}

/// String convenience over [`quote`]. Quoting inserts only ASCII, so a
/// UTF-8 input stays UTF-8.
pub fn quote_str(text: &str) -> String {
    String::from_utf8_lossy(&quote(text.as_bytes())).into_owned()
}
