//! C4: convert raw filename bytes to printable text without ever failing.
//!
//! Reports must always be produceable, even when a path was recorded under
//! an encoding the updater couldn't make sense of either. We try UTF-8
//! first; on failure we fall back to a lossless `\xHH` escape of every
//! invalid byte and tell the sink which path triggered it, so the operator
//! can go investigate the underlying filesystem anomaly.

use crate::sink::Sink;

/// Decodes `bytes` to text, escaping invalid sequences instead of failing.
///
/// `context_prefix` is prepended to the escaped text in the diagnostic
/// message only, it has no effect on the returned string.
pub fn safe_decode(bytes: &[u8], context_prefix: &str, sink: &dyn Sink) -> String {
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_owned(),
        Err(_) => {
            let escaped = backslash_replace(bytes);
            sink.warn(&format!("invalid utf-8 in {bytes:?}"));
            sink.warn(&format!("entry parsed as {}{}", context_prefix, escaped));
            escaped
        }
    }
}

/// Re-decodes `bytes` as UTF-8 where possible, replacing every byte that
/// doesn't fit with a `\xHH` escape, mirroring Python's
/// `bytes.decode(errors='backslashreplace')`.
fn backslash_replace(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    let mut rest = bytes;
    loop {
        match std::str::from_utf8(rest) {
            Ok(valid) => {
                out.push_str(valid);
                break;
            }
            Err(e) => {
                let good = e.valid_up_to();
                out.push_str(std::str::from_utf8(&rest[..good]).unwrap());
                let bad_len = e.error_len().unwrap_or(rest.len() - good);
                for &b in &rest[good..good + bad_len] {
                    out.push_str(&format!("\\x{b:02x}"));
                }
                rest = &rest[good + bad_len..];
            }
        }
    }
    out
}
