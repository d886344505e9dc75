//! Line-wrapped base64 transfer encoding (RFC 2045).

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

pub use crate::config::DEFAULT_LINE_LENGTH;

/// Encodes `data` as base64, breaking lines with CRLF every `line_length`
/// characters.
///
/// The last line carries no terminator. `line_length` is rounded down to a
/// multiple of 4 so no line splits a base64 quantum; values below 4 wrap at 4.
pub fn encode_wrapped(data: &[u8], line_length: usize) -> String {
    let chars_per_line = (line_length / 4).max(1) * 4;
    let bytes_per_line = chars_per_line / 4 * 3;

    let encoded_len = data.len().div_ceil(3) * 4;
    let line_count = encoded_len.div_ceil(chars_per_line);
    let mut out = String::with_capacity(encoded_len + line_count.saturating_sub(1) * 2);

    for (i, chunk) in data.chunks(bytes_per_line).enumerate() {
        if i > 0 {
            out.push_str("\r\n");
        }
        STANDARD.encode_string(chunk, &mut out);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_input_single_line() {
        assert_eq!(encode_wrapped(b"<p>Hello</p>", 76), "PHA+SGVsbG88L3A+");
        assert_eq!(encode_wrapped(b"%PDF-1.4 test", 76), "JVBERi0xLjQgdGVzdA==");
        assert_eq!(encode_wrapped(b"", 76), "");
    }

    #[test]
    fn test_reference_wrap_at_76() {
        let data: Vec<u8> = (0u8..100).collect();
        assert_eq!(
            encode_wrapped(&data, 76),
            "AAECAwQFBgcICQoLDA0ODxAREhMUFRYXGBkaGxwdHh8gISIjJCUmJygpKissLS4vMDEyMzQ1Njc4\r\n\
             OTo7PD0+P0BBQkNERUZHSElKS0xNTk9QUVJTVFVWV1hZWltcXV5fYGFiYw=="
        );
    }

    #[test]
    fn test_exact_line_has_no_trailing_break() {
        let data = [0xffu8; 57];
        let out = encode_wrapped(&data, 76);
        assert_eq!(out.len(), 76);
        assert!(!out.contains("\r\n"));

        let out = encode_wrapped(&[0xffu8; 58], 76);
        let lines: Vec<_> = out.split("\r\n").collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].len(), 76);
        assert_eq!(lines[1], "/w==");
    }

    #[test]
    fn test_every_line_within_limit() {
        let data: Vec<u8> = (0..10_000u32).map(|i| (i * 31 % 251) as u8).collect();
        for width in [4, 64, 76, 100] {
            let out = encode_wrapped(&data, width);
            assert!(out.split("\r\n").all(|l| l.len() <= width));
            let joined: String = out.split("\r\n").collect();
            assert_eq!(joined, STANDARD.encode(&data));
        }
    }
}
