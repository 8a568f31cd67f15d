// ============================================================================
// Encoding Conversion Module
//
// Turns raw file bytes into text using a resolution, normalizes line
// endings across merged text, and encodes the result for output. Every
// operation here is lenient: invalid input is replaced, never rejected.
// ============================================================================

use super::catalog::LineEndingMode;
use super::codec::{TextCodec, UTF8_BOM};
use super::resolver::{has_utf8_bom, EncodingResolution};
use super::EncodingMode;

pub struct EncodingConverter;

impl EncodingConverter {
    /// Decode `bytes` with the codec chosen by `resolution`
    ///
    /// The UTF-8 byte-order mark is stripped only when the resolution is
    /// `Utf8Bom`. Undecodable sequences become U+FFFD.
    pub fn decode(bytes: &[u8], resolution: &EncodingResolution) -> String {
        Self::decode_with_report(bytes, resolution).0
    }

    /// Same as [`EncodingConverter::decode`], also reporting whether any
    /// replacement character was produced
    pub fn decode_with_report(bytes: &[u8], resolution: &EncodingResolution) -> (String, bool) {
        let source = if resolution.mode == EncodingMode::Utf8Bom && has_utf8_bom(bytes) {
            &bytes[UTF8_BOM.len()..]
        } else {
            bytes
        };

        let (decoded, had_errors) = resolution.codec.decode_lossy(source);

        if had_errors {
            log::warn!(
                "Decoding as {} had errors: some characters were replaced",
                resolution.label
            );
        }

        (decoded.into_owned(), had_errors)
    }

    /// Rewrite every line break to the requested convention
    ///
    /// `\r\n` and lone `\r` collapse to `\n` first, then `\n` expands to
    /// `\r\n` for CRLF output. Applying it twice changes nothing.
    pub fn normalize_line_endings(text: &str, line_ending: LineEndingMode) -> String {
        let canonical = text.replace("\r\n", "\n").replace('\r', "\n");

        match line_ending {
            LineEndingMode::Lf => canonical,
            LineEndingMode::Crlf => canonical.replace('\n', "\r\n"),
        }
    }

    /// Encode text for output, returning the bytes and the number of
    /// characters the codec had to substitute
    pub fn encode(text: &str, codec: TextCodec) -> (Vec<u8>, usize) {
        let (bytes, substituted) = codec.encode(text);

        if substituted > 0 {
            log::warn!(
                "{} characters could not be represented in {} and were written as '?'",
                substituted,
                codec.label()
            );
        }

        (bytes, substituted)
    }
}
