// ============================================================================
// Encoding Module - Public API
//
// Everything textmerger knows about character encodings:
//
// - catalog:   the supported encodings and line endings, with labels
// - codec:     strict and lenient decoding, lenient encoding
// - resolver:  picks the encoding a file is read with, and why
// - converter: decoding with a resolution, line-ending normalization
// - stats:     per-merge tally of encoding decisions
// ============================================================================

pub mod catalog;
pub mod codec;
pub mod converter;
pub mod resolver;
pub mod stats;

// Re-export key types for convenience
pub use catalog::{EncodingMode, LineEndingMode};
pub use codec::TextCodec;
pub use converter::EncodingConverter;
pub use resolver::{EncodingResolution, EncodingResolver, ResolutionReason};
pub use stats::EncodingStats;

/// Resolve and decode in one step
///
/// Returns the resolution alongside the text so callers can report which
/// encoding was used.
pub fn read_text(bytes: &[u8], requested: EncodingMode) -> (EncodingResolution, String) {
    let resolution = EncodingResolver::resolve(bytes, requested);
    let text = EncodingConverter::decode(bytes, &resolution);
    (resolution, text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_text_any_bytes() {
        let samples: [&[u8]; 4] = [
            b"",
            &[0xEF, 0xBB, 0xBF, b'a'],
            &[0x93, 0xFA, 0x96, 0x7B],
            &[0xFF, 0xFE, 0x00, 0x01],
        ];
        for bytes in samples {
            for mode in EncodingMode::INPUT_OPTIONS {
                let (resolution, _text) = read_text(bytes, mode);
                assert_ne!(resolution.mode, EncodingMode::Auto);
            }
        }
    }

    #[test]
    fn test_read_text_strips_detected_bom() {
        let (resolution, text) = read_text(&[0xEF, 0xBB, 0xBF, b'a'], EncodingMode::Auto);
        assert_eq!(resolution.mode, EncodingMode::Utf8Bom);
        assert_eq!(text, "a");
    }
}
