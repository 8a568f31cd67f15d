// ============================================================================
// Codecs
//
// Strict and lenient decoding plus lenient encoding for the four concrete
// encodings. encoding_rs implements Shift_JIS as the WHATWG decoder, which
// is Windows code page 932. Plain Shift_JIS (JIS X 0208 only) is derived
// from it by rejecting the regions that exist only in CP932.
// ============================================================================

use encoding_rs::{SHIFT_JIS, UTF_8};
use std::borrow::Cow;
use std::ops::Range;

use super::catalog::EncodingMode;
use crate::errors::{MergerError, MergerResult};

/// UTF-8 byte-order mark
pub const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

/// Byte written for characters the output encoding cannot represent
const UNMAPPABLE_SUBSTITUTE: u8 = b'?';

/// A concrete encoding able to decode and encode text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextCodec {
    ShiftJis,
    Cp932,
    Utf8NoBom,
    Utf8Bom,
}

impl TextCodec {
    pub fn label(self) -> &'static str {
        EncodingMode::from(self).label()
    }

    /// Decode without any substitution, `None` if any sequence is invalid
    pub fn decode_strict(self, bytes: &[u8]) -> Option<Cow<'_, str>> {
        match self {
            TextCodec::Utf8NoBom | TextCodec::Utf8Bom => {
                UTF_8.decode_without_bom_handling_and_without_replacement(bytes)
            }
            TextCodec::Cp932 => SHIFT_JIS.decode_without_bom_handling_and_without_replacement(bytes),
            TextCodec::ShiftJis => {
                if !cp932_only_spans(bytes).is_empty() {
                    return None;
                }
                SHIFT_JIS.decode_without_bom_handling_and_without_replacement(bytes)
            }
        }
    }

    pub fn can_decode(self, bytes: &[u8]) -> bool {
        self.decode_strict(bytes).is_some()
    }

    /// Decode, replacing invalid sequences with U+FFFD
    ///
    /// Returns the text and whether any replacement happened. A leading BOM
    /// is not interpreted here; callers strip it when the resolution asks
    /// for it.
    pub fn decode_lossy(self, bytes: &[u8]) -> (Cow<'_, str>, bool) {
        match self {
            TextCodec::Utf8NoBom | TextCodec::Utf8Bom => UTF_8.decode_without_bom_handling(bytes),
            TextCodec::Cp932 => SHIFT_JIS.decode_without_bom_handling(bytes),
            TextCodec::ShiftJis => decode_shift_jis_lossy(bytes),
        }
    }

    /// Encode text, writing `?` for every character the encoding lacks
    ///
    /// Returns the bytes and the number of substituted characters.
    /// `Utf8Bom` is the only codec that emits a byte-order mark.
    pub fn encode(self, text: &str) -> (Vec<u8>, usize) {
        match self {
            TextCodec::Utf8NoBom => (text.as_bytes().to_vec(), 0),
            TextCodec::Utf8Bom => {
                let mut out = Vec::with_capacity(UTF8_BOM.len() + text.len());
                out.extend_from_slice(&UTF8_BOM);
                out.extend_from_slice(text.as_bytes());
                (out, 0)
            }
            TextCodec::Cp932 => encode_shift_jis_family(text, true),
            TextCodec::ShiftJis => encode_shift_jis_family(text, false),
        }
    }
}

impl From<TextCodec> for EncodingMode {
    fn from(codec: TextCodec) -> Self {
        match codec {
            TextCodec::ShiftJis => EncodingMode::ShiftJis,
            TextCodec::Cp932 => EncodingMode::Cp932,
            TextCodec::Utf8NoBom => EncodingMode::Utf8NoBom,
            TextCodec::Utf8Bom => EncodingMode::Utf8Bom,
        }
    }
}

impl TryFrom<EncodingMode> for TextCodec {
    type Error = MergerError;

    fn try_from(mode: EncodingMode) -> MergerResult<Self> {
        mode.codec().ok_or_else(|| {
            MergerError::InvalidConfiguration(
                "Auto is a detection request, not a concrete encoding".to_string(),
            )
        })
    }
}

fn is_lead_byte(b: u8) -> bool {
    matches!(b, 0x81..=0x9F | 0xE0..=0xFC)
}

fn is_trail_byte(b: u8) -> bool {
    matches!(b, 0x40..=0x7E | 0x80..=0xFC)
}

/// Lead bytes of NEC special characters, NEC-selected IBM extensions,
/// the user-defined area and IBM extensions
fn is_cp932_only_lead(b: u8) -> bool {
    matches!(b, 0x87 | 0xED | 0xEE | 0xF0..=0xFC)
}

fn is_cp932_only_sequence(bytes: &[u8]) -> bool {
    match bytes {
        [0x80] => true,
        [lead, _] => is_cp932_only_lead(*lead),
        _ => false,
    }
}

/// Byte ranges of characters that exist in CP932 but not in Shift_JIS
fn cp932_only_spans(bytes: &[u8]) -> Vec<Range<usize>> {
    let mut spans = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        if is_lead_byte(b) && i + 1 < bytes.len() && is_trail_byte(bytes[i + 1]) {
            if is_cp932_only_lead(b) {
                spans.push(i..i + 2);
            }
            i += 2;
        } else {
            if b == 0x80 {
                spans.push(i..i + 1);
            }
            i += 1;
        }
    }

    spans
}

fn decode_shift_jis_lossy(bytes: &[u8]) -> (Cow<'_, str>, bool) {
    let spans = cp932_only_spans(bytes);
    if spans.is_empty() {
        return SHIFT_JIS.decode_without_bom_handling(bytes);
    }

    let mut out = String::with_capacity(bytes.len() * 2);
    let mut start = 0;
    for span in spans {
        let (text, _) = SHIFT_JIS.decode_without_bom_handling(&bytes[start..span.start]);
        out.push_str(&text);
        out.push(char::REPLACEMENT_CHARACTER);
        start = span.end;
    }
    let (tail, _) = SHIFT_JIS.decode_without_bom_handling(&bytes[start..]);
    out.push_str(&tail);

    (Cow::Owned(out), true)
}

fn encode_shift_jis_family(text: &str, allow_cp932_extensions: bool) -> (Vec<u8>, usize) {
    let mut out = Vec::with_capacity(text.len());
    let mut substituted = 0;
    let mut scratch = [0u8; 4];

    for ch in text.chars() {
        if ch.is_ascii() {
            out.push(ch as u8);
            continue;
        }

        // encoding_rs writes numeric character references for unmappable
        // characters; those are discarded in favour of a single `?`.
        let (bytes, _, unmappable) = SHIFT_JIS.encode(ch.encode_utf8(&mut scratch));
        if unmappable || (!allow_cp932_extensions && is_cp932_only_sequence(&bytes)) {
            out.push(UNMAPPABLE_SUBSTITUTE);
            substituted += 1;
        } else {
            out.extend_from_slice(&bytes);
        }
    }

    (out, substituted)
}
