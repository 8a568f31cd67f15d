// ============================================================================
// Encoding Resolver
//
// Decides which concrete encoding a file is read with. An explicit user
// choice is trusted as-is; `Auto` runs a strict-validation cascade:
//
// 1. UTF-8 byte-order mark
// 2. Strict UTF-8
// 3. Strict CP932 and strict Shift_JIS, CP932 winning ties
// 4. CP932 as the lossy fallback when nothing validates
//
// The cascade only chooses. Final decoding is always lenient, so a
// fallback guess still yields text.
// ============================================================================

use std::fmt;

use super::catalog::EncodingMode;
use super::codec::{TextCodec, UTF8_BOM};

/// Why a resolution picked its encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResolutionReason {
    ExplicitSelection,
    ByteOrderMark,
    ValidUtf8,
    AmbiguousCp932ShiftJis,
    ValidCp932,
    ValidShiftJis,
    UndetectableFallback,
}

impl ResolutionReason {
    pub fn description(self) -> &'static str {
        match self {
            ResolutionReason::ExplicitSelection => "explicit user selection",
            ResolutionReason::ByteOrderMark => "byte-order-mark detected",
            ResolutionReason::ValidUtf8 => "valid UTF-8",
            ResolutionReason::AmbiguousCp932ShiftJis => {
                "ambiguous between CP932 and Shift-JIS; CP932 chosen as superset"
            }
            ResolutionReason::ValidCp932 => "valid CP932",
            ResolutionReason::ValidShiftJis => "valid Shift-JIS",
            ResolutionReason::UndetectableFallback => "undetectable; CP932 fallback",
        }
    }

    /// True when the choice was a guess rather than a validated match
    pub fn is_fallback(self) -> bool {
        self == ResolutionReason::UndetectableFallback
    }
}

impl fmt::Display for ResolutionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// The encoding chosen for one file, with the reason it was chosen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodingResolution {
    /// Resolved mode; never `EncodingMode::Auto`
    pub mode: EncodingMode,
    pub label: &'static str,
    pub reason: ResolutionReason,
    pub codec: TextCodec,
}

impl EncodingResolution {
    fn new(codec: TextCodec, reason: ResolutionReason) -> Self {
        let mode = EncodingMode::from(codec);
        Self {
            mode,
            label: mode.label(),
            reason,
            codec,
        }
    }

    /// `"<label> (<reason>)"`, as shown next to each file
    pub fn summary(&self) -> String {
        format!("{} ({})", self.label, self.reason)
    }
}

pub struct EncodingResolver;

impl EncodingResolver {
    /// Resolve the encoding for `bytes` given the requested mode
    ///
    /// Pure and infallible: identical inputs always give identical results.
    pub fn resolve(bytes: &[u8], requested: EncodingMode) -> EncodingResolution {
        match requested.codec() {
            Some(codec) => EncodingResolution::new(codec, ResolutionReason::ExplicitSelection),
            None => Self::detect(bytes),
        }
    }

    fn detect(bytes: &[u8]) -> EncodingResolution {
        if has_utf8_bom(bytes) {
            return EncodingResolution::new(TextCodec::Utf8Bom, ResolutionReason::ByteOrderMark);
        }

        if TextCodec::Utf8NoBom.can_decode(bytes) {
            return EncodingResolution::new(TextCodec::Utf8NoBom, ResolutionReason::ValidUtf8);
        }

        let cp932_valid = TextCodec::Cp932.can_decode(bytes);
        let shift_jis_valid = TextCodec::ShiftJis.can_decode(bytes);

        let resolution = match (cp932_valid, shift_jis_valid) {
            (true, true) => EncodingResolution::new(
                TextCodec::Cp932,
                ResolutionReason::AmbiguousCp932ShiftJis,
            ),
            (true, false) => EncodingResolution::new(TextCodec::Cp932, ResolutionReason::ValidCp932),
            (false, true) => {
                EncodingResolution::new(TextCodec::ShiftJis, ResolutionReason::ValidShiftJis)
            }
            (false, false) => EncodingResolution::new(
                TextCodec::Cp932,
                ResolutionReason::UndetectableFallback,
            ),
        };

        log::trace!(
            "cp932 valid: {}, shift_jis valid: {} -> {}",
            cp932_valid,
            shift_jis_valid,
            resolution.summary()
        );
        resolution
    }
}

pub fn has_utf8_bom(bytes: &[u8]) -> bool {
    bytes.starts_with(&UTF8_BOM)
}
