// ============================================================================
// Encoding Catalog
//
// The closed set of encodings and line endings textmerger understands,
// together with their display labels. Everything here is a pure lookup.
// ============================================================================

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::codec::TextCodec;
use crate::errors::{MergerError, MergerResult};

/// Encoding requested for an input file or chosen for the output
///
/// `Auto` is only meaningful as an input request. It never appears in a
/// resolution and cannot be used for output.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum EncodingMode {
    #[default]
    Auto,
    ShiftJis,
    Cp932,
    Utf8NoBom,
    Utf8Bom,
}

impl EncodingMode {
    /// Modes offered for input selection, in display order
    pub const INPUT_OPTIONS: [EncodingMode; 5] = [
        EncodingMode::Auto,
        EncodingMode::ShiftJis,
        EncodingMode::Cp932,
        EncodingMode::Utf8NoBom,
        EncodingMode::Utf8Bom,
    ];

    /// Modes offered for output selection, in display order
    pub const OUTPUT_OPTIONS: [EncodingMode; 4] = [
        EncodingMode::ShiftJis,
        EncodingMode::Cp932,
        EncodingMode::Utf8NoBom,
        EncodingMode::Utf8Bom,
    ];

    pub fn label(self) -> &'static str {
        match self {
            EncodingMode::Auto => "Auto",
            EncodingMode::ShiftJis => "Shift_JIS",
            EncodingMode::Cp932 => "CP932",
            EncodingMode::Utf8NoBom => "UTF-8 (no BOM)",
            EncodingMode::Utf8Bom => "UTF-8 (BOM)",
        }
    }

    /// Concrete codec for this mode, `None` for `Auto`
    pub fn codec(self) -> Option<TextCodec> {
        match self {
            EncodingMode::Auto => None,
            EncodingMode::ShiftJis => Some(TextCodec::ShiftJis),
            EncodingMode::Cp932 => Some(TextCodec::Cp932),
            EncodingMode::Utf8NoBom => Some(TextCodec::Utf8NoBom),
            EncodingMode::Utf8Bom => Some(TextCodec::Utf8Bom),
        }
    }

    /// Codec used to encode the merged output
    pub fn output_codec(self) -> MergerResult<TextCodec> {
        self.codec().ok_or_else(|| {
            MergerError::InvalidConfiguration(format!(
                "{} cannot be used as an output encoding",
                self.label()
            ))
        })
    }
}

impl fmt::Display for EncodingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Line-ending convention of the merged output
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum LineEndingMode {
    #[default]
    Crlf,
    Lf,
}

impl LineEndingMode {
    pub const CHOICES: [LineEndingMode; 2] = [LineEndingMode::Crlf, LineEndingMode::Lf];

    pub fn label(self) -> &'static str {
        match self {
            LineEndingMode::Crlf => "CRLF",
            LineEndingMode::Lf => "LF",
        }
    }

    /// Literal line terminator written to the output
    pub fn sequence(self) -> &'static str {
        match self {
            LineEndingMode::Crlf => "\r\n",
            LineEndingMode::Lf => "\n",
        }
    }
}

impl fmt::Display for LineEndingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_options_exclude_auto() {
        assert!(!EncodingMode::OUTPUT_OPTIONS.contains(&EncodingMode::Auto));
        assert_eq!(EncodingMode::INPUT_OPTIONS[0], EncodingMode::Auto);
        assert_eq!(&EncodingMode::INPUT_OPTIONS[1..], &EncodingMode::OUTPUT_OPTIONS);
    }

    #[test]
    fn test_auto_has_label_but_no_codec() {
        assert_eq!(EncodingMode::Auto.label(), "Auto");
        assert!(EncodingMode::Auto.codec().is_none());
        assert!(matches!(
            EncodingMode::Auto.output_codec(),
            Err(MergerError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_output_codecs_resolve() {
        for mode in EncodingMode::OUTPUT_OPTIONS {
            let codec = mode.output_codec().expect("output mode has a codec");
            assert_eq!(EncodingMode::from(codec), mode);
        }
    }

    #[test]
    fn test_line_ending_choices() {
        let labels: Vec<_> = LineEndingMode::CHOICES.iter().map(|c| c.label()).collect();
        assert_eq!(labels, ["CRLF", "LF"]);
        assert_eq!(LineEndingMode::Crlf.sequence(), "\r\n");
        assert_eq!(LineEndingMode::Lf.sequence(), "\n");
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&EncodingMode::Utf8NoBom).unwrap();
        assert_eq!(json, "\"utf8-no-bom\"");
        let mode: EncodingMode = serde_json::from_str("\"shift-jis\"").unwrap();
        assert_eq!(mode, EncodingMode::ShiftJis);
    }
}
