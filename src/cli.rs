// ============================================================================
// CLI Module - Command-Line Interface Definitions
//
// Defines the textmerger command line with clap derive macros: one
// subcommand per operation plus global logging flags.
// ============================================================================

use clap::{Parser, Subcommand}; // Command-line parsing with derive macros
use log::LevelFilter; // Logging level configuration
use std::path::PathBuf; // Cross-platform file path handling

use crate::encoding::{EncodingMode, LineEndingMode};

// ============================================================================
// MAIN CLI STRUCTURE
// ============================================================================

/// textmerger - merge text files with mixed Japanese and UTF-8 encodings
///
/// Concatenates files and folders in the order given, decoding each input
/// with a detected or chosen encoding and writing a single output in one
/// encoding and one line-ending convention.
///
/// Examples:
///   textmerger merge a.txt notes/ -o merged.txt
///   textmerger merge legacy/ --input-encoding cp932 --output-encoding utf8-bom
///   textmerger detect notes/ --ext txt,md
#[derive(Parser)]
#[command(
    name = "textmerger",
    about = "Merge text files with mixed Shift_JIS, CP932 and UTF-8 encodings",
    version,
    after_help = "Examples:\n  \
                  textmerger merge a.txt b.txt -o merged.txt\n  \
                  textmerger merge docs/ --ext txt,md --line-ending lf\n  \
                  textmerger detect docs/\n  \
                  textmerger generate-config merge.json"
)]
pub struct Cli {
    /// Increase verbosity level (can be used multiple times)
    #[arg(
        global = true,
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count, // Counts occurrences: -vv = 2
        help = "Increase verbosity (-v: debug, -vv: trace)"
    )]
    verbose: u8,

    /// The operation to perform
    #[command(subcommand)]
    pub command: Commands,

    /// Set the logging level explicitly
    #[arg(
        global = true,
        long,
        default_value = "info",
        help = "Set log level explicitly [error|warn|info|debug|trace]"
    )]
    log_level: String,

    /// Also write log lines to this file
    #[arg(global = true, long = "log-file", value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Write error-level log lines to this file
    #[arg(global = true, long = "error-log", value_name = "FILE")]
    pub error_log: Option<PathBuf>,
}

// ============================================================================
// SUBCOMMAND DEFINITIONS
// ============================================================================

/// Available subcommands for different operations
#[derive(Subcommand)]
pub enum Commands {
    /// Merge files and folders into one output file
    #[command(
        about = "Merge files and folders into one output file",
        long_about = "Concatenate the given files, and the files found inside the given folders, \
                      into a single output. Each input is decoded with its requested encoding \
                      or an auto-detected one. Files that cannot be read are skipped and reported.\n\n\
                      Examples:\n  \
                      textmerger merge a.txt b.txt -o merged.txt\n  \
                      textmerger merge docs/ --ext txt,md --output-encoding cp932\n  \
                      textmerger merge -c merge.json"
    )]
    Merge(MergeArgs),

    /// Show how each file would be decoded
    #[command(about = "Show the encoding each input would be read with, and why")]
    Detect(DetectArgs),

    /// List supported encodings and line endings
    #[command(about = "List the supported input encodings, output encodings and line endings")]
    Encodings,

    /// Generate a configuration file template
    #[command(
        about = "Generate a JSON configuration file template",
        long_about = "Write a JSON configuration file listing inputs, output, encodings, \
                      line ending and extension filter. Edit it and pass it to `merge -c`.\n\n\
                      Example:\n  \
                      textmerger generate-config merge.json"
    )]
    GenerateConfig(GenerateConfigArgs),

    /// Run interactive guided setup
    #[command(about = "Run interactive guided setup for configuration")]
    GuidedSetup(GuidedSetupArgs),
}

// Structure defining all possible arguments for the merge command
#[derive(Parser, Clone)]
pub struct MergeArgs {
    // Files and folders to merge, in order
    #[arg(help = "Files and folders to merge, in order", value_name = "PATH")]
    pub paths: Vec<PathBuf>,

    // Output path for merged text
    #[arg(
        short = 'o',
        long = "output",
        help = "Destination path for the merged file [default: merged.txt]",
        value_name = "FILE"
    )]
    pub output: Option<PathBuf>,

    // Encoding requested for command-line inputs
    #[arg(
        long = "input-encoding",
        value_enum,
        default_value_t = EncodingMode::Auto,
        help = "Encoding of the command-line inputs"
    )]
    pub input_encoding: EncodingMode,

    #[arg(long = "output-encoding", value_enum, help = "Encoding of the merged file [default: utf8-no-bom]")]
    pub output_encoding: Option<EncodingMode>,

    #[arg(long = "line-ending", value_enum, help = "Line ending of the merged file [default: crlf]")]
    pub line_ending: Option<LineEndingMode>,

    // Extension filter for files found inside folders
    #[arg(
        long = "ext",
        help = "Extensions to take from folders, e.g. txt,md (files named directly are always merged)",
        value_name = "LIST"
    )]
    pub extensions: Option<String>,

    // Configuration file path
    #[arg(
        short = 'c',
        long = "config",
        help = "JSON configuration file with default settings",
        value_name = "FILE"
    )]
    pub config: Option<PathBuf>,
}

// Arguments for the detect command
#[derive(Parser, Clone)]
pub struct DetectArgs {
    #[arg(required = true, help = "Files and folders to inspect", value_name = "PATH")]
    pub paths: Vec<PathBuf>,

    #[arg(
        long = "input-encoding",
        value_enum,
        default_value_t = EncodingMode::Auto,
        help = "Encoding to report for every input"
    )]
    pub input_encoding: EncodingMode,

    #[arg(long = "ext", help = "Extensions to take from folders", value_name = "LIST")]
    pub extensions: Option<String>,
}

// Arguments for the generate-config command
#[derive(Parser, Clone)]
pub struct GenerateConfigArgs {
    // Output path for the configuration file
    #[arg(help = "Destination path for configuration file", value_name = "FILE")]
    pub output: PathBuf,
}

// Arguments for the guided-setup command
#[derive(Parser, Clone)]
pub struct GuidedSetupArgs {
    // Output path for the generated configuration
    #[arg(
        help = "Destination path for interactive configuration",
        value_name = "FILE"
    )]
    pub output: PathBuf,
}

// Implementation of helper methods for the Cli struct
impl Cli {
    // Resolve the effective log level; -v flags raise it above --log-level
    pub fn log_level(&self) -> LevelFilter {
        let explicit = match self.log_level.as_str() {
            "error" => LevelFilter::Error,
            "warn" => LevelFilter::Warn,
            "info" => LevelFilter::Info,
            "debug" => LevelFilter::Debug,
            "trace" => LevelFilter::Trace,
            _ => LevelFilter::Info,
        };
        let from_verbose = match self.verbose {
            0 => LevelFilter::Off,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        };
        explicit.max(from_verbose)
    }

    pub fn verbose_count(&self) -> u8 {
        self.verbose
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_defaults() {
        let cli = Cli::parse_from(["textmerger", "merge", "a.txt", "docs"]);
        assert_eq!(cli.log_level(), LevelFilter::Info);
        match cli.command {
            Commands::Merge(args) => {
                assert_eq!(args.paths, vec![PathBuf::from("a.txt"), PathBuf::from("docs")]);
                assert_eq!(args.input_encoding, EncodingMode::Auto);
                assert!(args.output.is_none());
                assert!(args.output_encoding.is_none());
                assert!(args.line_ending.is_none());
            }
            _ => panic!("expected merge"),
        }
    }

    #[test]
    fn test_merge_encoding_flags() {
        let cli = Cli::parse_from([
            "textmerger",
            "merge",
            "a.txt",
            "--input-encoding",
            "shift-jis",
            "--output-encoding",
            "utf8-bom",
            "--line-ending",
            "lf",
            "-o",
            "out.txt",
        ]);
        match cli.command {
            Commands::Merge(args) => {
                assert_eq!(args.input_encoding, EncodingMode::ShiftJis);
                assert_eq!(args.output_encoding, Some(EncodingMode::Utf8Bom));
                assert_eq!(args.line_ending, Some(LineEndingMode::Lf));
                assert_eq!(args.output, Some(PathBuf::from("out.txt")));
            }
            _ => panic!("expected merge"),
        }
    }

    #[test]
    fn test_verbose_raises_level() {
        let cli = Cli::parse_from(["textmerger", "-vv", "encodings"]);
        assert_eq!(cli.log_level(), LevelFilter::Trace);
        assert_eq!(cli.verbose_count(), 2);

        let cli = Cli::parse_from(["textmerger", "--log-level", "warn", "encodings"]);
        assert_eq!(cli.log_level(), LevelFilter::Warn);
    }

    #[test]
    fn test_detect_requires_paths() {
        assert!(Cli::try_parse_from(["textmerger", "detect"]).is_err());
    }
}
