// ============================================================================
// Merge Engine
//
// Reads every requested file, resolves and decodes it, concatenates the
// texts in request order, normalizes line endings over the whole result and
// writes it once in the output encoding.
//
// A file that cannot be read is recorded and skipped. Configuration
// problems, a batch where nothing could be read, and a failed output write
// abort the whole call. The engine is synchronous; callers that need a
// responsive front end run it on a blocking worker.
// ============================================================================

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use crate::encoding::{
    EncodingConverter, EncodingMode, EncodingResolution, EncodingResolver, EncodingStats,
    LineEndingMode,
};
use crate::errors::{MergerError, MergerResult};

/// One input file and the encoding the caller wants it read with
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMergeRequest {
    pub path: PathBuf,
    #[serde(default, rename = "encoding")]
    pub requested_encoding: EncodingMode,
}

impl FileMergeRequest {
    pub fn new(path: impl Into<PathBuf>, requested_encoding: EncodingMode) -> Self {
        Self {
            path: path.into(),
            requested_encoding,
        }
    }
}

/// A file that was left out of the merge, and why
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMergeError {
    pub path: PathBuf,
    pub message: String,
}

impl FileMergeError {
    pub fn new(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FileMergeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path.display(), self.message)
    }
}

/// Tally of a completed merge
///
/// `success_count + failure_count` always equals the number of requests,
/// and `success_count` is at least one.
#[derive(Debug, Clone)]
pub struct MergeOutcome {
    pub success_count: usize,
    pub failure_count: usize,
    pub errors: Vec<FileMergeError>,
    pub stats: EncodingStats,
}

impl MergeOutcome {
    pub fn total(&self) -> usize {
        self.success_count + self.failure_count
    }
}

/// A successfully read and decoded input
struct DecodedFile {
    resolution: EncodingResolution,
    text: String,
    byte_len: usize,
    lossy: bool,
}

pub struct MergeEngine;

impl MergeEngine {
    /// Merge `requests` in order into `output_path`
    ///
    /// Any existing file at `output_path` is overwritten, but only once at
    /// least one input has been read.
    pub fn merge_and_write(
        requests: &[FileMergeRequest],
        output_path: &Path,
        output_encoding: EncodingMode,
        line_ending: LineEndingMode,
    ) -> MergerResult<MergeOutcome> {
        if requests.is_empty() {
            return Err(MergerError::InvalidConfiguration(
                "there are no files to merge".to_string(),
            ));
        }
        let output_codec = output_encoding.output_codec()?;

        info!(
            "Merging {} files into {} ({}, {})",
            requests.len(),
            output_path.display(),
            output_encoding,
            line_ending
        );

        let mut stats = EncodingStats::new();
        stats.start_timing();

        let mut merged = String::new();
        let mut errors = Vec::new();
        let mut success_count = 0;

        for request in requests {
            match Self::read_request(request) {
                Ok(decoded) => {
                    debug!(
                        "{} -> {}",
                        request.path.display(),
                        decoded.resolution.summary()
                    );
                    stats.record_resolution(&decoded.resolution, decoded.byte_len);
                    if decoded.lossy {
                        stats.record_lossy_decode();
                    }
                    merged.push_str(&decoded.text);
                    success_count += 1;
                }
                Err(error) => {
                    warn!("Skipping {}", error);
                    errors.push(error);
                }
            }
        }

        if success_count == 0 {
            return Err(MergerError::AllInputsFailed { errors });
        }

        let normalized = EncodingConverter::normalize_line_endings(&merged, line_ending);
        drop(merged);
        let (bytes, unmappable) = EncodingConverter::encode(&normalized, output_codec);

        std::fs::write(output_path, &bytes).map_err(|source| MergerError::OutputWriteFailure {
            path: output_path.to_path_buf(),
            source,
        })?;

        stats.record_output(bytes.len(), unmappable);
        stats.stop_timing();
        info!("{}", stats.log_summary());

        Ok(MergeOutcome {
            success_count,
            failure_count: errors.len(),
            errors,
            stats,
        })
    }

    fn read_request(request: &FileMergeRequest) -> Result<DecodedFile, FileMergeError> {
        let bytes = std::fs::read(&request.path)
            .map_err(|e| FileMergeError::new(&request.path, describe_read_error(&e)))?;

        let resolution = EncodingResolver::resolve(&bytes, request.requested_encoding);
        let (text, lossy) = EncodingConverter::decode_with_report(&bytes, &resolution);

        Ok(DecodedFile {
            resolution,
            text,
            byte_len: bytes.len(),
            lossy,
        })
    }
}

/// Short, user-facing description of a failed read
pub fn describe_read_error(err: &io::Error) -> String {
    match err.kind() {
        io::ErrorKind::NotFound => "file not found".to_string(),
        io::ErrorKind::PermissionDenied => "access denied".to_string(),
        _ => format!("read failed: {}", err),
    }
}
