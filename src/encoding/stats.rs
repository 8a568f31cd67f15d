// ============================================================================
// Encoding Statistics Module
//
// Tallies what happened to the encodings during one merge: which encodings
// were detected, forced by the user or guessed, how many files decoded with
// replacements, and how many bytes went in and out.
// ============================================================================

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use super::resolver::{EncodingResolution, ResolutionReason};

/// Statistics collector for encoding operations
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EncodingStats {
    files_processed: usize,
    encodings_detected: BTreeMap<String, usize>,
    encodings_forced: BTreeMap<String, usize>,
    encoding_fallbacks: BTreeMap<String, usize>,
    lossy_decodes: usize,
    unmappable_characters: usize,
    bytes_read: u64,
    bytes_written: u64,
    processing_time: Duration,
    start_time: Option<Instant>,
}

impl EncodingStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start_timing(&mut self) {
        self.start_time = Some(Instant::now());
    }

    pub fn stop_timing(&mut self) {
        if let Some(start) = self.start_time.take() {
            self.processing_time = start.elapsed();
        }
    }

    /// Record a decoded file and how its encoding was chosen
    pub fn record_resolution(&mut self, resolution: &EncodingResolution, bytes: usize) {
        self.files_processed += 1;
        self.bytes_read += bytes as u64;

        let bucket = match resolution.reason {
            ResolutionReason::ExplicitSelection => &mut self.encodings_forced,
            ResolutionReason::UndetectableFallback => &mut self.encoding_fallbacks,
            _ => &mut self.encodings_detected,
        };
        *bucket.entry(resolution.label.to_string()).or_insert(0) += 1;
    }

    /// Record that a decode had to substitute replacement characters
    pub fn record_lossy_decode(&mut self) {
        self.lossy_decodes += 1;
    }

    pub fn record_output(&mut self, bytes: usize, unmappable: usize) {
        self.bytes_written += bytes as u64;
        self.unmappable_characters += unmappable;
    }

    pub fn files_processed(&self) -> usize {
        self.files_processed
    }

    pub fn lossy_decodes(&self) -> usize {
        self.lossy_decodes
    }

    pub fn fallback_count(&self) -> usize {
        self.encoding_fallbacks.values().sum()
    }

    /// Multi-line summary for the end of a merge
    pub fn summary_lines(&self) -> Vec<String> {
        let mut lines = vec![format!("Files decoded: {}", self.files_processed)];

        let groups = [
            ("Auto-detected", &self.encodings_detected),
            ("Selected by user", &self.encodings_forced),
            ("Fallback", &self.encoding_fallbacks),
        ];
        for (title, counts) in groups {
            if counts.is_empty() {
                continue;
            }
            let parts: Vec<String> = counts
                .iter()
                .map(|(encoding, count)| format!("{}: {}", encoding, count))
                .collect();
            lines.push(format!("{}: {}", title, parts.join(", ")));
        }

        if self.lossy_decodes > 0 {
            lines.push(format!(
                "Files with replaced characters: {}",
                self.lossy_decodes
            ));
        }
        if self.unmappable_characters > 0 {
            lines.push(format!(
                "Characters written as '?': {}",
                self.unmappable_characters
            ));
        }

        lines.push(format!(
            "Data: {} read, {} written",
            format_bytes(self.bytes_read),
            format_bytes(self.bytes_written)
        ));
        lines
    }

    /// One-line summary for logging
    pub fn log_summary(&self) -> String {
        format!(
            "Encoding stats: {} files, {} fallback(s), {} lossy decode(s), {} unmappable, {} -> {} in {:.2}s",
            self.files_processed,
            self.fallback_count(),
            self.lossy_decodes,
            self.unmappable_characters,
            format_bytes(self.bytes_read),
            format_bytes(self.bytes_written),
            self.processing_time.as_secs_f64()
        )
    }
}

/// Format bytes in human-readable format
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];

    if bytes == 0 {
        return "0 B".to_string();
    }

    let bytes = bytes as f64;
    let i = (bytes.log10() / 1000_f64.log10()).floor() as usize;
    let i = i.min(UNITS.len() - 1);

    let size = bytes / (1000_f64.powi(i as i32));

    if i == 0 {
        format!("{} {}", bytes as u64, UNITS[i])
    } else {
        format!("{:.1} {}", size, UNITS[i])
    }
}
