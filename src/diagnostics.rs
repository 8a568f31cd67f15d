use std::path::{Path, PathBuf};

use crate::encoding::{self, EncodingMode};
use crate::merge::describe_read_error;

/// Advisory resolution report for one tracked file
///
/// Recomputed from the file's current bytes every time it is requested;
/// nothing here affects a merge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDiagnostic {
    pub path: PathBuf,
    pub summary: String,
    pub status: String,
    pub ready: bool,
}

pub const DETECTION_FAILED: &str = "detection failed";
pub const READY: &str = "ready";

pub fn diagnose(path: &Path, requested: EncodingMode) -> FileDiagnostic {
    match std::fs::read(path) {
        Ok(bytes) => {
            let (resolution, _) = encoding::read_text(&bytes, requested);
            FileDiagnostic {
                path: path.to_path_buf(),
                summary: resolution.summary(),
                status: READY.to_string(),
                ready: true,
            }
        }
        Err(e) => FileDiagnostic {
            path: path.to_path_buf(),
            summary: DETECTION_FAILED.to_string(),
            status: describe_read_error(&e),
            ready: false,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_diagnose_reports_label_and_reason() -> std::io::Result<()> {
        let file = NamedTempFile::new()?;
        std::fs::write(file.path(), [0x93, 0xFA, 0x96, 0x7B])?;

        let auto = diagnose(file.path(), EncodingMode::Auto);
        assert!(auto.ready);
        assert_eq!(
            auto.summary,
            "CP932 (ambiguous between CP932 and Shift-JIS; CP932 chosen as superset)"
        );

        let pinned = diagnose(file.path(), EncodingMode::ShiftJis);
        assert_eq!(pinned.summary, "Shift_JIS (explicit user selection)");
        Ok(())
    }

    #[test]
    fn test_diagnose_missing_file() {
        let diagnostic = diagnose(Path::new("/definitely/not/here.txt"), EncodingMode::Auto);
        assert!(!diagnostic.ready);
        assert_eq!(diagnostic.summary, DETECTION_FAILED);
        assert_eq!(diagnostic.status, "file not found");
    }
}
