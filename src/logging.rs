use anyhow::Context; // Names the file in open errors
use chrono::Local; // Timestamps for log lines
use crossterm::style::Stylize; // Colored level names on the console
use log::{Level, LevelFilter, Metadata, Record};
use std::{
    fs::{File, OpenOptions},
    io::Write,
    path::Path,
    sync::Mutex, // Thread-safe access to the log files
};

use crate::errors::{MergerError, MergerResult};

// Console logger that can also copy lines to a log file and errors to an error file
pub struct Logger {
    log_file: Option<Mutex<File>>,
    error_file: Option<Mutex<File>>,
    level: LevelFilter,
}

fn open_append(path: &Path) -> MergerResult<Mutex<File>> {
    let file = OpenOptions::new()
        .create(true) // Create the file if it doesn't exist
        .append(true) // Append to the file if it exists
        .open(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;
    Ok(Mutex::new(file))
}

impl Logger {
    pub fn new(
        log_path: Option<&Path>,
        error_path: Option<&Path>,
        level: LevelFilter,
    ) -> MergerResult<Self> {
        let log_file = log_path.map(open_append).transpose()?;
        let error_file = error_path.map(open_append).transpose()?;
        Ok(Self {
            log_file,
            error_file,
            level,
        })
    }

    // Install as the global logger
    pub fn init(
        log_path: Option<&Path>,
        error_path: Option<&Path>,
        level: LevelFilter,
    ) -> MergerResult<()> {
        let logger = Self::new(log_path, error_path, level)?;
        log::set_boxed_logger(Box::new(logger))
            .map_err(|e| MergerError::Processing(format!("Logger already set: {}", e)))?;
        log::set_max_level(level);
        Ok(())
    }

    fn timestamp() -> String {
        Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
    }

    // Plain line written to files
    fn format_plain(timestamp: &str, record: &Record) -> String {
        format!(
            "[{}] {} - {}: {}\n",
            timestamp,
            record.level(),
            record.target(),
            record.args()
        )
    }

    // Colored line written to the console
    fn format_console(timestamp: &str, record: &Record) -> String {
        let level_str = match record.level() {
            Level::Error => record.level().to_string().red(),
            Level::Warn => record.level().to_string().yellow(),
            Level::Info => record.level().to_string().green(),
            Level::Debug => record.level().to_string().blue(),
            Level::Trace => record.level().to_string().magenta(),
        };
        format!(
            "[{}] {} - {}: {}\n",
            timestamp,
            level_str,
            record.target(),
            record.args()
        )
    }

    fn write_to(file: &Option<Mutex<File>>, line: &str) {
        if let Some(file) = file {
            if let Ok(mut file) = file.lock() {
                let _ = file.write_all(line.as_bytes());
            }
        }
    }

    fn flush_file(file: &Option<Mutex<File>>) {
        if let Some(file) = file {
            if let Ok(mut file) = file.lock() {
                let _ = file.flush();
            }
        }
    }
}

impl log::Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let timestamp = Self::timestamp();

        // Log lines go to stderr so merge reports on stdout stay clean
        eprint!("{}", Self::format_console(&timestamp, record));

        let plain = Self::format_plain(&timestamp, record);
        Self::write_to(&self.log_file, &plain);
        if record.level() == Level::Error {
            Self::write_to(&self.error_file, &plain);
        }
    }

    fn flush(&self) {
        Self::flush_file(&self.log_file);
        Self::flush_file(&self.error_file);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::Log;
    use tempfile::tempdir;

    #[test]
    fn test_errors_are_copied_to_error_file() -> MergerResult<()> {
        let dir = tempdir()?;
        let log_path = dir.path().join("run.log");
        let error_path = dir.path().join("errors.log");
        let logger = Logger::new(Some(&log_path), Some(&error_path), LevelFilter::Info)?;

        logger.log(
            &Record::builder()
                .level(Level::Info)
                .target("textmerger")
                .args(format_args!("merging"))
                .build(),
        );
        logger.log(
            &Record::builder()
                .level(Level::Error)
                .target("textmerger")
                .args(format_args!("write failed"))
                .build(),
        );
        logger.log(
            &Record::builder()
                .level(Level::Debug)
                .target("textmerger")
                .args(format_args!("hidden"))
                .build(),
        );
        logger.flush();

        let log = std::fs::read_to_string(&log_path)?;
        let errors = std::fs::read_to_string(&error_path)?;
        assert!(log.contains("INFO - textmerger: merging"));
        assert!(log.contains("ERROR - textmerger: write failed"));
        assert!(!log.contains("hidden"));
        assert!(!errors.contains("merging"));
        assert!(errors.contains("write failed"));
        Ok(())
    }

    #[test]
    fn test_unopenable_log_file_names_the_path() {
        let result = Logger::new(
            Some(Path::new("/definitely/not/a/dir/run.log")),
            None,
            LevelFilter::Info,
        );
        match result {
            Err(err @ MergerError::Anyhow(_)) => {
                assert!(err.to_string().contains("/definitely/not/a/dir/run.log"))
            }
            Err(other) => panic!("unexpected error {other}"),
            Ok(_) => panic!("opening a log file in a missing directory should fail"),
        }
    }
}
