// Import required dependencies
use indicatif::{ProgressBar, ProgressStyle};
use std::time::{Duration, Instant};

// Spinner shown while a merge runs; the merge itself reports no per-file progress
pub struct MergeProgress {
    spinner: ProgressBar,
    start_time: Instant,
}

impl MergeProgress {
    pub fn new(total_files: usize) -> Self {
        let spinner = ProgressBar::new_spinner();
        let style = ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        spinner.set_style(style);
        spinner.set_message(format!("Merging {} files...", total_files));
        spinner.enable_steady_tick(Duration::from_millis(100));

        Self {
            spinner,
            start_time: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    pub fn finish(&self, message: &str) {
        self.spinner.finish_with_message(format!(
            "{} in {:.2}s",
            message,
            self.elapsed().as_secs_f64()
        ));
    }

    pub fn abandon(&self, message: &str) {
        self.spinner.abandon_with_message(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hidden_progress_finishes() {
        let progress = MergeProgress {
            spinner: ProgressBar::hidden(),
            start_time: Instant::now(),
        };
        progress.finish("Merged 2 files");
        assert!(progress.spinner.is_finished());
    }
}
