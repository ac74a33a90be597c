//! Spinner shown while a distribution downloads.

use console::Term;
use indicatif::ProgressBar;
use indicatif::ProgressStyle;
use std::time::Duration;

/// CLI spinner wrapper.
///
/// Drawn on stderr only when it is a terminal, so piped and JSON output
/// stay clean. Automatically cleans up on drop.
pub struct CliSpinner {
    bar: ProgressBar,
}

impl CliSpinner {
    /// Starts a spinner with the given message, or returns `None` when
    /// progress should not be shown.
    #[must_use]
    pub fn start(message: &str, enabled: bool) -> Option<Self> {
        if !enabled || !Self::should_show() {
            return None;
        }

        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg} ({elapsed})")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(100));
        Some(Self { bar })
    }

    /// Checks if we should show progress (TTY detection).
    #[must_use]
    pub fn should_show() -> bool {
        Term::stderr().is_term()
    }
}

impl Drop for CliSpinner {
    fn drop(&mut self) {
        self.bar.finish_and_clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_spinner() {
        assert!(CliSpinner::start("Downloading", false).is_none());
    }

    #[test]
    fn test_spinner_drop_is_clean() {
        // hidden when the test harness has no terminal; either way drop must not panic
        let spinner = CliSpinner::start("Downloading", true);
        drop(spinner);
    }
}
