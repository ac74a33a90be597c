//! Human-readable output formatter with colors and styling.

use super::formatter::ArchiveListing;
use super::formatter::DistributionFile;
use super::formatter::FileReport;
use super::formatter::OutputFormatter;
use anyhow::Result;
use console::Term;
use console::style;
use inspector_core::FileContents;
use inspector_core::analysis::Finding;
use inspector_core::analysis::Severity;
use inspector_core::registry::ReleaseGroup;
use std::borrow::Cow;

pub struct HumanFormatter {
    verbose: bool,
    quiet: bool,
    use_colors: bool,
    term: Term,
    err_term: Term,
}

impl HumanFormatter {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self {
            verbose,
            quiet,
            use_colors: console::colors_enabled(),
            term: Term::stdout(),
            err_term: Term::stderr(),
        }
    }

    fn format_size(bytes: u64) -> String {
        const KB: u64 = 1024;
        const MB: u64 = KB * 1024;
        const GB: u64 = MB * 1024;

        if bytes >= GB {
            format!("{:.1} GB", bytes as f64 / GB as f64)
        } else if bytes >= MB {
            format!("{:.1} MB", bytes as f64 / MB as f64)
        } else if bytes >= KB {
            format!("{:.1} KB", bytes as f64 / KB as f64)
        } else {
            format!("{bytes} B")
        }
    }

    fn heading(&self, text: &str) -> Result<()> {
        if self.quiet {
            return Ok(());
        }
        if self.use_colors {
            self.term.write_line(&style(text).bold().to_string())?;
        } else {
            self.term.write_line(text)?;
        }
        Ok(())
    }

    fn finding_line(&self, finding: &Finding) -> String {
        let label = finding.sanitized_label();
        let Some(value) = finding.sanitized_value() else {
            return self.paint(finding.severity, &label);
        };

        if self.use_colors {
            format!("{}: {}", style(&label).bold(), self.paint(finding.severity, &value))
        } else {
            format!("{label}: {value}")
        }
    }

    fn paint(&self, severity: Severity, text: &str) -> String {
        if !self.use_colors {
            return text.to_string();
        }
        match severity {
            Severity::High => style(text).red().bold().to_string(),
            Severity::Medium => style(text).yellow().to_string(),
            Severity::Normal => text.to_string(),
        }
    }
}

/// Strips terminal control characters from archive-provided text, keeping
/// line structure.
fn printable(text: &str) -> Cow<'_, str> {
    let is_unsafe = |c: char| c.is_control() && c != '\n' && c != '\t';
    if text.chars().any(is_unsafe) {
        Cow::Owned(text.chars().filter(|&c| !is_unsafe(c)).collect())
    } else {
        Cow::Borrowed(text)
    }
}

impl OutputFormatter for HumanFormatter {
    fn format_versions(&self, project: &str, groups: &[ReleaseGroup]) -> Result<()> {
        self.heading(&format!("{project} ({} releases)", groups.len()))?;

        for group in groups {
            let platforms = group.platforms.join(", ");
            if self.use_colors {
                self.term.write_line(&format!(
                    "  {:<20} {}",
                    style(printable(&group.version)).green(),
                    style(printable(&platforms)).dim()
                ))?;
            } else {
                self.term.write_line(&format!(
                    "  {:<20} {}",
                    printable(&group.version),
                    printable(&platforms)
                ))?;
            }
        }

        Ok(())
    }

    fn format_distributions(
        &self,
        project: &str,
        version: &str,
        files: &[DistributionFile],
    ) -> Result<()> {
        self.heading(&format!(
            "{} {} ({} distributions)",
            printable(project),
            printable(version),
            files.len()
        ))?;

        for file in files {
            let platform = printable(&file.platform);
            if self.use_colors {
                self.term.write_line(&format!(
                    "  {:<20} {}",
                    style(platform).green(),
                    printable(&file.filename)
                ))?;
            } else {
                self.term
                    .write_line(&format!("  {platform:<20} {}", printable(&file.filename)))?;
            }
            if self.verbose {
                self.term.write_line(&format!("  {:<20} {}", "", printable(&file.url)))?;
            }
        }

        Ok(())
    }

    fn format_listing(&self, listing: &ArchiveListing<'_>) -> Result<()> {
        self.heading(&format!(
            "{} ({}, {}, {} files)",
            printable(listing.name),
            listing.format,
            Self::format_size(listing.size),
            listing.entries.len()
        ))?;

        for entry in listing.entries {
            self.term.write_line(&printable(entry))?;
        }

        Ok(())
    }

    fn format_file(&self, _operation: &str, report: &FileReport<'_>) -> Result<()> {
        self.heading(&printable(report.path))?;

        for finding in report.findings {
            self.term
                .write_line(&format!("  {}", self.finding_line(finding)))?;
        }

        if let Some(link) = report.report_link {
            self.term.write_line(&format!("  Report: {link}"))?;
        }

        match report.contents {
            Some(FileContents::Text { text, syntax }) => {
                if self.verbose
                    && let Some(syntax) = syntax
                {
                    self.term
                        .write_line(&format!("  Syntax: {}", printable(syntax)))?;
                }
                self.term.write_line("")?;
                self.term.write_str(&printable(text))?;
                if !text.ends_with('\n') {
                    self.term.write_line("")?;
                }
            }
            Some(FileContents::Binary) => {
                self.term.write_line("")?;
                self.term.write_line("Binary files are not supported.")?;
            }
            None => {}
        }

        Ok(())
    }

    fn format_tool_output(&self, _operation: &str, path: &str, output: &str) -> Result<()> {
        self.heading(&printable(path))?;
        self.term.write_str(&printable(output))?;
        if !output.ends_with('\n') {
            self.term.write_line("")?;
        }
        Ok(())
    }

    fn format_warning(&self, message: &str) {
        if self.quiet {
            return;
        }

        if self.use_colors {
            let _ = self
                .err_term
                .write_line(&format!("{} {message}", style("⚠").yellow().bold()));
        } else {
            let _ = self.err_term.write_line(&format!("WARNING: {message}"));
        }
    }
}
