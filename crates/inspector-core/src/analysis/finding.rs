//! Labeled results of the forensic checks.

use std::borrow::Cow;
use std::fmt;

use serde::Serialize;

/// How much attention a finding deserves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational.
    Normal,
    /// Worth a look.
    Medium,
    /// Likely suspicious.
    High,
}

impl Severity {
    /// Lower-case name of the severity.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One labeled result of the forensic pipeline.
///
/// Label and value are derived from file names and contents, so they are
/// untrusted unless `trusted` is set. Rendering code should go through
/// [`Finding::sanitized_label`] and [`Finding::sanitized_value`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    /// Severity of the finding.
    pub severity: Severity,
    /// Property name, e.g. `SHA-256`.
    pub label: String,
    /// Optional property value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// Whether label and value are safe to emit verbatim.
    pub trusted: bool,
}

impl Finding {
    /// Creates an untrusted finding.
    #[must_use]
    pub fn new(severity: Severity, label: impl Into<String>, value: Option<String>) -> Self {
        Self {
            severity,
            label: label.into(),
            value,
            trusted: false,
        }
    }

    /// Label with control characters removed unless the finding is trusted.
    #[must_use]
    pub fn sanitized_label(&self) -> Cow<'_, str> {
        self.sanitize(&self.label)
    }

    /// Value with control characters removed unless the finding is trusted.
    #[must_use]
    pub fn sanitized_value(&self) -> Option<Cow<'_, str>> {
        self.value.as_deref().map(|value| self.sanitize(value))
    }

    fn sanitize<'a>(&self, text: &'a str) -> Cow<'a, str> {
        if self.trusted || !text.chars().any(char::is_control) {
            Cow::Borrowed(text)
        } else {
            Cow::Owned(text.chars().filter(|c| !c.is_control()).collect())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_order() {
        assert!(Severity::Normal < Severity::Medium);
        assert!(Severity::Medium < Severity::High);
        assert_eq!(Severity::High.to_string(), "high");
    }

    #[test]
    fn test_new_is_untrusted() {
        let finding = Finding::new(Severity::Normal, "SHA-256", Some("ab".into()));
        assert!(!finding.trusted);
    }

    #[test]
    fn test_sanitize_strips_escape_sequences() {
        let finding = Finding::new(
            Severity::High,
            "evil\x1b[2Jlabel",
            Some("line\r\nbreak\x07".into()),
        );
        assert_eq!(finding.sanitized_label(), "evil[2Jlabel");
        assert_eq!(finding.sanitized_value().unwrap(), "linebreak");
    }

    #[test]
    fn test_sanitize_borrows_clean_text() {
        let finding = Finding::new(Severity::Normal, "Entropy", Some("4.5".into()));
        assert!(matches!(finding.sanitized_label(), Cow::Borrowed(_)));
    }

    #[test]
    fn test_trusted_passes_verbatim() {
        let finding = Finding {
            trusted: true,
            ..Finding::new(Severity::Normal, "a\tb", None)
        };
        assert_eq!(finding.sanitized_label(), "a\tb");
        assert!(finding.sanitized_value().is_none());
    }
}
