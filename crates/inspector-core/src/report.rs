//! Prefilled "report malicious package" links.

use percent_encoding::AsciiSet;
use percent_encoding::NON_ALPHANUMERIC;
use percent_encoding::utf8_percent_encode;

/// Registry security contact.
pub const SECURITY_CONTACT: &str = "security@rubygems.org";

/// Characters left as-is in mailto components: unreserved marks and `/`.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~')
    .remove(b'/');

/// Builds a `mailto:` link reporting one file of a release as malicious.
///
/// `source` is where the reviewer looked at the file, included so the
/// security team can follow along.
///
/// # Examples
///
/// ```
/// use inspector_core::report::mailto_report_link;
///
/// let link = mailto_report_link("rake", "13.0.6", "ruby", "lib/rake.rb", "inspector");
/// assert!(link.starts_with("mailto:security@rubygems.org?subject=Malicious%20Package%20Report%3A%20rake&body="));
/// ```
#[must_use]
pub fn mailto_report_link(
    project: &str,
    version: &str,
    platform: &str,
    path: &str,
    source: &str,
) -> String {
    let subject = format!("Malicious Package Report: {project}");
    let body = format!(
        "RubyGems Malicious Package Report\n\
         --\n\
         Package Name: {project}\n\
         Version: {version}\n\
         Platform: {platform}\n\
         File Path: {path}\n\
         Inspector URL: {source}\n\n\
         Additional Information:\n\n"
    );

    format!(
        "mailto:{SECURITY_CONTACT}?subject={}&body={}",
        utf8_percent_encode(&subject, COMPONENT),
        utf8_percent_encode(&body, COMPONENT)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_is_encoded() {
        let link = mailto_report_link("evil-gem", "0.1.0", "ruby", "lib/evil.rb", "x");
        let body = link.split("&body=").nth(1).unwrap_or_default();
        assert!(body.starts_with("RubyGems%20Malicious%20Package%20Report%0A--%0A"));
        assert!(body.contains("Package%20Name%3A%20evil-gem%0A"));
        assert!(body.contains("File%20Path%3A%20lib/evil.rb%0A"));
        assert!(body.ends_with("Additional%20Information%3A%0A%0A"));
    }

    #[test]
    fn test_untrusted_path_cannot_break_out() {
        let link = mailto_report_link("p", "1", "ruby", "a&cc=attacker@x?y#z", "x");
        assert!(link.contains("a%26cc%3Dattacker%40x%3Fy%23z"));
        assert_eq!(link.matches('&').count(), 1);
    }
}
