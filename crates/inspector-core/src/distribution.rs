//! Registry coordinates of a published distribution file.

use std::fmt;

/// Platform of the default, pure-Ruby build of a gem.
pub const DEFAULT_PLATFORM: &str = "ruby";

/// Identifies one distribution file on the registry.
///
/// The identity is derived from registry coordinates only, never from the
/// downloaded content.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DistributionId {
    /// Canonical project name.
    pub project: String,
    /// Version string as published.
    pub version: String,
    /// Build platform, `ruby` for the platform-independent build.
    pub platform: String,
}

impl DistributionId {
    /// Creates an identity for the default platform.
    #[must_use]
    pub fn new(project: impl Into<String>, version: impl Into<String>) -> Self {
        Self::with_platform(project, version, DEFAULT_PLATFORM)
    }

    /// Creates an identity for a specific platform build.
    #[must_use]
    pub fn with_platform(
        project: impl Into<String>,
        version: impl Into<String>,
        platform: impl Into<String>,
    ) -> Self {
        Self {
            project: project.into(),
            version: version.into(),
            platform: platform.into(),
        }
    }

    /// Release name as the registry's v2 API spells it: the version, with a
    /// `-{platform}` suffix for non-default platforms.
    #[must_use]
    pub fn release_name(&self) -> String {
        if self.platform == DEFAULT_PLATFORM {
            self.version.clone()
        } else {
            format!("{}-{}", self.version, self.platform)
        }
    }

    /// Full release name, `{project}-{version}` with a `-{platform}` suffix
    /// for non-default platforms.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{}-{}", self.project, self.release_name())
    }

    /// Distribution file name.
    ///
    /// # Examples
    ///
    /// ```
    /// use inspector_core::DistributionId;
    ///
    /// assert_eq!(DistributionId::new("rake", "13.0.6").filename(), "rake-13.0.6.gem");
    /// assert_eq!(
    ///     DistributionId::with_platform("nokogiri", "1.15.0", "x86_64-linux").filename(),
    ///     "nokogiri-1.15.0-x86_64-linux.gem"
    /// );
    /// ```
    #[must_use]
    pub fn filename(&self) -> String {
        format!("{}.gem", self.full_name())
    }

    /// Download URL below `download_base`.
    #[must_use]
    pub fn download_url(&self, download_base: &str) -> String {
        format!(
            "{}/gems/{}",
            download_base.trim_end_matches('/'),
            self.filename()
        )
    }

    /// Stable cache key.
    ///
    /// Every coordinate is length-prefixed, so distinct coordinates never
    /// produce the same key even when they contain the separator.
    #[must_use]
    pub fn cache_key(&self) -> String {
        let filename = self.filename();
        [
            self.project.as_str(),
            self.version.as_str(),
            self.platform.as_str(),
            filename.as_str(),
        ]
        .iter()
        .map(|part| format!("{}:{part}", part.len()))
        .collect::<Vec<_>>()
        .join("/")
    }
}

impl fmt::Display for DistributionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filename_default_platform() {
        let id = DistributionId::new("rails", "7.1.0");
        assert_eq!(id.platform, "ruby");
        assert_eq!(id.filename(), "rails-7.1.0.gem");
        assert_eq!(id.to_string(), "rails-7.1.0");
    }

    #[test]
    fn test_filename_platform() {
        let id = DistributionId::with_platform("ffi", "1.16.3", "java");
        assert_eq!(id.filename(), "ffi-1.16.3-java.gem");
        assert_eq!(id.release_name(), "1.16.3-java");
        assert_eq!(DistributionId::new("ffi", "1.16.3").release_name(), "1.16.3");
    }

    #[test]
    fn test_download_url() {
        let id = DistributionId::new("rake", "13.0.6");
        assert_eq!(
            id.download_url("https://index.rubygems.org/"),
            "https://index.rubygems.org/gems/rake-13.0.6.gem"
        );
    }

    #[test]
    fn test_cache_key_stable() {
        let a = DistributionId::new("rake", "13.0.6");
        let b = DistributionId::new("rake", "13.0.6");
        assert_eq!(a.cache_key(), b.cache_key());
        assert_eq!(a.cache_key(), "4:rake/6:13.0.6/4:ruby/15:rake-13.0.6.gem");
    }

    #[test]
    fn test_cache_key_collision_free() {
        // same file name, different coordinates
        let a = DistributionId::with_platform("a-b", "1", "ruby");
        let b = DistributionId::with_platform("a", "b-1", "ruby");
        assert_eq!(a.filename(), b.filename());
        assert_ne!(a.cache_key(), b.cache_key());
    }
}
