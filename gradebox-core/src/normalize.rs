//! Remote name → local path segment.
//!
//! Every segment derived from a remote name (course code, assignment name,
//! `login:name`, filename) goes through the same [`NameNormalizer`], so a
//! given remote entity maps to the same local path on every run.

/// Maps display strings to single filesystem path segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NameNormalizer {
    despace: bool,
}

impl Default for NameNormalizer {
    fn default() -> Self {
        Self { despace: true }
    }
}

impl NameNormalizer {
    /// `despace = false` keeps spaces as-is.
    pub fn new(despace: bool) -> Self {
        Self { despace }
    }

    pub fn despace(&self) -> bool {
        self.despace
    }

    /// Normalize one segment.
    ///
    /// Spaces become `_` when despacing. Path separators always become `_`
    /// and `""`, `.`, `..` become `_`, so the result never escapes or
    /// splits its parent directory.
    pub fn segment(&self, name: &str) -> String {
        let mapped: String = name
            .chars()
            .map(|c| match c {
                ' ' if self.despace => '_',
                '/' | '\\' => '_',
                other => other,
            })
            .collect();
        match mapped.as_str() {
            "" | "." | ".." => "_".to_string(),
            _ => mapped,
        }
    }
}
