//! Extension allow-list

/// Suffix allow-list applied to changed paths
///
/// An empty filter admits every path. Entries are matched as plain
/// suffixes, so `.py` admits `main.py` and `py` also admits `happy`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtensionFilter {
    suffixes: Vec<String>,
}

impl ExtensionFilter {
    /// Filter that admits everything
    pub fn allow_all() -> Self {
        Self::default()
    }

    /// Build from a list of suffixes; blank entries are dropped
    pub fn new<I, S>(suffixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            suffixes: suffixes
                .into_iter()
                .map(|s| s.as_ref().trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
        }
    }

    /// Parse a comma-separated list such as `.py,.txt`
    pub fn parse_csv(csv: &str) -> Self {
        Self::new(csv.split(','))
    }

    pub fn is_unrestricted(&self) -> bool {
        self.suffixes.is_empty()
    }

    pub fn suffixes(&self) -> &[String] {
        &self.suffixes
    }

    pub fn allows(&self, path: &str) -> bool {
        self.is_unrestricted() || self.suffixes.iter().any(|s| path.ends_with(s.as_str()))
    }
}
