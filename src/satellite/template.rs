use chrono::{Datelike, NaiveDate};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{ProcessingError, Result};

/// File name pattern for one satellite product.
///
/// Placeholders: `{YYYY}`, `{MM}`, `{DD}` and `{DOY}` (zero-padded day of
/// year). A template containing `*`, `?` or `[` is matched with glob and the
/// lexicographically first file wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTemplate {
    pattern: String,
}

impl PathTemplate {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    pub fn expand(&self, date: NaiveDate) -> String {
        self.pattern
            .replace("{YYYY}", &format!("{:04}", date.year()))
            .replace("{MM}", &format!("{:02}", date.month()))
            .replace("{DD}", &format!("{:02}", date.day()))
            .replace("{DOY}", &format!("{:03}", date.ordinal()))
    }

    pub fn is_glob(&self) -> bool {
        self.pattern.contains(['*', '?', '['])
    }

    /// Find the file for `date` under `dir`, if one exists.
    pub fn resolve(&self, dir: &Path, date: NaiveDate) -> Result<Option<PathBuf>> {
        let expanded = self.expand(date);

        if !self.is_glob() {
            let candidate = dir.join(expanded);
            return Ok(candidate.is_file().then_some(candidate));
        }

        let dir_str = dir.to_str().ok_or_else(|| {
            ProcessingError::InvalidFormat(format!(
                "Satellite directory is not valid UTF-8: {}",
                dir.display()
            ))
        })?;
        let escaped_dir = glob::Pattern::escape(dir_str);
        let pattern = Path::new(&escaped_dir).join(&expanded);
        let pattern = pattern.to_string_lossy();

        let mut matches: Vec<PathBuf> = glob::glob(&pattern)?
            .filter_map(|entry| match entry {
                Ok(path) => Some(path),
                Err(e) => {
                    debug!(error = %e, "Skipping unreadable glob entry");
                    None
                }
            })
            .filter(|path| path.is_file())
            .collect();
        matches.sort();

        Ok(matches.into_iter().next())
    }
}

impl std::fmt::Display for PathTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.pattern)
    }
}
