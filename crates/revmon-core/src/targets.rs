//! Loading the monitored target list.
//!
//! One target per line, either a bare address or `name address`. The
//! address is always the last whitespace-separated token so names may
//! contain spaces. Blank lines and `#` comments are skipped; nothing else
//! is validated.

use std::path::Path;

use crate::review::Target;
use crate::ConfigError;

/// Reads and parses the target list at `path`.
///
/// # Errors
///
/// Returns [`ConfigError::TargetList`] if the file cannot be read.
pub fn load_targets(path: &Path) -> Result<Vec<Target>, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::TargetList {
        path: path.display().to_string(),
        source,
    })?;
    Ok(parse_targets(&raw))
}

#[must_use]
pub fn parse_targets(raw: &str) -> Vec<Target> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|line| match line.rsplit_once(char::is_whitespace) {
            Some((name, address)) => Target::new(name.trim(), address),
            None => Target::new("", line),
        })
        .collect()
}
