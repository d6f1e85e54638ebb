use crate::url::{normalize_url, Origin};
use crate::ConfigError;
use std::path::Path;
use url::Url;

/// Seed thread URLs read from the line-delimited seed list
#[derive(Debug, Clone, Default)]
pub struct SeedList {
    /// Normalized seed URLs in file order
    pub urls: Vec<Url>,

    /// Lines that could not be used, with their 1-based line number and reason
    pub rejected: Vec<(usize, String)>,
}

impl SeedList {
    /// The origin every discovered thread must share
    ///
    /// Taken from the first usable seed. `None` when there are no seeds, which
    /// leaves recursive discovery unrestricted.
    pub fn allowed_origin(&self) -> Option<Origin> {
        self.urls.first().and_then(Origin::of)
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }
}

/// Parses seed list text: one absolute URL per line
///
/// Lines are trimmed; blank lines and lines starting with `#` are ignored.
/// Lines that do not parse as HTTP(S) URLs are collected in `rejected`.
pub fn parse_seeds(content: &str) -> SeedList {
    let mut seeds = SeedList::default();

    for (index, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        match normalize_url(line) {
            Ok(url) => seeds.urls.push(url),
            Err(e) => seeds.rejected.push((index + 1, format!("{}: {}", line, e))),
        }
    }

    seeds
}

/// Loads the seed list from a file
///
/// A missing file is reported as [`ConfigError::MissingSeeds`] so the caller
/// can tell the user to create it.
pub fn load_seeds(path: &Path) -> Result<SeedList, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::MissingSeeds(path.display().to_string()));
    }

    let content = std::fs::read_to_string(path)?;
    Ok(parse_seeds(&content))
}
