//! URL handling module for Sumi-Scrape
//!
//! This module provides URL normalization, host extraction, the scope
//! classifier that gates the frontier, and the output path deriver.

mod host;
mod normalize;
mod path;
mod scope;

use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

// Re-export main functions
pub use host::host_key;
pub use normalize::{normalize_url, strip_fragment};
pub use path::{derive_disambiguated_path, derive_file_name, derive_path, host_dir};
pub use scope::{in_scope, is_asset_path};

/// Scope policy deciding which discovered links are eligible for fetching
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScopeMode {
    /// Only the seed page itself
    Single,
    /// The seed directory and its direct children
    Directory,
    /// The seed directory and everything below it
    RecursiveDirectory,
    /// Every page on the seed host
    Domain,
    /// Pick one of the above from the seed path
    #[default]
    Auto,
}

impl ScopeMode {
    /// Returns true if pages crawled under this mode contribute new links
    pub fn follows_links(&self) -> bool {
        !matches!(self, Self::Single)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Directory => "directory",
            Self::RecursiveDirectory => "recursive-directory",
            Self::Domain => "domain",
            Self::Auto => "auto",
        }
    }
}

impl fmt::Display for ScopeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScopeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "single" => Ok(Self::Single),
            "directory" => Ok(Self::Directory),
            "recursive-directory" | "recursive" => Ok(Self::RecursiveDirectory),
            "domain" => Ok(Self::Domain),
            "auto" => Ok(Self::Auto),
            other => Err(format!(
                "unknown scope mode '{}' (expected auto, single, directory, recursive-directory or domain)",
                other
            )),
        }
    }
}
