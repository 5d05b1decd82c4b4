//! Content schema version (MAJOR.MINOR.PATCH)
//!
//! Stored plugin content carries the version it was written with. Only
//! MAJOR and MINOR changes require a migration; PATCH releases keep the
//! content shape.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ContentVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl ContentVersion {
    pub const CURRENT: ContentVersion = ContentVersion {
        major: 1,
        minor: 1,
        patch: 1,
    };

    pub fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self { major, minor, patch }
    }

    /// Lenient parse: missing or non-numeric parts read as 0, never fails
    ///
    /// Examples:
    ///   "1.1.1" → 1.1.1
    ///   "1.2"   → 1.2.0
    ///   "x.1"   → 0.1.0
    ///   ""      → 0.0.0
    pub fn parse_lenient(s: &str) -> Self {
        let mut parts = s.trim().split('.').map(|p| p.trim().parse::<u32>().unwrap_or(0));
        ContentVersion {
            major: parts.next().unwrap_or(0),
            minor: parts.next().unwrap_or(0),
            patch: parts.next().unwrap_or(0),
        }
    }

    /// True when content written with `self` must be migrated to `current`
    pub fn needs_migration_to(&self, current: &ContentVersion) -> bool {
        self.major != current.major || self.minor != current.minor
    }
}

impl Default for ContentVersion {
    fn default() -> Self {
        Self::CURRENT
    }
}

impl fmt::Display for ContentVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl FromStr for ContentVersion {
    type Err = String;

    /// Strict parse, for configuration and tests
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.trim().split('.').collect();
        if parts.len() != 3 {
            return Err(format!("Invalid version '{}': expected MAJOR.MINOR.PATCH", s));
        }
        let number = |p: &str| {
            p.parse::<u32>()
                .map_err(|_| format!("Invalid version '{}': '{}' is not a number", s, p))
        };
        Ok(ContentVersion {
            major: number(parts[0])?,
            minor: number(parts[1])?,
            patch: number(parts[2])?,
        })
    }
}
