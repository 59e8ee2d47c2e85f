//! Supported solc release lines

use crate::error::{Result, SolcError};
use std::fmt;
use std::str::FromStr;

/// A supported solc release line, identified by its `major.minor` key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SolcVersion {
    /// The 0.6 release line
    V0_6,
    /// The 0.7 release line
    V0_7,
    /// The 0.8 release line
    V0_8,
}

impl SolcVersion {
    /// Every supported release line, oldest first
    pub const ALL: [Self; 3] = [Self::V0_6, Self::V0_7, Self::V0_8];

    /// The version key as accepted by [`FromStr`]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::V0_6 => "0.6",
            Self::V0_7 => "0.7",
            Self::V0_8 => "0.8",
        }
    }

    /// Minor component of the release line (all lines are `0.x`)
    #[must_use]
    pub const fn minor(self) -> u64 {
        match self {
            Self::V0_6 => 6,
            Self::V0_7 => 7,
            Self::V0_8 => 8,
        }
    }

    /// Dense index used for per-version slots
    pub(crate) const fn index(self) -> usize {
        match self {
            Self::V0_6 => 0,
            Self::V0_7 => 1,
            Self::V0_8 => 2,
        }
    }

    /// Suffix used for per-version environment overrides, e.g. `0_8`
    pub(crate) const fn env_suffix(self) -> &'static str {
        match self {
            Self::V0_6 => "0_6",
            Self::V0_7 => "0_7",
            Self::V0_8 => "0_8",
        }
    }

    /// Returns true if a concrete release belongs to this line
    #[must_use]
    pub fn matches(self, version: &semver::Version) -> bool {
        version.major == 0 && version.minor == self.minor()
    }
}

impl fmt::Display for SolcVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SolcVersion {
    type Err = SolcError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| SolcError::unsupported_version(s))
    }
}

/// Extract the release from `solc --version` output.
///
/// Expected format:
///
/// ```text
/// solc, the solidity compiler commandline interface
/// Version: 0.8.19+commit.7dd6d404.Linux.g++
/// ```
///
/// Build metadata after `+` is dropped. Returns `None` when no `Version:`
/// line holds a valid semantic version.
#[must_use]
pub fn parse_version_output(output: &str) -> Option<semver::Version> {
    output.lines().find_map(|line| {
        let rest = line.trim().strip_prefix("Version:")?;
        let token = rest.split_whitespace().next()?;
        let release = token.split('+').next()?;
        semver::Version::parse(release).ok()
    })
}
