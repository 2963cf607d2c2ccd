//! Operating system identifiers for formula variants.

use serde::{Deserialize, Serialize};

/// Operating system a formula variant targets.
///
/// Vendors name the same platform inconsistently (`macos`, `darwin`, `osx`),
/// so parsing accepts the common aliases and normalizes them to one variant.
///
/// # Example
///
/// ```
/// use formulary_schema::Os;
///
/// let os: Os = "darwin".parse().unwrap();
/// assert_eq!(os, Os::MacOS);
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum Os {
    /// Apple macOS (also accepted as `darwin` or `osx`).
    #[default]
    #[serde(alias = "darwin", alias = "osx")]
    MacOS,
    /// Linux-based operating systems.
    Linux,
}

impl Os {
    /// Get the operating system of the build host.
    pub fn current() -> Self {
        #[cfg(target_os = "macos")]
        {
            Self::MacOS
        }
        #[cfg(not(target_os = "macos"))]
        {
            Self::Linux
        }
    }

    /// Convert to the normalized string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MacOS => "macos",
            Self::Linux => "linux",
        }
    }
}

impl std::fmt::Display for Os {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Os {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "macos" | "darwin" | "osx" | "mac" => Ok(Self::MacOS),
            "linux" => Ok(Self::Linux),
            _ => Err(format!("Unknown operating system: {s}")),
        }
    }
}
