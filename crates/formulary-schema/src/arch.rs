//! CPU architecture identifiers for formula variants.

use serde::{Deserialize, Serialize};

/// CPU architecture a formula variant targets.
///
/// `arm64`/`aarch64` are treated as equivalent, as are `x86_64`/`amd64`.
/// `intel` and `arm` are accepted as the host package manager's own
/// hardware-query vocabulary.
///
/// # Example
///
/// ```
/// use formulary_schema::Arch;
///
/// let current = Arch::current();
/// println!("Running on: {}", current);
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum Arch {
    /// ARM 64-bit (Apple Silicon, aarch64).
    #[default]
    #[serde(alias = "aarch64", alias = "arm")]
    Arm64,
    /// Intel/AMD 64-bit (`x86_64`, amd64).
    #[serde(alias = "amd64", alias = "intel")]
    X86_64,
}

impl Arch {
    /// Get the architecture of the build host.
    pub fn current() -> Self {
        #[cfg(target_arch = "aarch64")]
        {
            Self::Arm64
        }
        #[cfg(not(target_arch = "aarch64"))]
        {
            Self::X86_64
        }
    }

    /// Convert to the normalized string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Arm64 => "arm64",
            Self::X86_64 => "x86_64",
        }
    }
}

impl std::fmt::Display for Arch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Arch {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "arm64" | "aarch64" | "arm" => Ok(Self::Arm64),
            "x86_64" | "amd64" | "x64" | "intel" => Ok(Self::X86_64),
            _ => Err(format!("Unknown architecture: {s}")),
        }
    }
}
