//! Composite (operating system, architecture) keys.

use crate::{Arch, Os};
use serde::{Deserialize, Serialize};

/// A specific (operating system, architecture) combination for which a
/// distinct downloadable artifact exists.
///
/// The key is the flat lookup tuple for a manifest's variant table; the
/// source material's nested OS → architecture conditionals collapse into it.
/// Displayed and parsed as `os/arch` (e.g. `macos/arm64`).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
pub struct VariantKey {
    /// Target operating system.
    pub os: Os,
    /// Target CPU architecture.
    pub arch: Arch,
}

impl VariantKey {
    /// Create a new variant key.
    pub const fn new(os: Os, arch: Arch) -> Self {
        Self { os, arch }
    }

    /// The variant key of the build host.
    pub fn current() -> Self {
        Self::new(Os::current(), Arch::current())
    }
}

impl std::fmt::Display for VariantKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.os, self.arch)
    }
}

impl std::str::FromStr for VariantKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (os, arch) = s
            .split_once('/')
            .ok_or_else(|| format!("Invalid variant key (expected os/arch): {s}"))?;
        Ok(Self::new(os.parse()?, arch.parse()?))
    }
}
