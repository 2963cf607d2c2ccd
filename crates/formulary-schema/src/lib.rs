//! Shared leaf types for Formulary.
//!
//! Everything here is plain data: operating systems, CPU architectures,
//! variant keys, checksum strings, and the name/version newtypes shared by
//! the manifest model and its declarative sources. No I/O, no DSL knowledge.

pub mod arch;
pub mod checksum;
pub mod os;
pub mod types;
pub mod variant;

// Re-exports
pub use arch::Arch;
pub use checksum::{Checksum, ChecksumError, ChecksumPolicy};
pub use os::Os;
pub use types::{FormulaName, Version};
pub use variant::VariantKey;
