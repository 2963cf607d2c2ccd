//! Domain-specific errors for manifest construction, validation, and rendering.

use formulary_schema::{ChecksumError, VariantKey};
use thiserror::Error;

/// Errors produced while populating a [`Manifest`](crate::Manifest).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ManifestError {
    /// A variant with the same (os, arch) key was already added.
    #[error("Duplicate variant: {0}")]
    DuplicateVariant(VariantKey),

    /// The manifest has been sealed and no longer accepts variants.
    #[error("Manifest is sealed and can no longer be modified")]
    Sealed,
}

/// Errors produced by [`validate`](crate::validate).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidateError {
    /// A variant required by the target platform matrix is absent.
    #[error("Missing required variant: {0}")]
    MissingVariant(VariantKey),

    /// A present variant's checksum fails the configured format policy.
    #[error("Invalid checksum for variant {key}: {source}")]
    InvalidChecksum {
        /// The variant whose checksum was rejected.
        key: VariantKey,
        /// The underlying format failure.
        #[source]
        source: ChecksumError,
    },

    /// The manifest's version template is empty.
    #[error("Version must not be empty")]
    EmptyVersion,
}

/// Errors produced by [`render`](crate::render).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// A `$$NAME$$` token in a template string has no entry in the
    /// substitution context.
    #[error("Unresolved placeholder: $${0}$$")]
    UnresolvedPlaceholder(String),
}

/// Errors produced while parsing `NAME=value` assignments into a
/// [`SubstitutionContext`](crate::SubstitutionContext).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContextError {
    /// An assignment is missing the `=` separator or has an empty name.
    #[error("Invalid variable syntax (expected NAME=value): {0:?}")]
    InvalidAssignment(String),
}

/// Errors produced while loading a manifest from its declarative TOML form.
#[derive(Error, Debug)]
pub enum SourceError {
    /// The document is not valid TOML conforming to the formula schema.
    #[error("Failed to parse formula document: {0}")]
    Toml(#[from] toml::de::Error),

    /// A variant table key is not a recognized operating system or
    /// architecture.
    #[error("Invalid variant key: {0}")]
    InvalidVariantKey(String),

    /// Variant insertion failed (duplicate key after normalization).
    #[error(transparent)]
    Manifest(#[from] ManifestError),
}
