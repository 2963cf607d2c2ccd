//! The manifest template model and its building → sealed lifecycle.
//!
//! A [`Manifest`] is append-only while being populated and frozen into a
//! [`SealedManifest`] once validated. All string fields are templates: they
//! may contain `$$NAME$$` placeholder tokens resolved at render time, never
//! at construction time.

use crate::error::ManifestError;
use formulary_schema::{Checksum, FormulaName, VariantKey, Version};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// One declarative install action for a variant.
///
/// Steps are opaque template strings, not executable code; the engine only
/// substitutes placeholders and emits them into the rendered install block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstallStep {
    /// Install the named file into the host package manager's bin directory.
    Bin(String),
    /// A verbatim line of the host DSL, emitted unchanged (after placeholder
    /// substitution).
    Raw(String),
}

/// Per-variant data: where the artifact lives, its checksum, and how it is
/// installed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantSpec {
    /// Download URL template for the artifact.
    pub url: String,
    /// Content checksum template (hex digest, sentinel, or placeholder).
    pub sha256: Checksum,
    /// Emit a 64-bit hardware guard alongside the CPU check. The source
    /// material's runtime bitness predicate is carried as variant data, not
    /// as part of the lookup key.
    #[serde(default)]
    pub require_64_bit: bool,
    /// Install steps for this variant.
    #[serde(default)]
    pub install: Vec<InstallStep>,
}

impl VariantSpec {
    /// Create a spec with the given URL and checksum templates and no
    /// install steps.
    pub fn new(url: impl Into<String>, sha256: impl Into<Checksum>) -> Self {
        Self {
            url: url.into(),
            sha256: sha256.into(),
            require_64_bit: false,
            install: Vec::new(),
        }
    }

    /// Append an install step.
    pub fn with_install(mut self, step: InstallStep) -> Self {
        self.install.push(step);
        self
    }

    /// Emit a `Hardware::CPU.is_64_bit?` conjunct in this variant's guard.
    pub fn with_64_bit_guard(mut self) -> Self {
        self.require_64_bit = true;
        self
    }
}

/// A manifest template in its `Building` state.
///
/// Variants are kept in insertion order; that order is the render order, so
/// output is byte-deterministic for snapshot testing. Duplicate keys are
/// rejected at insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    name: FormulaName,
    description: String,
    homepage: String,
    version: Version,
    variants: Vec<(VariantKey, VariantSpec)>,
    test_command: Option<String>,
}

impl Manifest {
    /// Create an empty manifest with the given header fields.
    pub fn new(
        name: impl Into<FormulaName>,
        description: impl Into<String>,
        homepage: impl Into<String>,
        version: impl Into<Version>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            homepage: homepage.into(),
            version: version.into(),
            variants: Vec::new(),
            test_command: None,
        }
    }

    /// Set the post-install smoke-test command template.
    pub fn with_test_command(mut self, command: impl Into<String>) -> Self {
        self.test_command = Some(command.into());
        self
    }

    /// Add a variant.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::DuplicateVariant`] if a variant with the same
    /// key is already present.
    pub fn add_variant(&mut self, key: VariantKey, spec: VariantSpec) -> Result<(), ManifestError> {
        if self.variants.iter().any(|(k, _)| *k == key) {
            return Err(ManifestError::DuplicateVariant(key));
        }
        self.variants.push((key, spec));
        Ok(())
    }

    /// Iterate over variants in insertion order. Restartable.
    pub fn variants(&self) -> impl Iterator<Item = (VariantKey, &VariantSpec)> + '_ {
        self.variants.iter().map(|(k, spec)| (*k, spec))
    }

    /// Look up the spec for a variant key.
    pub fn variant(&self, key: VariantKey) -> Option<&VariantSpec> {
        self.variants
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, spec)| spec)
    }

    /// Number of variants.
    pub fn variant_count(&self) -> usize {
        self.variants.len()
    }

    /// The formula name.
    pub fn name(&self) -> &FormulaName {
        &self.name
    }

    /// The description template.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// The homepage template.
    pub fn homepage(&self) -> &str {
        &self.homepage
    }

    /// The version template.
    pub fn version(&self) -> &Version {
        &self.version
    }

    /// The smoke-test command template, if any.
    pub fn test_command(&self) -> Option<&str> {
        self.test_command.as_deref()
    }

    /// Freeze this manifest without validating it.
    ///
    /// Prefer [`validate`](crate::validate), which checks the variant matrix
    /// and checksum formats before sealing. Direct sealing exists for callers
    /// that construct manifests from already-trusted data.
    pub fn seal(self) -> SealedManifest {
        tracing::debug!(
            "Sealed manifest '{}' with {} variants",
            self.name,
            self.variants.len()
        );
        SealedManifest {
            inner: Arc::new(self),
        }
    }
}

/// A manifest that has passed validation: immutable and safe to render from
/// multiple threads concurrently.
///
/// Cloning is cheap (shared `Arc`); all read accessors of [`Manifest`] are
/// available through `Deref`.
#[derive(Debug, Clone)]
pub struct SealedManifest {
    inner: Arc<Manifest>,
}

impl SealedManifest {
    /// Sealing an already-sealed manifest is a no-op returning an equivalent
    /// handle to the same underlying data.
    pub fn seal(&self) -> SealedManifest {
        self.clone()
    }

    /// Mutation is rejected after sealing.
    ///
    /// # Errors
    ///
    /// Always returns [`ManifestError::Sealed`].
    pub fn add_variant(
        &self,
        _key: VariantKey,
        _spec: VariantSpec,
    ) -> Result<(), ManifestError> {
        Err(ManifestError::Sealed)
    }
}

impl std::ops::Deref for SealedManifest {
    type Target = Manifest;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl PartialEq for SealedManifest {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner) || *self.inner == *other.inner
    }
}

impl Eq for SealedManifest {}
