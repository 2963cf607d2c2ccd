//! Declarative TOML representation of a manifest.
//!
//! A formula document is the on-disk shape callers feed the engine:
//!
//! ```toml
//! name = "ocm"
//! description = "Open Component Model CLI"
//! homepage = "https://example.com/ocm"
//! version = "$$VERSION$$"
//! test = "#{bin}/ocm --version"
//!
//! [variant.macos.arm64]
//! url = "$$TEST_SERVER$$/ocm-$$VERSION$$-darwin-arm64.tar.gz"
//! sha256 = "dummy-digest"
//! install = [{ bin = "ocm" }]
//! ```
//!
//! Reading the file is the caller's job; this module only parses strings.
//! Variant table keys accept the usual vendor aliases (`darwin`, `aarch64`,
//! `amd64`, ...). Because TOML tables are unordered, variants are added to
//! the manifest in `(os, arch)` declaration order, keeping loaded manifests
//! byte-deterministic to render.

use crate::error::SourceError;
use crate::manifest::{Manifest, VariantSpec};
use formulary_schema::VariantKey;
use serde::Deserialize;
use std::collections::BTreeMap;

/// A parsed formula document, not yet bridged to the template model.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FormulaDoc {
    name: String,
    description: String,
    homepage: String,
    version: String,
    test: Option<String>,
    #[serde(default)]
    variant: BTreeMap<String, BTreeMap<String, VariantSpec>>,
}

impl FormulaDoc {
    /// Parse a formula document from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Toml`] if the text is not valid TOML or does
    /// not conform to the document schema.
    pub fn parse(text: &str) -> Result<Self, SourceError> {
        Ok(toml::from_str(text)?)
    }

    /// Convert this document into a [`Manifest`] in its building state.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::InvalidVariantKey`] for an unrecognized OS or
    /// architecture table key, or [`SourceError::Manifest`] when two table
    /// keys normalize to the same variant (e.g. `darwin` and `macos`).
    pub fn into_manifest(self) -> Result<Manifest, SourceError> {
        let mut entries: Vec<(VariantKey, VariantSpec)> = Vec::new();
        for (os, arches) in self.variant {
            let os = os.parse().map_err(SourceError::InvalidVariantKey)?;
            for (arch, spec) in arches {
                let arch = arch.parse().map_err(SourceError::InvalidVariantKey)?;
                entries.push((VariantKey::new(os, arch), spec));
            }
        }
        entries.sort_by_key(|(key, _)| *key);

        let mut manifest = Manifest::new(
            self.name.as_str(),
            self.description,
            self.homepage,
            self.version.as_str(),
        );
        if let Some(test) = self.test {
            manifest = manifest.with_test_command(test);
        }
        for (key, spec) in entries {
            manifest.add_variant(key, spec)?;
        }
        Ok(manifest)
    }
}

/// Parse TOML text straight into a [`Manifest`].
///
/// # Errors
///
/// Propagates the errors of [`FormulaDoc::parse`] and
/// [`FormulaDoc::into_manifest`].
pub fn parse_manifest(text: &str) -> Result<Manifest, SourceError> {
    FormulaDoc::parse(text)?.into_manifest()
}
