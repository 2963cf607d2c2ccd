//! Manifest rendering and verification for platform-variant package manifests.
//!
//! A [`Manifest`] is built up from per-platform variants (append-only), then
//! validated against a required variant matrix and sealed. A
//! [`SealedManifest`] is immutable and can be rendered any number of times
//! with different [`SubstitutionContext`]s, producing byte-deterministic
//! manifest text for the host package manager.
//!
//! ```
//! use formulary_core::{render, validate, Manifest, SubstitutionContext, VariantSpec};
//! use formulary_schema::{Arch, ChecksumPolicy, Os, VariantKey};
//!
//! let mut manifest = Manifest::new("ocm", "OCM CLI", "https://ocm.software", "$$VERSION$$");
//! let key = VariantKey::new(Os::MacOS, Arch::Arm64);
//! manifest
//!     .add_variant(
//!         key,
//!         VariantSpec::new("$$TEST_SERVER$$/ocm-$$VERSION$$-darwin-arm64.tar.gz", "dummy-digest"),
//!     )
//!     .unwrap();
//!
//! let sealed = validate(manifest, &[key], ChecksumPolicy::Lenient).unwrap();
//! let mut ctx = SubstitutionContext::new();
//! ctx.set("TEST_SERVER", "https://releases.test");
//! ctx.set("VERSION", "1.0.0");
//!
//! let text = render(&sealed, &ctx).unwrap();
//! assert!(text.contains("url \"https://releases.test/ocm-1.0.0-darwin-arm64.tar.gz\""));
//! ```

pub mod error;
pub mod manifest;
pub mod render;
pub mod source;
pub mod subst;
pub mod validate;

// Re-exports
pub use error::{ContextError, ManifestError, RenderError, SourceError, ValidateError};
pub use manifest::{InstallStep, Manifest, SealedManifest, VariantSpec};
pub use render::{RenderReport, render, render_with_report};
pub use source::{FormulaDoc, parse_manifest};
pub use subst::SubstitutionContext;
pub use validate::validate;
