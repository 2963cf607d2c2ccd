//! Pre-render validation of a manifest against a required variant matrix.

use crate::error::ValidateError;
use crate::manifest::{Manifest, SealedManifest};
use formulary_schema::{ChecksumPolicy, VariantKey};

/// Check that `manifest` is renderable for every key in `required`, then
/// seal it.
///
/// Required keys are checked in the caller-supplied order, so the first
/// missing key reported is deterministic. Checksums of all present variants
/// (required or not) are checked against `policy` in insertion order. Pure:
/// no I/O, no side effects beyond the returned handle.
///
/// # Errors
///
/// Returns [`ValidateError::MissingVariant`] for the first required key
/// without a variant, [`ValidateError::InvalidChecksum`] for the first
/// variant whose checksum fails the policy's format check, or
/// [`ValidateError::EmptyVersion`] if the version template is empty.
pub fn validate(
    manifest: Manifest,
    required: &[VariantKey],
    policy: ChecksumPolicy,
) -> Result<SealedManifest, ValidateError> {
    for key in required {
        if manifest.variant(*key).is_none() {
            return Err(ValidateError::MissingVariant(*key));
        }
    }

    for (key, spec) in manifest.variants() {
        policy
            .check(&spec.sha256)
            .map_err(|source| ValidateError::InvalidChecksum { key, source })?;
    }

    if manifest.version().is_empty() {
        return Err(ValidateError::EmptyVersion);
    }

    tracing::debug!(
        "Validated manifest '{}' against {} required variants",
        manifest.name(),
        required.len()
    );
    Ok(manifest.seal())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::VariantSpec;
    use formulary_schema::{Arch, Checksum, Os};

    const ALL: [VariantKey; 4] = [
        VariantKey::new(Os::MacOS, Arch::X86_64),
        VariantKey::new(Os::MacOS, Arch::Arm64),
        VariantKey::new(Os::Linux, Arch::X86_64),
        VariantKey::new(Os::Linux, Arch::Arm64),
    ];

    fn manifest_with(keys: &[VariantKey], checksum: &str) -> Manifest {
        let mut m = Manifest::new("tool", "A tool", "https://example.com", "1.0.0");
        for key in keys {
            m.add_variant(*key, VariantSpec::new("https://x.test/t.tar.gz", checksum))
                .unwrap();
        }
        m
    }

    #[test]
    fn complete_matrix_validates() {
        let m = manifest_with(&ALL, "dummy-digest");
        assert!(validate(m, &ALL, ChecksumPolicy::Lenient).is_ok());
    }

    #[test]
    fn first_missing_key_in_caller_order_is_reported() {
        let m = manifest_with(&ALL[..2], "dummy-digest");
        // Caller order puts linux/arm64 before linux/x86_64.
        let required = [ALL[0], ALL[3], ALL[2]];
        assert_eq!(
            validate(m, &required, ChecksumPolicy::Lenient),
            Err(ValidateError::MissingVariant(ALL[3]))
        );
    }

    #[test]
    fn strict_policy_rejects_sentinel_checksum() {
        let m = manifest_with(&ALL[..1], "dummy-digest");
        let result = validate(m, &ALL[..1], ChecksumPolicy::Strict);
        assert!(matches!(
            result,
            Err(ValidateError::InvalidChecksum { key, .. }) if key == ALL[0]
        ));
    }

    #[test]
    fn strict_policy_accepts_real_digest() {
        let digest = Checksum::compute(b"artifact bytes");
        let m = manifest_with(&ALL[..1], digest.as_str());
        assert!(validate(m, &ALL[..1], ChecksumPolicy::Strict).is_ok());
    }

    #[test]
    fn empty_checksum_fails_even_lenient() {
        let m = manifest_with(&ALL[..1], "");
        assert!(validate(m, &ALL[..1], ChecksumPolicy::Lenient).is_err());
    }

    #[test]
    fn empty_version_is_rejected() {
        let mut m = Manifest::new("tool", "A tool", "https://example.com", "");
        m.add_variant(ALL[0], VariantSpec::new("https://x.test/t.tar.gz", "dummy-digest"))
            .unwrap();
        assert_eq!(
            validate(m, &ALL[..1], ChecksumPolicy::Lenient),
            Err(ValidateError::EmptyVersion)
        );
    }

    #[test]
    fn extra_variants_beyond_required_are_fine() {
        let m = manifest_with(&ALL, "dummy-digest");
        assert!(validate(m, &ALL[..1], ChecksumPolicy::Lenient).is_ok());
    }
}
