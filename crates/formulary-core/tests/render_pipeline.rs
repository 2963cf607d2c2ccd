//! End-to-end tests: declarative document -> validate -> render.

use formulary_core::source::parse_manifest;
use formulary_core::{InstallStep, Manifest, SubstitutionContext, VariantSpec, render, validate};
use formulary_schema::{Arch, ChecksumPolicy, Os, VariantKey};

const MATRIX: [VariantKey; 4] = [
    VariantKey::new(Os::MacOS, Arch::Arm64),
    VariantKey::new(Os::MacOS, Arch::X86_64),
    VariantKey::new(Os::Linux, Arch::Arm64),
    VariantKey::new(Os::Linux, Arch::X86_64),
];

const DOC: &str = r##"
name = "ocm"
description = "Open Component Model CLI"
homepage = "https://example.com/ocm"
version = "$$VERSION$$"
test = "#{bin}/ocm --version"

[variant.macos.arm64]
url = "$$TEST_SERVER$$/ocm-$$VERSION$$-darwin-arm64.tar.gz"
sha256 = "dummy-digest"
install = [{ bin = "ocm" }]

[variant.macos.amd64]
url = "$$TEST_SERVER$$/ocm-$$VERSION$$-darwin-amd64.tar.gz"
sha256 = "dummy-digest"
install = [{ bin = "ocm" }]

[variant.linux.arm64]
url = "$$TEST_SERVER$$/ocm-$$VERSION$$-linux-arm64.tar.gz"
sha256 = "dummy-digest"
install = [{ bin = "ocm" }]

[variant.linux.amd64]
url = "$$TEST_SERVER$$/ocm-$$VERSION$$-linux-amd64.tar.gz"
sha256 = "dummy-digest"
require_64_bit = true
install = [{ bin = "ocm" }]
"##;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

fn release_context() -> SubstitutionContext {
    SubstitutionContext::from_assignments(["TEST_SERVER=https://releases.test", "VERSION=1.0.0"])
        .expect("assignments are well-formed")
}

#[test]
fn document_validates_and_renders() -> anyhow::Result<()> {
    init_tracing();
    let manifest = parse_manifest(DOC)?;
    let sealed = validate(manifest, &MATRIX, ChecksumPolicy::Lenient)?;

    let text = render(&sealed, &release_context())?;

    assert!(text.starts_with("class Ocm < Formula\n"));
    assert!(text.ends_with("end\n"));
    assert_eq!(text.matches("url \"").count(), 4);
    assert_eq!(text.matches("sha256 \"dummy-digest\"").count(), 4);
    assert!(text.contains("url \"https://releases.test/ocm-1.0.0-linux-amd64.tar.gz\""));
    assert!(!text.contains("$$"));
    // The version substitutes consistently in the header and every URL.
    assert_eq!(text.matches("1.0.0").count(), 5);
    Ok(())
}

#[test]
fn missing_matrix_entry_blocks_rendering() {
    let full = parse_manifest(DOC).expect("fixture document parses");
    // Rebuild without the linux/arm64 variant.
    let dropped = VariantKey::new(Os::Linux, Arch::Arm64);
    let mut partial = Manifest::new("ocm", "Open Component Model CLI", "h", "$$VERSION$$");
    for (key, spec) in full.variants().filter(|(key, _)| *key != dropped) {
        partial.add_variant(key, spec.clone()).unwrap();
    }

    let err = validate(partial, &MATRIX, ChecksumPolicy::Lenient).unwrap_err();
    assert_eq!(
        err,
        formulary_core::ValidateError::MissingVariant(dropped)
    );
}

#[test]
fn renders_against_two_test_servers_from_one_manifest() {
    let sealed = validate(
        parse_manifest(DOC).unwrap(),
        &MATRIX,
        ChecksumPolicy::Lenient,
    )
    .unwrap();

    let a = SubstitutionContext::from_assignments(["TEST_SERVER=https://a.test", "VERSION=1.0.0"])
        .unwrap();
    let b = SubstitutionContext::from_assignments(["TEST_SERVER=https://b.test", "VERSION=1.0.0"])
        .unwrap();

    let text_a = render(&sealed, &a).unwrap();
    let text_b = render(&sealed, &b).unwrap();
    assert!(text_a.contains("https://a.test/"));
    assert!(text_b.contains("https://b.test/"));
    assert_eq!(
        text_a.replace("https://a.test", "https://b.test"),
        text_b
    );
}

#[test]
fn sealed_manifest_renders_concurrently() {
    let sealed = validate(
        parse_manifest(DOC).unwrap(),
        &MATRIX,
        ChecksumPolicy::Lenient,
    )
    .unwrap();
    let reference = render(&sealed, &release_context()).unwrap();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let sealed = sealed.clone();
            std::thread::spawn(move || render(&sealed, &release_context()).unwrap())
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), reference);
    }
}

#[test]
fn rendered_text_survives_a_file_round_trip() -> anyhow::Result<()> {
    // The engine hands text to the caller; writing it is the caller's job.
    // Exercise that seam the way the release tool does: write, re-read,
    // compare bytes.
    let sealed = validate(parse_manifest(DOC)?, &MATRIX, ChecksumPolicy::Lenient)?;
    let text = render(&sealed, &release_context())?;

    let dir = tempfile::tempdir()?;
    let path = dir.path().join("ocm.rb");
    std::fs::write(&path, &text)?;
    let read_back = std::fs::read_to_string(&path)?;
    assert_eq!(read_back, text);
    Ok(())
}

#[test]
fn programmatic_and_declarative_manifests_render_identically() {
    let mut programmatic = Manifest::new(
        "ocm",
        "Open Component Model CLI",
        "https://example.com/ocm",
        "$$VERSION$$",
    )
    .with_test_command("#{bin}/ocm --version");
    for key in MATRIX {
        let suffix = format!(
            "{}-{}",
            match key.os {
                Os::MacOS => "darwin",
                Os::Linux => "linux",
            },
            match key.arch {
                Arch::Arm64 => "arm64",
                Arch::X86_64 => "amd64",
            }
        );
        let mut spec = VariantSpec::new(
            format!("$$TEST_SERVER$$/ocm-$$VERSION$$-{suffix}.tar.gz"),
            "dummy-digest",
        )
        .with_install(InstallStep::Bin("ocm".to_string()));
        if key == VariantKey::new(Os::Linux, Arch::X86_64) {
            spec = spec.with_64_bit_guard();
        }
        programmatic.add_variant(key, spec).unwrap();
    }

    let declarative = parse_manifest(DOC).unwrap();
    let ctx = release_context();
    let from_code = render(
        &validate(programmatic, &MATRIX, ChecksumPolicy::Lenient).unwrap(),
        &ctx,
    )
    .unwrap();
    let from_doc = render(
        &validate(declarative, &MATRIX, ChecksumPolicy::Lenient).unwrap(),
        &ctx,
    )
    .unwrap();
    assert_eq!(from_code, from_doc);
}
