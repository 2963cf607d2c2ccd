//! Deterministic rendering of a sealed manifest into host-manager text.
//!
//! The output grammar is a pass-through contract: a class declaration,
//! per-OS blocks containing CPU-guarded `url`/`sha256` branches, an install
//! block, and a smoke-test block. The renderer only substitutes `$$NAME$$`
//! tokens into string fields; all surrounding syntax is emitted verbatim.
//!
//! Variant branches appear in insertion order. Consecutive variants that
//! share an operating system are grouped under one `on_<os>` block; an
//! interleaved insertion order produces several blocks for the same OS
//! rather than reordering anything.

use crate::error::RenderError;
use crate::manifest::{InstallStep, SealedManifest, VariantSpec};
use crate::subst::{SubstitutionContext, expand_into};
use formulary_schema::{Arch, Os, VariantKey};
use std::collections::BTreeSet;

/// The outcome of a render, including the non-fatal unused-entry report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderReport {
    /// The complete rendered manifest text.
    pub text: String,
    /// Context entries no template string consumed, in sorted order.
    /// Deliberately not an error: one context may serve many manifests.
    pub unused: Vec<String>,
}

/// Render `manifest` with `context`, returning the manifest text.
///
/// Repeated calls with identical inputs produce byte-identical output. No
/// partial text is ever returned: on error, nothing is.
///
/// # Errors
///
/// Returns [`RenderError::UnresolvedPlaceholder`] if any template string
/// contains a `$$NAME$$` token absent from `context`.
pub fn render(
    manifest: &SealedManifest,
    context: &SubstitutionContext,
) -> Result<String, RenderError> {
    render_with_report(manifest, context).map(|report| report.text)
}

/// Render `manifest` with `context`, also reporting unused context entries.
///
/// # Errors
///
/// Returns [`RenderError::UnresolvedPlaceholder`] if any template string
/// contains a `$$NAME$$` token absent from `context`.
pub fn render_with_report(
    manifest: &SealedManifest,
    context: &SubstitutionContext,
) -> Result<RenderReport, RenderError> {
    let mut used = BTreeSet::new();
    let mut out = String::new();

    out.push_str(&format!("class {} < Formula\n", manifest.name().class_name()));
    out.push_str(&format!(
        "  desc \"{}\"\n",
        expand_into(manifest.description(), context, &mut used)?
    ));
    out.push_str(&format!(
        "  homepage \"{}\"\n",
        expand_into(manifest.homepage(), context, &mut used)?
    ));
    out.push_str(&format!(
        "  version \"{}\"\n",
        expand_into(manifest.version(), context, &mut used)?
    ));

    for run in os_runs(manifest) {
        out.push('\n');
        out.push_str(&format!("  on_{} do\n", run.os.as_str()));
        for (key, spec) in &run.variants {
            out.push_str(&format!("    if {}\n", cpu_guard(key.arch, spec.require_64_bit)));
            out.push_str(&format!(
                "      url \"{}\"\n",
                expand_into(&spec.url, context, &mut used)?
            ));
            out.push_str(&format!(
                "      sha256 \"{}\"\n",
                expand_into(spec.sha256.as_str(), context, &mut used)?
            ));
            out.push_str("    end\n");
        }
        out.push_str("  end\n");
    }

    render_install(manifest, context, &mut used, &mut out)?;

    if let Some(command) = manifest.test_command() {
        out.push('\n');
        out.push_str("  test do\n");
        out.push_str(&format!(
            "    system \"{}\"\n",
            expand_into(command, context, &mut used)?
        ));
        out.push_str("  end\n");
    }

    out.push_str("end\n");

    let unused: Vec<String> = context
        .names()
        .filter(|name| !used.contains(*name))
        .map(str::to_string)
        .collect();
    if !unused.is_empty() {
        tracing::warn!(
            "Render of '{}' did not use context entries: {}",
            manifest.name(),
            unused.join(", ")
        );
    }
    tracing::debug!(
        "Rendered '{}': {} variants, {} placeholders substituted",
        manifest.name(),
        manifest.variant_count(),
        used.len()
    );

    Ok(RenderReport { text: out, unused })
}

/// A maximal run of consecutive variants sharing one operating system.
struct OsRun<'a> {
    os: Os,
    variants: Vec<(VariantKey, &'a VariantSpec)>,
}

fn os_runs(manifest: &SealedManifest) -> Vec<OsRun<'_>> {
    let mut runs: Vec<OsRun<'_>> = Vec::new();
    for (key, spec) in manifest.variants() {
        match runs.last_mut() {
            Some(run) if run.os == key.os => run.variants.push((key, spec)),
            _ => runs.push(OsRun {
                os: key.os,
                variants: vec![(key, spec)],
            }),
        }
    }
    runs
}

fn cpu_guard(arch: Arch, require_64_bit: bool) -> String {
    let cpu = match arch {
        Arch::Arm64 => "Hardware::CPU.arm?",
        Arch::X86_64 => "Hardware::CPU.intel?",
    };
    if require_64_bit {
        format!("{cpu} && Hardware::CPU.is_64_bit?")
    } else {
        cpu.to_string()
    }
}

fn os_guard(os: Os) -> &'static str {
    match os {
        Os::MacOS => "OS.mac?",
        Os::Linux => "OS.linux?",
    }
}

fn step_line(step: &InstallStep) -> String {
    match step {
        InstallStep::Bin(name) => format!("bin.install \"{name}\""),
        InstallStep::Raw(line) => line.clone(),
    }
}

/// Emit the `def install` block.
///
/// Install steps are per-variant data. When every variant declares the same
/// step list (the common case), the steps are emitted once, unguarded; when
/// lists differ, each variant's steps are emitted under an OS/CPU guard.
/// Variants with no steps contribute nothing.
fn render_install(
    manifest: &SealedManifest,
    context: &SubstitutionContext,
    used: &mut BTreeSet<String>,
    out: &mut String,
) -> Result<(), RenderError> {
    let with_steps: Vec<(VariantKey, &VariantSpec)> = manifest
        .variants()
        .filter(|(_, spec)| !spec.install.is_empty())
        .collect();
    if with_steps.is_empty() {
        return Ok(());
    }

    out.push('\n');
    out.push_str("  def install\n");

    let uniform = with_steps.len() == manifest.variant_count()
        && with_steps
            .iter()
            .all(|(_, spec)| spec.install == with_steps[0].1.install);
    if uniform {
        for step in &with_steps[0].1.install {
            out.push_str(&format!(
                "    {}\n",
                expand_into(&step_line(step), context, used)?
            ));
        }
    } else {
        for (key, spec) in &with_steps {
            out.push_str(&format!(
                "    if {} && {}\n",
                os_guard(key.os),
                cpu_guard(key.arch, spec.require_64_bit)
            ));
            for step in &spec.install {
                out.push_str(&format!(
                    "      {}\n",
                    expand_into(&step_line(step), context, used)?
                ));
            }
            out.push_str("    end\n");
        }
    }

    out.push_str("  end\n");
    Ok(())
}
