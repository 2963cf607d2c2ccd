//! Placeholder substitution contexts and the `$$NAME$$` expansion engine.
//!
//! Substitution is textual and literal: a value containing another
//! placeholder token is inserted as-is, never re-expanded, so expansion is a
//! single pass over the template. Placeholder names are case-sensitive
//! identifiers (`[A-Za-z_][A-Za-z0-9_]*`).

use crate::error::{ContextError, RenderError};
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::OnceLock;

fn placeholder_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\$\$[A-Za-z_][A-Za-z0-9_]*\$\$").expect("placeholder pattern is a valid regex")
    })
}

/// Mapping from placeholder name to literal replacement value.
///
/// Supplied at render time, never stored in a manifest. Extra entries a
/// render does not consume are deliberately not an error, so one context can
/// be shared across many manifests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubstitutionContext {
    values: BTreeMap<String, String>,
}

impl SubstitutionContext {
    /// Create an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a placeholder value, replacing any previous value for the name.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    /// Builder-style [`set`](Self::set).
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    /// Look up a placeholder value.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Parse `NAME=value` assignment strings into a context.
    ///
    /// Later assignments for the same name win. Values may contain `=`.
    ///
    /// # Errors
    ///
    /// Returns [`ContextError::InvalidAssignment`] for an entry without `=`
    /// or with an empty name.
    pub fn from_assignments<I, S>(assignments: I) -> Result<Self, ContextError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut ctx = Self::new();
        for assignment in assignments {
            let assignment = assignment.as_ref();
            let (name, value) = assignment
                .split_once('=')
                .ok_or_else(|| ContextError::InvalidAssignment(assignment.to_string()))?;
            let name = name.trim();
            if name.is_empty() {
                return Err(ContextError::InvalidAssignment(assignment.to_string()));
            }
            ctx.set(name, value);
        }
        Ok(ctx)
    }

    /// Merge `other` into this context; entries from `other` win.
    pub fn merge(&mut self, other: &SubstitutionContext) {
        for (name, value) in &other.values {
            self.values.insert(name.clone(), value.clone());
        }
    }

    /// Iterate over placeholder names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.values.keys().map(String::as_str)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the context has no entries.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Expand every `$$NAME$$` token in `template` from `context`.
///
/// Single pass, no recursive expansion. Names of consumed placeholders are
/// recorded in `used` so the caller can report unused context entries.
///
/// # Errors
///
/// Returns [`RenderError::UnresolvedPlaceholder`] for the first token that
/// has no entry in `context`.
pub(crate) fn expand_into(
    template: &str,
    context: &SubstitutionContext,
    used: &mut BTreeSet<String>,
) -> Result<String, RenderError> {
    let mut out = String::with_capacity(template.len());
    let mut last = 0;
    for token in placeholder_re().find_iter(template) {
        // Strip the $$ delimiters from the matched token.
        let name = &template[token.start() + 2..token.end() - 2];
        let Some(value) = context.get(name) else {
            return Err(RenderError::UnresolvedPlaceholder(name.to_string()));
        };
        out.push_str(&template[last..token.start()]);
        out.push_str(value);
        used.insert(name.to_string());
        last = token.end();
    }
    out.push_str(&template[last..]);
    Ok(out)
}

/// Expand every `$$NAME$$` token in `template` from `context`.
///
/// # Errors
///
/// Returns [`RenderError::UnresolvedPlaceholder`] for the first token that
/// has no entry in `context`.
pub fn expand(template: &str, context: &SubstitutionContext) -> Result<String, RenderError> {
    let mut used = BTreeSet::new();
    expand_into(template, context, &mut used)
}
