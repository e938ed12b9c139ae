//! Rewriting of triple-slash reference directives.
//!
//! Upstream declarations point at each other with
//! `/// <reference lib="NAME" />`, which only resolves inside the runtime's
//! own compiler. In the package these become
//! `/// <reference path="RELATIVE" />`.
//!
//! Two renderings exist:
//!
//! - bundled: every known lib reference becomes a path reference
//! - built-in-compatible (extensions only): references to libs TypeScript
//!   ships are kept, the rest become paths, and
//!   `/// <reference no-default-lib="true" />` is dropped so the file
//!   augments the host's default libs instead of replacing them
//!
//! Both passes are idempotent: the path form is never matched again.

use std::collections::HashMap;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use tracing::warn;

use crate::layout::{relative_path, PackageLayout};
use crate::tslib::TypeScriptLibs;
use crate::types::DeclarationDescriptor;

static LIB_REFERENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"/// <reference lib="([^"]+)" />"#)
        .expect("valid lib reference regex")
});

static NO_DEFAULT_LIB: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"/// <reference no-default-lib="true" />"#)
        .expect("valid no-default-lib regex")
});

/// Result of rewriting one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteOutcome {
    pub content: String,
    pub changed: bool,
    /// Referenced names with no descriptor, left untouched.
    pub unknown: Vec<String>,
}

/// Lookup from logical name to bundled destination.
#[derive(Debug, Clone)]
pub struct ReferenceTargets<'a> {
    layout: &'a PackageLayout,
    by_name: HashMap<&'a str, &'a DeclarationDescriptor>,
}

impl<'a> ReferenceTargets<'a> {
    pub fn new(layout: &'a PackageLayout, descriptors: &'a [DeclarationDescriptor]) -> Self {
        let by_name = descriptors.iter().map(|d| (d.name.as_str(), d)).collect();
        Self { layout, by_name }
    }

    /// Path reference from `from`'s bundled location to `name`, if known.
    fn relative_from(&self, from: &DeclarationDescriptor, name: &str) -> Option<String> {
        let target = self.by_name.get(name)?;
        let from_dest = self.layout.bundled_dest(from);
        let from_dir = from_dest.parent().unwrap_or_else(|| Path::new(""));
        Some(relative_path(from_dir, &self.layout.bundled_dest(target)))
    }
}

fn path_directive(path: &str) -> String {
    format!(r#"/// <reference path="{}" />"#, path)
}

/// Bundled rendering: every known lib reference becomes a relative path.
pub fn rewrite_bundled(
    content: &str,
    file: &DeclarationDescriptor,
    targets: &ReferenceTargets<'_>,
) -> RewriteOutcome {
    rewrite_references(content, file, targets, |_| false)
}

/// Built-in-compatible rendering of an extension file.
///
/// Paths are computed from the bundled location; `ext_tslib/` sits next to
/// `ext/`, so extension targets land on their built-in-compatible siblings
/// and core targets on `../lib/`.
pub fn rewrite_builtin_compatible(
    content: &str,
    file: &DeclarationDescriptor,
    targets: &ReferenceTargets<'_>,
    ts_libs: &TypeScriptLibs,
) -> RewriteOutcome {
    let mut outcome = rewrite_references(content, file, targets, |name| ts_libs.contains(name));

    if NO_DEFAULT_LIB.is_match(&outcome.content) {
        outcome.content = NO_DEFAULT_LIB.replace_all(&outcome.content, "").into_owned();
        outcome.changed = true;
    }

    outcome
}

fn rewrite_references(
    content: &str,
    file: &DeclarationDescriptor,
    targets: &ReferenceTargets<'_>,
    keep: impl Fn(&str) -> bool,
) -> RewriteOutcome {
    let mut unknown = Vec::new();
    let mut changed = false;

    let rewritten = LIB_REFERENCE.replace_all(content, |caps: &Captures<'_>| {
        let name = &caps[1];
        if keep(name) {
            return caps[0].to_string();
        }

        match targets.relative_from(file, name) {
            Some(path) => {
                changed = true;
                path_directive(&path)
            }
            None => {
                warn!(lib = %name, file = %file.name, "unknown lib reference, left as is");
                unknown.push(name.to_string());
                caps[0].to_string()
            }
        }
    });

    RewriteOutcome {
        content: rewritten.into_owned(),
        changed,
        unknown,
    }
}
