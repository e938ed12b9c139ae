//! On-disk layout of the generated package.
//!
//! ```text
//! <root>/
//!   package.json
//!   ns.d.ts  full.d.ts  free-standing.d.ts
//!   lib/lib.<name>.d.ts          core declarations
//!   ext/lib.<name>.d.ts          extension declarations (bundled rendering)
//!   ext_tslib/lib.<name>.d.ts    extension declarations (built-in-compatible rendering)
//! ```

use std::path::{Component, Path, PathBuf};

use crate::types::{DeclKind, DeclarationDescriptor};

/// Directory holding the built-in-compatible rendering.
pub const BUILTIN_COMPAT_DIR: &str = "ext_tslib";

#[derive(Debug, Clone)]
pub struct PackageLayout {
    root: PathBuf,
}

impl PackageLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Bundled rendering of a descriptor.
    pub fn bundled_dest(&self, desc: &DeclarationDescriptor) -> PathBuf {
        self.root.join(desc.kind.dir_name()).join(desc.file_name())
    }

    /// Built-in-compatible rendering; only meaningful for extensions.
    pub fn builtin_compat_dest(&self, desc: &DeclarationDescriptor) -> PathBuf {
        self.root.join(BUILTIN_COMPAT_DIR).join(desc.file_name())
    }

    /// Reference path used inside the package's entry files.
    pub fn entry_reference(dir: &str, desc: &DeclarationDescriptor) -> String {
        format!("./{}/{}", dir, desc.file_name())
    }

    pub fn bundled_entry_reference(desc: &DeclarationDescriptor) -> String {
        Self::entry_reference(desc.kind.dir_name(), desc)
    }

    pub fn builtin_compat_entry_reference(desc: &DeclarationDescriptor) -> String {
        debug_assert_eq!(desc.kind, DeclKind::Extension);
        Self::entry_reference(BUILTIN_COMPAT_DIR, desc)
    }
}

/// Relative path from directory `from_dir` to `to`, `/`-separated and without
/// a leading `./`.
pub fn relative_path(from_dir: &Path, to: &Path) -> String {
    let from: Vec<Component<'_>> = from_dir
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect();
    let to: Vec<Component<'_>> = to
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect();

    let common = from
        .iter()
        .zip(to.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<String> = Vec::new();
    parts.extend(std::iter::repeat("..".to_string()).take(from.len() - common));
    parts.extend(
        to[common..]
            .iter()
            .map(|c| c.as_os_str().to_string_lossy().into_owned()),
    );

    parts.join("/")
}
