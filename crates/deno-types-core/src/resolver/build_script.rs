//! Regex-based reading of the upstream `cli/build.rs`.
//!
//! Two constructs are recognised:
//!
//! ```text
//! op_crate_libs.insert("deno.http", deno_http::get_declaration());
//! let libs = vec!["deno.ns", "es2022", ...];
//! ```
//!
//! The first registers an extension declaration under a logical name, the
//! second lists the declarations shipped next to the anchors. Anything that
//! does not fit these shapes is an error: a partial list would leave
//! references unresolved downstream.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use super::{join_repo_path, DeclarationSetParser, SecondarySource};
use crate::error::{GenError, GenResult};
use crate::types::{DeclKind, DeclarationDescriptor};

static CRATE_LIB_INSERT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?s)op_crate_libs\.insert\(\s*"(.+?)",\s*(.+?),?\s*\);"#)
        .expect("valid op_crate_libs regex")
});

static GET_DECLARATION_BODY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)pub fn get_declaration\(\) -> PathBuf \{\s*(.*?)\s*\}")
        .expect("valid get_declaration regex")
});

static MANIFEST_DIR_JOIN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?m)^\s*PathBuf::from\(env!\("CARGO_MANIFEST_DIR"\)\)\s*\.join\("(.+?)"\)\s*$"#)
        .expect("valid manifest dir regex")
});

static RELATIVE_LITERAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^"\..+?"$"#).expect("valid literal regex"));

static LIBS_VEC: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?sm)^\s*let libs = vec!\[(.+?)\];\s*$").expect("valid libs regex")
});

/// Provider registered under webgpu's name; its file lives with the anchors.
const WEBGPU_PROVIDER: &str = "deno_webgpu_get_declaration()";
const WEBGPU_FILE: &str = "lib.deno_webgpu.d.ts";

const EXT_PROVIDER_PREFIX: &str = "deno_";
const EXT_PROVIDER_SUFFIX: &str = "::get_declaration()";

/// Quoted provider paths are relative to the build script's directory.
const BUILD_SCRIPT_DIR: &str = "cli";

/// Names with this prefix are runtime API surface.
const EXTENSION_NAME_PREFIX: &str = "deno.";

/// Default [`DeclarationSetParser`].
#[derive(Debug, Clone, Copy, Default)]
pub struct BuildScriptParser;

impl BuildScriptParser {
    pub fn new() -> Self {
        Self
    }

    async fn resolve_provider(
        &self,
        provider: &str,
        dts_dir: &str,
        source: &dyn SecondarySource,
    ) -> GenResult<String> {
        if provider == WEBGPU_PROVIDER {
            return Ok(join_repo_path(dts_dir, WEBGPU_FILE));
        }

        if let Some(ext_name) = provider
            .strip_prefix(EXT_PROVIDER_PREFIX)
            .and_then(|rest| rest.strip_suffix(EXT_PROVIDER_SUFFIX))
        {
            let entry_path = format!("ext/{}/lib.rs", ext_name);
            let entry = source.fetch_source(&entry_path).await?;
            let file = declaration_file_from_entry(ext_name, &entry)?;
            return Ok(format!("ext/{}/{}", ext_name, file));
        }

        if RELATIVE_LITERAL.is_match(provider) {
            let relative: String = serde_json::from_str(provider).map_err(|e| {
                GenError::format(format!("invalid path literal {}: {}", provider, e))
            })?;
            return Ok(normalize_repo_path(BUILD_SCRIPT_DIR, &relative));
        }

        Err(GenError::format(format!(
            "failed to parse dts provider: {}",
            provider
        )))
    }
}

#[async_trait]
impl DeclarationSetParser for BuildScriptParser {
    async fn parse(
        &self,
        build_script: &str,
        dts_dir: &str,
        source: &dyn SecondarySource,
    ) -> GenResult<Vec<DeclarationDescriptor>> {
        let build_script = build_script.replace("\r\n", "\n");
        let mut out = Vec::new();

        let registrations: Vec<(String, String)> = CRATE_LIB_INSERT
            .captures_iter(&build_script)
            .map(|caps| (caps[1].to_string(), caps[2].trim().to_string()))
            .collect();

        for (name, provider) in registrations {
            let path = self.resolve_provider(&provider, dts_dir, source).await?;
            debug!(name = %name, path = %path, "extension declaration");
            out.push(DeclarationDescriptor::new(name, path, DeclKind::Extension));
        }

        for name in parse_libs_list(&build_script)? {
            let kind = if name.starts_with(EXTENSION_NAME_PREFIX) {
                DeclKind::Extension
            } else {
                DeclKind::Core
            };
            let path = join_repo_path(dts_dir, &format!("lib.{}.d.ts", name));
            out.push(DeclarationDescriptor::new(name, path, kind));
        }

        Ok(out)
    }
}

/// Pull the declaration file name out of an extension's `lib.rs`.
pub(crate) fn declaration_file_from_entry(ext_name: &str, entry: &str) -> GenResult<String> {
    let entry = entry.replace("\r\n", "\n");

    let body = GET_DECLARATION_BODY
        .captures(&entry)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
        .ok_or_else(|| {
            GenError::format(format!("failed to find get_declaration in {}", ext_name))
        })?;

    MANIFEST_DIR_JOIN
        .captures(body)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| GenError::format(format!("failed to parse lib name from {}", ext_name)))
}

/// Names from the `let libs = vec![...]` literal, in order.
pub(crate) fn parse_libs_list(build_script: &str) -> GenResult<Vec<String>> {
    let body = LIBS_VEC
        .captures(build_script)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
        .ok_or_else(|| GenError::format("failed to find builtin libs"))?;

    let flattened: String = body
        .lines()
        .map(|line| match line.find("//") {
            Some(idx) => &line[..idx],
            None => line,
        })
        .map(str::trim)
        .collect();

    flattened
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            serde_json::from_str::<String>(entry)
                .map_err(|e| GenError::format(format!("invalid lib entry {}: {}", entry, e)))
        })
        .collect()
}

/// Resolve `relative` against `base` like a filesystem path rooted at the
/// repository, dropping `.` and applying `..`.
pub(crate) fn normalize_repo_path(base: &str, relative: &str) -> String {
    let mut parts: Vec<&str> = Vec::new();

    for part in base.split('/').chain(relative.split('/')) {
        match part {
            "" | "." => {}
            ".." => {
                parts.pop();
            }
            other => parts.push(other),
        }
    }

    parts.join("/")
}
