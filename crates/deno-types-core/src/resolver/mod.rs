//! Declaration-set resolution.
//!
//! Works out which declaration files the runtime ships, under which logical
//! names, from the upstream build script:
//!
//! 1. Locate the bundled declarations directory from the file listing
//! 2. Parse the build script with a [`DeclarationSetParser`]
//! 3. Reject duplicate logical names
//!
//! Parsing may need more upstream files; those are fetched through a
//! [`SecondarySource`] so parsers can be exercised with canned inputs.

use std::collections::HashSet;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::client::SourceClient;
use crate::error::{GenError, GenResult};
use crate::types::DeclarationDescriptor;

mod anchor;
mod build_script;

#[cfg(test)]
mod tests;

pub use anchor::{find_dts_dir, ANCHOR_FILES};
pub use build_script::BuildScriptParser;

/// Path of the build script inside the upstream repository.
pub const BUILD_SCRIPT_PATH: &str = "cli/build.rs";

/// Fetches additional upstream files while parsing.
#[async_trait]
pub trait SecondarySource: Send + Sync {
    async fn fetch_source(&self, path: &str) -> GenResult<String>;
}

/// Strategy turning build script text into descriptors.
#[async_trait]
pub trait DeclarationSetParser: Send + Sync {
    /// Parse `build_script`. `dts_dir` is the repository directory holding
    /// the bundled declarations.
    async fn parse(
        &self,
        build_script: &str,
        dts_dir: &str,
        source: &dyn SecondarySource,
    ) -> GenResult<Vec<DeclarationDescriptor>>;
}

/// [`SecondarySource`] reading from the upstream repository at a fixed commit.
#[derive(Debug, Clone, Copy)]
pub struct PinnedSource<'a> {
    client: &'a SourceClient,
    commit: &'a str,
}

impl<'a> PinnedSource<'a> {
    pub fn new(client: &'a SourceClient, commit: &'a str) -> Self {
        Self { client, commit }
    }
}

#[async_trait]
impl SecondarySource for PinnedSource<'_> {
    async fn fetch_source(&self, path: &str) -> GenResult<String> {
        self.client.fetch_raw(self.commit, path).await
    }
}

/// Resolve the full descriptor list for a commit.
pub async fn resolve_declarations(
    client: &SourceClient,
    parser: &dyn DeclarationSetParser,
    commit: &str,
) -> GenResult<Vec<DeclarationDescriptor>> {
    let build_script = client.fetch_raw(commit, BUILD_SCRIPT_PATH).await?;
    let file_list = client.fetch_file_list(commit).await?;
    debug!(files = file_list.len(), "fetched file list");

    let source = PinnedSource::new(client, commit);
    resolve_from_sources(&build_script, &file_list, parser, &source).await
}

/// Resolve from already fetched inputs.
pub async fn resolve_from_sources(
    build_script: &str,
    file_list: &[String],
    parser: &dyn DeclarationSetParser,
    source: &dyn SecondarySource,
) -> GenResult<Vec<DeclarationDescriptor>> {
    let dts_dir = find_dts_dir(file_list)?;
    info!(dir = %dts_dir, "located bundled declarations");

    let descriptors = parser.parse(build_script, &dts_dir, source).await?;
    ensure_unique_names(&descriptors)?;

    Ok(descriptors)
}

/// Every logical name must appear once.
pub fn ensure_unique_names(descriptors: &[DeclarationDescriptor]) -> GenResult<()> {
    let mut seen = HashSet::new();
    for d in descriptors {
        if !seen.insert(d.name.as_str()) {
            return Err(GenError::DuplicateName {
                name: d.name.clone(),
            });
        }
    }
    Ok(())
}

/// Join a repository directory and a file name (`""` is the repo root).
pub(crate) fn join_repo_path(dir: &str, file: &str) -> String {
    if dir.is_empty() {
        file.to_string()
    } else {
        format!("{}/{}", dir, file)
    }
}
