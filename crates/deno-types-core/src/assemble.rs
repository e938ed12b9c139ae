//! Package generation.
//!
//! Order of operations:
//! 1. Clean the output directory
//! 2. Resolve the declaration set for the commit
//! 3. Download every declaration (bounded parallelism), copying extensions
//!    into the built-in-compatible tree
//! 4. Rewrite references in both renderings
//! 5. Emit entry files and `package.json`
//!
//! Any hard error aborts the run; there is no partial package.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info};

use crate::client::SourceClient;
use crate::error::{GenError, GenResult};
use crate::layout::PackageLayout;
use crate::manifest::PackageManifest;
use crate::resolver::{resolve_declarations, DeclarationSetParser};
use crate::rewrite::{rewrite_builtin_compatible, rewrite_bundled, ReferenceTargets};
use crate::tslib::TypeScriptLibs;
use crate::types::{DeclKind, DeclarationDescriptor};

/// Maximum in-flight downloads.
pub const DOWNLOAD_CONCURRENCY: usize = 8;

/// Libs making up the `ns` flavor entry file.
pub const NS_FLAVOR_LIBS: [&str; 3] = ["deno.ns", "deno.net", "deno.unstable"];

pub const NS_ENTRY_FILE: &str = "ns.d.ts";
pub const FULL_ENTRY_FILE: &str = "full.d.ts";
pub const FREE_STANDING_ENTRY_FILE: &str = "free-standing.d.ts";
pub const MANIFEST_FILE: &str = "package.json";

/// Inputs of one generation run.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Pinned upstream commit.
    pub commit: String,

    /// Output directory; wiped at the start of the run.
    pub out_dir: PathBuf,

    /// Released version, if generating for a release.
    pub version: Option<String>,

    /// Libs the host TypeScript provides.
    pub ts_libs: TypeScriptLibs,
}

impl GeneratorConfig {
    pub fn new(commit: impl Into<String>, out_dir: impl Into<PathBuf>) -> Self {
        Self {
            commit: commit.into(),
            out_dir: out_dir.into(),
            version: None,
            ts_libs: TypeScriptLibs::builtin(),
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn with_ts_libs(mut self, ts_libs: TypeScriptLibs) -> Self {
        self.ts_libs = ts_libs;
        self
    }
}

/// Summary of a finished run.
#[derive(Debug, Clone)]
pub struct GeneratedPackage {
    pub out_dir: PathBuf,
    pub descriptors: Vec<DeclarationDescriptor>,
    pub manifest: PackageManifest,
    /// Lib references that could not be resolved and were left as is.
    pub unknown_references: usize,
}

/// Generate the package for `config.commit` into `config.out_dir`.
pub async fn generate_package(
    client: &SourceClient,
    parser: &dyn DeclarationSetParser,
    config: &GeneratorConfig,
) -> GenResult<GeneratedPackage> {
    let layout = PackageLayout::new(&config.out_dir);
    prepare_out_dir(layout.root()).await?;

    info!("Collecting lib list...");
    let descriptors = resolve_declarations(client, parser, &config.commit).await?;
    check_destinations(&layout, &descriptors)?;

    info!("Found {} d.ts libs", descriptors.len());
    download_all(client, &layout, &config.commit, &descriptors).await?;

    info!("Generating a package");
    let unknown_references = rewrite_all(&layout, &descriptors, &config.ts_libs).await?;

    let ns = ns_entry(&descriptors)?;
    write_file(&layout.root().join(NS_ENTRY_FILE), &ns).await?;
    write_file(&layout.root().join(FULL_ENTRY_FILE), &full_entry(&descriptors)).await?;
    write_file(
        &layout.root().join(FREE_STANDING_ENTRY_FILE),
        &free_standing_entry(&descriptors),
    )
    .await?;

    let manifest = PackageManifest::new(config.version.as_deref(), &config.commit);
    write_file(&layout.root().join(MANIFEST_FILE), &manifest.to_json()).await?;

    info!("Done");

    Ok(GeneratedPackage {
        out_dir: config.out_dir.clone(),
        descriptors,
        manifest,
        unknown_references,
    })
}

async fn prepare_out_dir(dir: &Path) -> GenResult<()> {
    if tokio::fs::try_exists(dir)
        .await
        .map_err(|e| GenError::io(dir, e))?
    {
        debug!(dir = %dir.display(), "removing previous output");
        tokio::fs::remove_dir_all(dir)
            .await
            .map_err(|e| GenError::io(dir, e))?;
    }

    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| GenError::io(dir, e))
}

/// Every descriptor must land on its own file.
pub fn check_destinations(
    layout: &PackageLayout,
    descriptors: &[DeclarationDescriptor],
) -> GenResult<()> {
    let mut seen = HashSet::new();
    for desc in descriptors {
        let dest = layout.bundled_dest(desc);
        if !seen.insert(dest.clone()) {
            return Err(GenError::DuplicateDestination { path: dest });
        }
    }
    Ok(())
}

async fn download_all(
    client: &SourceClient,
    layout: &PackageLayout,
    commit: &str,
    descriptors: &[DeclarationDescriptor],
) -> GenResult<()> {
    let sem = Arc::new(Semaphore::new(DOWNLOAD_CONCURRENCY));
    let mut join_set = JoinSet::new();

    for desc in descriptors {
        let client = client.clone();
        let layout = layout.clone();
        let commit = commit.to_string();
        let desc = desc.clone();
        let sem = sem.clone();

        join_set.spawn(async move {
            let _permit = sem.acquire_owned().await.map_err(|e| GenError::Internal {
                message: format!("download pool closed: {}", e),
            })?;
            download_one(&client, &layout, &commit, &desc).await?;
            Ok::<_, GenError>(desc)
        });
    }

    let total = descriptors.len();
    let mut done = 0usize;
    while let Some(res) = join_set.join_next().await {
        let desc = match res {
            Ok(Ok(desc)) => desc,
            Ok(Err(e)) => {
                join_set.abort_all();
                return Err(e);
            }
            Err(e) => {
                join_set.abort_all();
                return Err(GenError::Internal {
                    message: format!("download task failed: {}", e),
                });
            }
        };

        done += 1;
        info!("[{}/{}] Downloaded {} as {}...", done, total, desc.path, desc.name);
    }

    Ok(())
}

async fn download_one(
    client: &SourceClient,
    layout: &PackageLayout,
    commit: &str,
    desc: &DeclarationDescriptor,
) -> GenResult<()> {
    let dest = layout.bundled_dest(desc);
    create_parent(&dest).await?;
    client.download_to(commit, &desc.path, &dest).await?;

    if desc.kind == DeclKind::Extension {
        let copy = layout.builtin_compat_dest(desc);
        create_parent(&copy).await?;
        tokio::fs::copy(&dest, &copy)
            .await
            .map_err(|e| GenError::io(&copy, e))?;
    }

    Ok(())
}

/// Pass A over every bundled file, Pass B over every built-in-compatible
/// copy. Returns the number of unresolved references.
async fn rewrite_all(
    layout: &PackageLayout,
    descriptors: &[DeclarationDescriptor],
    ts_libs: &TypeScriptLibs,
) -> GenResult<usize> {
    let targets = ReferenceTargets::new(layout, descriptors);
    let mut unknown = 0;

    for desc in descriptors {
        let file = layout.bundled_dest(desc);
        let content = read_file(&file).await?;
        let outcome = rewrite_bundled(&content, desc, &targets);
        unknown += outcome.unknown.len();
        if outcome.changed {
            write_file(&file, &outcome.content).await?;
        }

        if desc.kind != DeclKind::Extension {
            continue;
        }

        let file = layout.builtin_compat_dest(desc);
        let content = read_file(&file).await?;
        let outcome = rewrite_builtin_compatible(&content, desc, &targets, ts_libs);
        unknown += outcome.unknown.len();
        if outcome.changed {
            write_file(&file, &outcome.content).await?;
        }
    }

    Ok(unknown)
}

fn reference_lines<I: IntoIterator<Item = String>>(paths: I) -> String {
    paths
        .into_iter()
        .map(|p| format!(r#"/// <reference path="{}" />"#, p))
        .collect::<Vec<_>>()
        .join("\n")
}

/// `ns.d.ts`: the runtime namespace libs, built-in-compatible rendering.
pub fn ns_entry(descriptors: &[DeclarationDescriptor]) -> GenResult<String> {
    let selected: Vec<&DeclarationDescriptor> = descriptors
        .iter()
        .filter(|d| d.kind == DeclKind::Extension && NS_FLAVOR_LIBS.contains(&d.name.as_str()))
        .collect();

    if selected.len() != NS_FLAVOR_LIBS.len() {
        let missing = NS_FLAVOR_LIBS
            .iter()
            .filter(|name| !selected.iter().any(|d| d.name == **name))
            .map(|name| name.to_string())
            .collect();
        return Err(GenError::MissingRequired {
            flavor: "ns".to_string(),
            missing,
        });
    }

    Ok(reference_lines(
        selected
            .into_iter()
            .map(PackageLayout::builtin_compat_entry_reference),
    ))
}

/// `full.d.ts`: every extension, built-in-compatible rendering.
pub fn full_entry(descriptors: &[DeclarationDescriptor]) -> String {
    reference_lines(
        descriptors
            .iter()
            .filter(|d| d.kind == DeclKind::Extension)
            .map(PackageLayout::builtin_compat_entry_reference),
    )
}

/// `free-standing.d.ts`: everything, bundled rendering, core libs first.
pub fn free_standing_entry(descriptors: &[DeclarationDescriptor]) -> String {
    let mut ordered: Vec<&DeclarationDescriptor> = descriptors.iter().collect();
    ordered.sort_by_key(|d| d.kind != DeclKind::Core);

    reference_lines(
        ordered
            .into_iter()
            .map(PackageLayout::bundled_entry_reference),
    )
}

async fn create_parent(path: &Path) -> GenResult<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| GenError::io(parent, e))?;
    }
    Ok(())
}

async fn read_file(path: &Path) -> GenResult<String> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|e| GenError::io(path, e))
}

async fn write_file(path: &Path, content: &str) -> GenResult<()> {
    tokio::fs::write(path, content)
        .await
        .map_err(|e| GenError::io(path, e))
}
