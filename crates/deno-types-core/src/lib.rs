//! Generator for a standalone package of Deno's built-in type declarations.
//!
//! This crate provides:
//!
//! - HTTP client for the upstream code host (raw files, tree listing,
//!   commit resolution, latest release)
//! - Declaration-set resolution from the upstream `cli/build.rs`
//! - Reference rewriting into bundled and built-in-compatible renderings
//! - Package assembly (entry files, `package.json`)
//!
//! # Quick Start
//!
//! ```no_run
//! use deno_types_core::{generate_package, BuildScriptParser, GeneratorConfig, SourceClient};
//!
//! # async fn example() -> Result<(), deno_types_core::GenError> {
//! let client = SourceClient::from_env()?;
//! let commit = client.resolve_commit("main").await?;
//!
//! let config = GeneratorConfig::new(commit, "out");
//! let package = generate_package(&client, &BuildScriptParser::new(), &config).await?;
//! println!("generated {} libs", package.descriptors.len());
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration
//!
//! | Environment Variable | Description |
//! |---------------------|-------------|
//! | `DENO_TYPES_REPO` | Upstream repository (default: `denoland/deno`) |
//! | `DENO_TYPES_RAW_URL` | Raw content host (default: `https://raw.githubusercontent.com`) |
//! | `DENO_TYPES_API_URL` | REST API host (default: `https://api.github.com`) |
//! | `DENO_TYPES_WEB_URL` | Web host serving tree listings (default: `https://github.com`) |
//! | `DENO_TYPES_RELEASE_URL` | Latest release URL (default: `https://dl.deno.land/release-latest.txt`) |
//! | `DENO_TYPES_GITHUB_TOKEN` | Bearer token, falls back to `GITHUB_TOKEN` |

pub mod assemble;
pub mod auth;
pub mod client;
pub mod error;
pub mod layout;
pub mod manifest;
pub mod resolver;
pub mod rewrite;
pub mod tslib;
pub mod types;

// Re-export main types
pub use assemble::{
    generate_package, GeneratedPackage, GeneratorConfig, DOWNLOAD_CONCURRENCY, NS_FLAVOR_LIBS,
};
pub use auth::TokenProvider;
pub use client::{SourceClient, SOURCE_USER_AGENT};
pub use error::{GenError, GenResult};
pub use layout::PackageLayout;
pub use manifest::PackageManifest;
pub use resolver::{
    resolve_declarations, BuildScriptParser, DeclarationSetParser, PinnedSource, SecondarySource,
    BUILD_SCRIPT_PATH,
};
pub use rewrite::{rewrite_builtin_compatible, rewrite_bundled, ReferenceTargets, RewriteOutcome};
pub use tslib::TypeScriptLibs;
pub use types::{DeclKind, DeclarationDescriptor, SourceConfig, DENO_REPO};
