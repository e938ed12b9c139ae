use anyhow::Context;
use deno_types_core::{
    generate_package, BuildScriptParser, GenError, GenResult, GeneratorConfig, SourceClient,
};
use tracing::info;

use super::super::args::GenerateArgs;
use super::load_ts_libs;
use crate::exit_codes::EXIT_SUCCESS;

const DEFAULT_REF: &str = "main";

pub(crate) async fn run(args: GenerateArgs) -> anyhow::Result<i32> {
    let reference = upstream_ref(args.git_ref.as_deref(), args.version.as_deref())?;
    let ts_libs = load_ts_libs(args.typescript_lib_dir.as_deref())?;

    let client = SourceClient::from_env()?;
    let commit = client
        .resolve_commit(&reference)
        .await
        .with_context(|| format!("resolving {}", reference))?;
    info!("Generating types from {} (commit {})...", reference, commit);

    let mut config = GeneratorConfig::new(commit, &args.target).with_ts_libs(ts_libs);
    if let Some(version) = &args.version {
        config = config.with_version(version);
    }

    let package = generate_package(&client, &BuildScriptParser::new(), &config).await?;
    info!(
        libs = package.descriptors.len(),
        unknown_references = package.unknown_references,
        version = %package.manifest.version,
        "Package written to {}",
        package.out_dir.display()
    );

    Ok(EXIT_SUCCESS)
}

/// Upstream ref to resolve: explicit ref, release tag, or the default branch.
pub(crate) fn upstream_ref(git_ref: Option<&str>, version: Option<&str>) -> GenResult<String> {
    match (git_ref, version) {
        (Some(_), Some(_)) => Err(GenError::Config {
            message: "cannot specify both --ref and --version".to_string(),
        }),
        (Some(reference), None) => Ok(reference.to_string()),
        (None, Some(version)) => Ok(format!("v{}", version.trim_start_matches('v'))),
        (None, None) => Ok(DEFAULT_REF.to_string()),
    }
}
