use std::io::Write;
use std::path::Path;

use anyhow::Context;
use deno_types_core::{generate_package, BuildScriptParser, GenError, GeneratorConfig, SourceClient};
use tokio::process::Command;
use tracing::info;

use super::super::args::CiArgs;
use super::load_ts_libs;
use crate::exit_codes::EXIT_SUCCESS;

pub(crate) async fn run(args: CiArgs) -> anyhow::Result<i32> {
    let client = SourceClient::from_env()?;

    let latest = client.fetch_latest_version().await?;
    info!("Latest version: {}", latest);
    info!(
        "Last published version: {}",
        args.last_published.as_deref().unwrap_or("<none>")
    );

    if let Some(path) = &args.github_output {
        append_step_output(path, "latest", &latest)?;
    }

    if args.last_published.as_deref() == Some(latest.as_str()) {
        info!("The latest version is already published");
        return Ok(EXIT_SUCCESS);
    }

    let ts_libs = load_ts_libs(args.typescript_lib_dir.as_deref())?;
    let commit = client
        .resolve_commit(&latest)
        .await
        .with_context(|| format!("resolving {}", latest))?;
    info!("Generating types from {} (commit {})...", latest, commit);

    let config = GeneratorConfig::new(commit, &args.target)
        .with_version(latest.as_str())
        .with_ts_libs(ts_libs);
    generate_package(&client, &BuildScriptParser::new(), &config).await?;

    if args.no_publish {
        info!("Skipping publish (--no-publish)");
        return Ok(EXIT_SUCCESS);
    }

    publish(&args.target, &args.npm_registry).await?;
    info!("Published {} to {}", latest, args.npm_registry);
    Ok(EXIT_SUCCESS)
}

/// Appends `key=value` to a step output file.
pub(crate) fn append_step_output(path: &Path, key: &str, value: &str) -> Result<(), GenError> {
    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| GenError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
    writeln!(file, "{}={}", key, value).map_err(|e| GenError::Io {
        path: path.to_path_buf(),
        source: e,
    })
}

async fn publish(package_dir: &Path, registry: &str) -> Result<(), GenError> {
    publish_with("npm", package_dir, registry).await
}

async fn publish_with(npm: &str, package_dir: &Path, registry: &str) -> Result<(), GenError> {
    let status = Command::new(npm)
        .args([
            "publish",
            "--registry",
            registry,
            "--access",
            "public",
            "--tag",
            "latest",
            "-q",
        ])
        .current_dir(package_dir)
        .status()
        .await
        .map_err(|e| GenError::Publish {
            message: format!("failed to run {}: {}", npm, e),
        })?;

    if !status.success() {
        return Err(GenError::Publish {
            message: format!("{} publish exited with {}", npm, status),
        });
    }
    Ok(())
}
