use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "deno-types",
    version,
    about = "Generate a standalone npm package of Deno's built-in type declarations"
)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Generate the package for an upstream ref or release
    Generate(GenerateArgs),
    /// Pipeline mode: generate and publish when a new release is out
    Ci(CiArgs),
    Version,
}

#[derive(clap::Args, Debug, Clone)]
pub struct GenerateArgs {
    /// Upstream branch, tag or commit (default: main)
    #[arg(long = "ref")]
    pub git_ref: Option<String>,

    /// Released version to generate for; resolves tag `v<VERSION>`
    #[arg(long)]
    pub version: Option<String>,

    /// Output directory (wiped before generation)
    #[arg(long, default_value = "out")]
    pub target: PathBuf,

    /// Installed `typescript/lib` directory to read built-in lib names from
    #[arg(long)]
    pub typescript_lib_dir: Option<PathBuf>,
}

#[derive(clap::Args, Debug, Clone)]
pub struct CiArgs {
    /// Version currently on the registry
    #[arg(long, env = "LAST_PUBLISHED_VERSION")]
    pub last_published: Option<String>,

    /// File receiving `latest=<version>` step output
    #[arg(long, env = "GITHUB_OUTPUT")]
    pub github_output: Option<PathBuf>,

    /// Output directory (wiped before generation)
    #[arg(long, default_value = "out")]
    pub target: PathBuf,

    /// Generate only, skip `npm publish`
    #[arg(long)]
    pub no_publish: bool,

    /// Registry passed to `npm publish`
    #[arg(long, env = "NPM_REGISTRY", default_value = "https://npm.tei.su")]
    pub npm_registry: String,

    /// Installed `typescript/lib` directory to read built-in lib names from
    #[arg(long)]
    pub typescript_lib_dir: Option<PathBuf>,
}
