//! Shared types: declaration descriptors, upstream API payloads, source config.

use serde::Deserialize;

/// Upstream repository the declarations are taken from.
pub const DENO_REPO: &str = "denoland/deno";

/// Category of a declaration file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclKind {
    /// Standard ECMAScript/DOM declarations bundled with the runtime.
    Core,

    /// Runtime-specific API surface.
    Extension,
}

impl DeclKind {
    /// Directory name used for this kind inside the generated package.
    pub fn dir_name(self) -> &'static str {
        match self {
            Self::Core => "lib",
            Self::Extension => "ext",
        }
    }
}

impl std::fmt::Display for DeclKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Core => write!(f, "core"),
            Self::Extension => write!(f, "extension"),
        }
    }
}

/// One declaration file discovered upstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclarationDescriptor {
    /// Logical name used in `/// <reference lib="..." />` (e.g. "deno.ns").
    pub name: String,

    /// Repository-relative path of the raw file.
    pub path: String,

    /// Category.
    pub kind: DeclKind,
}

impl DeclarationDescriptor {
    pub fn new(name: impl Into<String>, path: impl Into<String>, kind: DeclKind) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            kind,
        }
    }

    /// File name of this declaration in the generated package.
    pub fn file_name(&self) -> String {
        format!("lib.{}.d.ts", self.name)
    }
}

/// Response of the commit lookup endpoint (only the fields we need).
#[derive(Debug, Clone, Deserialize)]
pub struct CommitInfo {
    pub sha: String,
}

/// Response of the tree listing endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TreeList {
    pub paths: Vec<String>,
}

/// Upstream source configuration.
#[derive(Debug, Clone)]
pub struct SourceConfig {
    /// Repository slug (`owner/name`).
    pub repo: String,

    /// Base URL for raw file contents.
    pub raw_url: String,

    /// Base URL for the REST API.
    pub api_url: String,

    /// Base URL of the web frontend (serves tree listings).
    pub web_url: String,

    /// URL returning the latest released version as plain text.
    pub release_url: String,

    /// Token sent as bearer auth.
    pub token: Option<String>,
}

fn default_repo() -> String {
    DENO_REPO.to_string()
}

fn default_raw_url() -> String {
    "https://raw.githubusercontent.com".to_string()
}

fn default_api_url() -> String {
    "https://api.github.com".to_string()
}

fn default_web_url() -> String {
    "https://github.com".to_string()
}

fn default_release_url() -> String {
    "https://dl.deno.land/release-latest.txt".to_string()
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            repo: default_repo(),
            raw_url: default_raw_url(),
            api_url: default_api_url(),
            web_url: default_web_url(),
            release_url: default_release_url(),
            token: None,
        }
    }
}

impl SourceConfig {
    /// Create config from environment variables.
    ///
    /// | Variable | Description |
    /// |----------|-------------|
    /// | `DENO_TYPES_REPO` | Repository slug |
    /// | `DENO_TYPES_RAW_URL` | Raw content base URL |
    /// | `DENO_TYPES_API_URL` | REST API base URL |
    /// | `DENO_TYPES_WEB_URL` | Web frontend base URL |
    /// | `DENO_TYPES_RELEASE_URL` | Latest release URL |
    /// | `DENO_TYPES_GITHUB_TOKEN` / `GITHUB_TOKEN` | Bearer token |
    pub fn from_env() -> Self {
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.is_empty());

        Self {
            repo: var("DENO_TYPES_REPO").unwrap_or_else(default_repo),
            raw_url: var("DENO_TYPES_RAW_URL").unwrap_or_else(default_raw_url),
            api_url: var("DENO_TYPES_API_URL").unwrap_or_else(default_api_url),
            web_url: var("DENO_TYPES_WEB_URL").unwrap_or_else(default_web_url),
            release_url: var("DENO_TYPES_RELEASE_URL").unwrap_or_else(default_release_url),
            token: var("DENO_TYPES_GITHUB_TOKEN").or_else(|| var("GITHUB_TOKEN")),
        }
    }

    /// Point every endpoint at one base URL (mock servers, mirrors).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        let url = url.into();
        let url = url.trim_end_matches('/');
        self.raw_url = format!("{url}/raw");
        self.api_url = format!("{url}/api");
        self.web_url = format!("{url}/web");
        self.release_url = format!("{url}/release-latest.txt");
        self
    }

    /// Set the repository slug.
    pub fn with_repo(mut self, repo: impl Into<String>) -> Self {
        self.repo = repo.into();
        self
    }

    /// Set the token.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_descriptor_file_name() {
        let d = DeclarationDescriptor::new(
            "deno.ns",
            "cli/tsc/dts/lib.deno.ns.d.ts",
            DeclKind::Extension,
        );
        assert_eq!(d.file_name(), "lib.deno.ns.d.ts");
        assert_eq!(d.kind.dir_name(), "ext");
        assert_eq!(DeclKind::Core.dir_name(), "lib");
    }

    #[test]
    fn test_with_base_url_trims_slash() {
        let config = SourceConfig::default().with_base_url("http://127.0.0.1:9000/");
        assert_eq!(config.raw_url, "http://127.0.0.1:9000/raw");
        assert_eq!(config.api_url, "http://127.0.0.1:9000/api");
        assert_eq!(config.web_url, "http://127.0.0.1:9000/web");
        assert_eq!(config.release_url, "http://127.0.0.1:9000/release-latest.txt");
    }

    #[test]
    #[serial]
    fn test_from_env_token_fallback() {
        std::env::remove_var("DENO_TYPES_GITHUB_TOKEN");
        std::env::set_var("GITHUB_TOKEN", "gh-token");
        let config = SourceConfig::from_env();
        assert_eq!(config.token.as_deref(), Some("gh-token"));

        std::env::set_var("DENO_TYPES_GITHUB_TOKEN", "own-token");
        let config = SourceConfig::from_env();
        assert_eq!(config.token.as_deref(), Some("own-token"));

        std::env::remove_var("DENO_TYPES_GITHUB_TOKEN");
        std::env::remove_var("GITHUB_TOKEN");
        assert!(SourceConfig::from_env().token.is_none());
        assert_eq!(SourceConfig::from_env().repo, DENO_REPO);
    }
}
