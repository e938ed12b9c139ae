//! Client for the upstream code host.
//!
//! Public API: no status code knowledge. All HTTP/status mapping in http.rs.

use std::path::Path;

use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use tracing::debug;

use crate::auth::TokenProvider;
use crate::error::{GenError, GenResult};
use crate::types::{CommitInfo, SourceConfig, TreeList};

mod helpers;
mod http;

use helpers::{commit_url, raw_url, tree_list_url};
use http::HttpBackend;

pub const SOURCE_USER_AGENT: &str = concat!("deno-types/", env!("CARGO_PKG_VERSION"));

/// Client for fetching upstream files and metadata.
#[derive(Debug, Clone)]
pub struct SourceClient {
    http: HttpBackend,
    config: SourceConfig,
}

impl SourceClient {
    pub fn new(config: SourceConfig) -> GenResult<Self> {
        let token_provider = TokenProvider::from_config(&config);

        let mut default_headers = HeaderMap::new();
        default_headers.insert(USER_AGENT, HeaderValue::from_static(SOURCE_USER_AGENT));

        let client = reqwest::Client::builder()
            .default_headers(default_headers)
            .build()
            .map_err(|e| GenError::Network {
                message: format!("failed to create HTTP client: {}", e),
            })?;

        Ok(Self {
            http: HttpBackend {
                client,
                token_provider,
            },
            config,
        })
    }

    pub fn from_env() -> GenResult<Self> {
        Self::new(SourceConfig::from_env())
    }

    /// Fetch a file's raw contents at a revision.
    pub async fn fetch_raw(&self, revision: &str, path: &str) -> GenResult<String> {
        let url = self.raw_file_url(revision, path);
        debug!(url = %url, "fetching raw file");
        self.http.get_text(&url).await
    }

    /// Download a file at a revision straight to disk. Returns bytes written.
    pub async fn download_to(&self, revision: &str, path: &str, dest: &Path) -> GenResult<u64> {
        let url = self.raw_file_url(revision, path);
        debug!(url = %url, dest = %dest.display(), "downloading file");
        self.http.download(&url, dest).await
    }

    /// Every file path in the repository at a commit.
    pub async fn fetch_file_list(&self, commit: &str) -> GenResult<Vec<String>> {
        let url = tree_list_url(&self.config.web_url, &self.config.repo, commit);
        debug!(url = %url, "fetching file list");
        let list: TreeList = self.http.get_json(&url).await?;
        Ok(list.paths)
    }

    /// Resolve a branch, tag or sha to a commit sha.
    pub async fn resolve_commit(&self, reference: &str) -> GenResult<String> {
        let url = commit_url(&self.config.api_url, &self.config.repo, reference);
        debug!(url = %url, "resolving commit");
        let info: CommitInfo = self.http.get_json(&url).await?;
        Ok(info.sha)
    }

    /// Latest released runtime version (e.g. `v2.1.4`).
    pub async fn fetch_latest_version(&self) -> GenResult<String> {
        debug!(url = %self.config.release_url, "fetching latest version");
        let text = self.http.get_text(&self.config.release_url).await?;
        let version = text.trim();
        if version.is_empty() {
            return Err(GenError::InvalidResponse {
                message: format!("empty version from {}", self.config.release_url),
            });
        }
        Ok(version.to_string())
    }

    pub fn raw_file_url(&self, revision: &str, path: &str) -> String {
        raw_url(&self.config.raw_url, &self.config.repo, revision, path)
    }

    pub fn is_authenticated(&self) -> bool {
        self.http.token_provider.is_authenticated()
    }
}
