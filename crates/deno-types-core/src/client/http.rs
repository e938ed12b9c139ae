//! HTTP layer: auth header, status mapping, body reading.
//!
//! This is the ONLY place for status code handling. client/mod.rs never
//! interprets status codes.

use std::path::Path;

use reqwest::header::{ACCEPT, AUTHORIZATION};
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::auth::TokenProvider;
use crate::error::{GenError, GenResult};

/// HTTP backend for making requests (holds reqwest client and auth).
#[derive(Debug, Clone)]
pub(crate) struct HttpBackend {
    pub(crate) client: reqwest::Client,
    pub(crate) token_provider: TokenProvider,
}

impl HttpBackend {
    /// GET a URL and return the body as text.
    pub(crate) async fn get_text(&self, url: &str) -> GenResult<String> {
        let response = self.get(url, None).await?;
        response.text().await.map_err(|e| GenError::Network {
            message: format!("failed to read response body from {}: {}", url, e),
        })
    }

    /// GET a URL and decode the body as JSON.
    pub(crate) async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> GenResult<T> {
        let response = self.get(url, Some("application/json")).await?;
        response
            .json()
            .await
            .map_err(|e| GenError::InvalidResponse {
                message: format!("failed to parse response from {}: {}", url, e),
            })
    }

    /// GET a URL and stream the body into `dest`.
    pub(crate) async fn download(&self, url: &str, dest: &Path) -> GenResult<u64> {
        let mut response = self.get(url, None).await?;

        let mut file = tokio::fs::File::create(dest)
            .await
            .map_err(|e| GenError::io(dest, e))?;

        let mut written = 0u64;
        while let Some(chunk) = response.chunk().await? {
            file.write_all(&chunk)
                .await
                .map_err(|e| GenError::io(dest, e))?;
            written += chunk.len() as u64;
        }
        file.flush().await.map_err(|e| GenError::io(dest, e))?;

        Ok(written)
    }

    /// Make a single GET request. Anything outside 2xx is an error.
    pub(crate) async fn get(
        &self,
        url: &str,
        accept: Option<&str>,
    ) -> GenResult<reqwest::Response> {
        debug!(url = %url, "GET");

        let mut request = self.client.get(url);

        if let Some(value) = self.token_provider.authorization() {
            request = request.header(AUTHORIZATION, value);
        }

        if let Some(accept) = accept {
            request = request.header(ACCEPT, accept);
        }

        let response = request.send().await?;
        let status = response.status();

        if status.is_success() {
            Ok(response)
        } else {
            Err(GenError::Http {
                url: url.to_string(),
                status: status.to_string(),
            })
        }
    }
}
