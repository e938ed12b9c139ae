//! Token authentication for the upstream host.
//!
//! Anonymous access works for everything we fetch, but the REST API is
//! heavily rate limited without a token. In GitHub Actions, pass the job's
//! `GITHUB_TOKEN` through:
//!
//! ```yaml
//! - run: deno-types ci
//!   env:
//!     GITHUB_TOKEN: ${{ secrets.GITHUB_TOKEN }}
//! ```

use crate::types::SourceConfig;

/// Token provider for upstream requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenProvider {
    /// Static token (from config or env).
    Static(String),

    /// No authentication.
    None,
}

impl TokenProvider {
    /// Create a static token provider.
    pub fn static_token(token: impl Into<String>) -> Self {
        Self::Static(token.into())
    }

    /// Use the token from the config, if any. Empty tokens count as absent.
    pub fn from_config(config: &SourceConfig) -> Self {
        match config.token.as_deref() {
            Some(token) if !token.is_empty() => Self::static_token(token),
            _ => Self::None,
        }
    }

    /// Value for the `Authorization` header.
    pub fn authorization(&self) -> Option<String> {
        match self {
            Self::Static(token) => Some(format!("Bearer {}", token)),
            Self::None => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Static(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config() {
        let config = SourceConfig::default().with_token("abc");
        let provider = TokenProvider::from_config(&config);
        assert!(provider.is_authenticated());
        assert_eq!(provider.authorization().as_deref(), Some("Bearer abc"));

        let empty = SourceConfig::default().with_token("");
        assert_eq!(TokenProvider::from_config(&empty), TokenProvider::None);
        assert!(TokenProvider::None.authorization().is_none());
    }
}
