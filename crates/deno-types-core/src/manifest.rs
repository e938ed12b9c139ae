//! `package.json` of the generated package.

use serde::{Deserialize, Serialize};

pub const PACKAGE_NAME: &str = "@teidesu/deno-types";
pub const PACKAGE_REPOSITORY: &str = "https://github.com/teidesu/deno-types";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageManifest {
    pub name: String,
    pub version: String,
    pub description: String,
    pub license: String,
    pub main: String,
    pub repository: Repository,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    #[serde(rename = "type")]
    pub kind: String,
    pub url: String,
}

impl PackageManifest {
    /// Manifest for a release (`v2.1.4` and `2.1.4` both give `2.1.4`) or,
    /// without a version, for a bare commit (`git-<sha>`).
    pub fn new(version: Option<&str>, commit: &str) -> Self {
        let version = match version {
            Some(v) if !v.is_empty() => v.strip_prefix('v').unwrap_or(v).to_string(),
            _ => format!("git-{}", commit),
        };

        Self {
            name: PACKAGE_NAME.to_string(),
            version,
            description: "TypeScript definitions for Deno".to_string(),
            license: "MIT".to_string(),
            main: String::new(),
            repository: Repository {
                kind: "git".to_string(),
                url: PACKAGE_REPOSITORY.to_string(),
            },
        }
    }

    /// Two-space indented JSON, keys in declaration order.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).expect("manifest serializes")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_json_shape() {
        let manifest = PackageManifest::new(Some("v2.1.4"), "abc");
        let expected = r#"{
  "name": "@teidesu/deno-types",
  "version": "2.1.4",
  "description": "TypeScript definitions for Deno",
  "license": "MIT",
  "main": "",
  "repository": {
    "type": "git",
    "url": "https://github.com/teidesu/deno-types"
  }
}"#;
        assert_eq!(manifest.to_json(), expected);
    }

    #[test]
    fn test_manifest_commit_version() {
        assert_eq!(PackageManifest::new(None, "abc123").version, "git-abc123");
        assert_eq!(PackageManifest::new(Some("2.0.0"), "abc123").version, "2.0.0");
    }
}
