//! Pure helpers: URL construction (no HTTP, no status logic).

/// Raw file URL: `{base}/{repo}/{revision}/{path}`.
pub(crate) fn raw_url(base: &str, repo: &str, revision: &str, path: &str) -> String {
    format!(
        "{}/{}/{}/{}",
        base.trim_end_matches('/'),
        repo,
        revision,
        path.trim_start_matches('/')
    )
}

/// Tree listing URL: `{base}/{repo}/tree-list/{commit}`.
pub(crate) fn tree_list_url(base: &str, repo: &str, commit: &str) -> String {
    format!("{}/{}/tree-list/{}", base.trim_end_matches('/'), repo, commit)
}

/// Commit lookup URL: `{base}/repos/{repo}/commits/{reference}`.
pub(crate) fn commit_url(base: &str, repo: &str, reference: &str) -> String {
    format!(
        "{}/repos/{}/commits/{}",
        base.trim_end_matches('/'),
        repo,
        reference
    )
}
