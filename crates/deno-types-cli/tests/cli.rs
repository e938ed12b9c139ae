use assert_cmd::Command;
use predicates::prelude::*;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn deno_types(server_uri: &str) -> Command {
    let mut cmd = Command::cargo_bin("deno-types").unwrap();
    cmd.env("DENO_TYPES_RAW_URL", format!("{}/raw", server_uri))
        .env("DENO_TYPES_API_URL", format!("{}/api", server_uri))
        .env("DENO_TYPES_WEB_URL", format!("{}/web", server_uri))
        .env(
            "DENO_TYPES_RELEASE_URL",
            format!("{}/release-latest.txt", server_uri),
        )
        .env_remove("DENO_TYPES_GITHUB_TOKEN")
        .env_remove("GITHUB_TOKEN")
        .env_remove("LAST_PUBLISHED_VERSION")
        .env_remove("GITHUB_OUTPUT")
        .env("RUST_LOG", "info");
    cmd
}

#[test]
fn test_help_lists_commands() {
    Command::cargo_bin("deno-types")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("generate"))
        .stdout(predicate::str::contains("ci"));
}

#[test]
fn test_version_command() {
    Command::cargo_bin("deno-types")
        .unwrap()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_generate_rejects_ref_and_version() {
    // Unroutable upstream: the conflict must be reported before any request.
    deno_types("http://127.0.0.1:9")
        .args(["generate", "--ref", "main", "--version", "2.1.4"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("cannot specify both --ref and --version"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_ci_skips_already_published() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/release-latest.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string("v2.1.4\n"))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("github_output");
    let target = dir.path().join("out");

    deno_types(&server.uri())
        .arg("ci")
        .arg("--target")
        .arg(&target)
        .env("LAST_PUBLISHED_VERSION", "v2.1.4")
        .env("GITHUB_OUTPUT", &output)
        .assert()
        .success()
        .stderr(predicate::str::contains("The latest version is already published"));

    assert_eq!(std::fs::read_to_string(&output).unwrap(), "latest=v2.1.4\n");
    assert!(!target.exists());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_ci_reports_upstream_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/release-latest.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string("v2.2.0"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/repos/denoland/deno/commits/v2.2.0"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("github_output");

    deno_types(&server.uri())
        .arg("ci")
        .arg("--no-publish")
        .arg("--target")
        .arg(dir.path().join("out"))
        .env("LAST_PUBLISHED_VERSION", "v2.1.4")
        .env("GITHUB_OUTPUT", &output)
        .assert()
        .code(5)
        .stderr(predicate::str::contains("fatal:"))
        .stderr(predicate::str::contains("404"));

    // step output is written before generation starts
    assert_eq!(std::fs::read_to_string(&output).unwrap(), "latest=v2.2.0\n");
}
