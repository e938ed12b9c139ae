use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use super::build_script::{declaration_file_from_entry, normalize_repo_path, parse_libs_list};
use super::*;
use crate::types::DeclKind;

/// In-memory upstream, records what was requested.
#[derive(Default)]
struct CannedSource {
    files: HashMap<String, String>,
    requested: Mutex<Vec<String>>,
}

impl CannedSource {
    fn with(mut self, path: &str, content: &str) -> Self {
        self.files.insert(path.to_string(), content.to_string());
        self
    }

    fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl SecondarySource for CannedSource {
    async fn fetch_source(&self, path: &str) -> GenResult<String> {
        self.requested.lock().unwrap().push(path.to_string());
        self.files.get(path).cloned().ok_or_else(|| GenError::Http {
            url: path.to_string(),
            status: "404 Not Found".to_string(),
        })
    }
}

const HTTP_LIB_RS: &str = r#"
use std::path::PathBuf;

deno_core::extension!(deno_http, ops = []);

pub fn get_declaration() -> PathBuf {
  PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("lib.deno_http.d.ts")
}
"#;

const DTS_DIR: &str = "cli/tsc/dts";

fn file_list() -> Vec<String> {
    [
        "cli/build.rs",
        "cli/tsc/dts/lib.d.ts",
        "cli/tsc/dts/lib.dom.d.ts",
        "cli/tsc/dts/lib.esnext.d.ts",
        "cli/tsc/dts/lib.deno.ns.d.ts",
        "tests/specs/lib.d.ts",
        "ext/http/lib.rs",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

async fn parse(script: &str, source: &CannedSource) -> GenResult<Vec<DeclarationDescriptor>> {
    BuildScriptParser::new().parse(script, DTS_DIR, source).await
}

#[tokio::test]
async fn test_extension_provider_uses_secondary_fetch() {
    let source = CannedSource::default().with("ext/http/lib.rs", HTTP_LIB_RS);
    let script = r#"
        op_crate_libs.insert("deno.http", deno_http::get_declaration());
        let libs = vec!["es5"];
    "#;

    let got = parse(script, &source).await.unwrap();

    assert_eq!(got.len(), 2);
    assert_eq!(
        got[0],
        DeclarationDescriptor::new(
            "deno.http",
            "ext/http/lib.deno_http.d.ts",
            DeclKind::Extension
        )
    );
    assert_eq!(source.requested(), vec!["ext/http/lib.rs".to_string()]);
}

#[tokio::test]
async fn test_core_list_classification() {
    let source = CannedSource::default();
    let script = "fn main() {\n  let libs = vec![\"deno.ns\", \"es2022\"];\n}\n";

    let got = parse(script, &source).await.unwrap();

    assert_eq!(
        got,
        vec![
            DeclarationDescriptor::new(
                "deno.ns",
                "cli/tsc/dts/lib.deno.ns.d.ts",
                DeclKind::Extension
            ),
            DeclarationDescriptor::new("es2022", "cli/tsc/dts/lib.es2022.d.ts", DeclKind::Core),
        ]
    );
}

#[tokio::test]
async fn test_all_provider_shapes_and_order() {
    let source = CannedSource::default().with("ext/http/lib.rs", HTTP_LIB_RS);
    let script = r#"
    let mut op_crate_libs = HashMap::new();
    op_crate_libs.insert("deno.cache", "../ext/cache/lib.deno_cache.d.ts");
    op_crate_libs.insert(
      "deno.webgpu",
      deno_webgpu_get_declaration(),
    );
    op_crate_libs.insert("deno.http", deno_http::get_declaration());

    // ...

    let libs = vec![
      // Deno custom type libraries
      "deno.window",
      "deno.shared_globals", // trailing comment
      // Deno built-in type libraries
      "es5",
      "es2015.collection",
    ];
    "#;

    let got = parse(script, &source).await.unwrap();
    let summary: Vec<(&str, &str, DeclKind)> = got
        .iter()
        .map(|d| (d.name.as_str(), d.path.as_str(), d.kind))
        .collect();

    assert_eq!(
        summary,
        vec![
            ("deno.cache", "ext/cache/lib.deno_cache.d.ts", DeclKind::Extension),
            ("deno.webgpu", "cli/tsc/dts/lib.deno_webgpu.d.ts", DeclKind::Extension),
            ("deno.http", "ext/http/lib.deno_http.d.ts", DeclKind::Extension),
            ("deno.window", "cli/tsc/dts/lib.deno.window.d.ts", DeclKind::Extension),
            (
                "deno.shared_globals",
                "cli/tsc/dts/lib.deno.shared_globals.d.ts",
                DeclKind::Extension
            ),
            ("es5", "cli/tsc/dts/lib.es5.d.ts", DeclKind::Core),
            (
                "es2015.collection",
                "cli/tsc/dts/lib.es2015.collection.d.ts",
                DeclKind::Core
            ),
        ]
    );
}

#[tokio::test]
async fn test_unknown_provider_is_fatal() {
    let source = CannedSource::default();
    let script = r#"
        op_crate_libs.insert("deno.fs", some_other_thing());
        let libs = vec!["es5"];
    "#;

    let err = parse(script, &source).await.unwrap_err();
    assert!(matches!(err, GenError::UpstreamFormat { .. }));
    assert!(err.to_string().contains("some_other_thing()"));
}

#[tokio::test]
async fn test_missing_secondary_file_is_fatal() {
    let source = CannedSource::default();
    let script = r#"
        op_crate_libs.insert("deno.url", deno_url::get_declaration());
        let libs = vec!["es5"];
    "#;

    let err = parse(script, &source).await.unwrap_err();
    assert!(matches!(err, GenError::Http { .. }));
}

#[tokio::test]
async fn test_missing_libs_list_is_fatal() {
    let source = CannedSource::default();
    let err = parse("fn main() {}", &source).await.unwrap_err();
    assert!(err.to_string().contains("failed to find builtin libs"));
}

#[test]
fn test_declaration_file_missing_function() {
    let err = declaration_file_from_entry("url", "pub fn other() {}").unwrap_err();
    assert!(err.to_string().contains("failed to find get_declaration in url"));
}

#[test]
fn test_declaration_file_unexpected_body() {
    let entry = concat!(
        "pub fn get_declaration() -> PathBuf {\n",
        "  PathBuf::from(\"lib.deno_url.d.ts\")\n",
        "}\n",
    );
    let err = declaration_file_from_entry("url", entry).unwrap_err();
    assert!(err.to_string().contains("failed to parse lib name from url"));
}

#[test]
fn test_declaration_file_crlf() {
    let entry = concat!(
        "pub fn get_declaration() -> PathBuf {\r\n",
        "  PathBuf::from(env!(\"CARGO_MANIFEST_DIR\")).join(\"lib.deno_url.d.ts\")\r\n",
        "}\r\n",
    );
    assert_eq!(
        declaration_file_from_entry("url", entry).unwrap(),
        "lib.deno_url.d.ts"
    );
}

#[test]
fn test_libs_list_rejects_non_string_entry() {
    let err = parse_libs_list("let libs = vec![\"es5\", LIB_NAME];\n").unwrap_err();
    assert!(err.to_string().contains("LIB_NAME"));
}

#[test]
fn test_normalize_repo_path() {
    assert_eq!(
        normalize_repo_path("cli", "../ext/cache/lib.deno_cache.d.ts"),
        "ext/cache/lib.deno_cache.d.ts"
    );
    assert_eq!(
        normalize_repo_path("cli", "./tsc/dts/lib.deno.ns.d.ts"),
        "cli/tsc/dts/lib.deno.ns.d.ts"
    );
    assert_eq!(normalize_repo_path("cli", "../../../x.d.ts"), "x.d.ts");
}

#[test]
fn test_find_dts_dir_single_candidate() {
    assert_eq!(find_dts_dir(&file_list()).unwrap(), DTS_DIR);
}

#[test]
fn test_find_dts_dir_none() {
    let err = find_dts_dir(&["cli/build.rs", "tests/lib.d.ts"]).unwrap_err();
    assert!(matches!(err, GenError::UpstreamFormat { .. }));
    assert!(err.to_string().contains("candidates: )"));
}

#[test]
fn test_find_dts_dir_ambiguous() {
    let mut files = file_list();
    files.push("cli/dts/lib.dom.d.ts".to_string());

    let err = find_dts_dir(&files).unwrap_err();
    assert!(err.to_string().contains("cli/dts, cli/tsc/dts"));
}

#[tokio::test]
async fn test_ambiguous_anchor_fails_before_parsing() {
    let source = CannedSource::default().with("ext/http/lib.rs", HTTP_LIB_RS);
    let mut files = file_list();
    files.push("ext/web/lib.esnext.d.ts".to_string());
    let script = r#"
        op_crate_libs.insert("deno.http", deno_http::get_declaration());
        let libs = vec!["es5"];
    "#;

    let result = resolve_from_sources(script, &files, &BuildScriptParser, &source).await;

    assert!(matches!(result, Err(GenError::UpstreamFormat { .. })));
    assert!(source.requested().is_empty());
}

#[tokio::test]
async fn test_resolved_names_are_unique() {
    let source = CannedSource::default();
    let script = r#"
        op_crate_libs.insert("deno.ns", "./tsc/dts/lib.deno.ns.d.ts");
        let libs = vec!["deno.ns", "es5"];
    "#;

    let err = resolve_from_sources(script, &file_list(), &BuildScriptParser, &source)
        .await
        .unwrap_err();
    assert!(matches!(err, GenError::DuplicateName { ref name } if name == "deno.ns"));

    let script = r#"
        op_crate_libs.insert("deno.http", deno_http::get_declaration());
        let libs = vec!["deno.ns", "es5", "dom"];
    "#;
    let source = CannedSource::default().with("ext/http/lib.rs", HTTP_LIB_RS);
    let got = resolve_from_sources(script, &file_list(), &BuildScriptParser, &source)
        .await
        .unwrap();
    assert!(ensure_unique_names(&got).is_ok());
    assert_eq!(got.len(), 4);
}
