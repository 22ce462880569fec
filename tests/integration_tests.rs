//! Integration tests for the Android strings translator
//!
//! These tests build small Android project trees on disk and run the
//! complete workflow against a mocked OpenAI-compatible endpoint.

use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use wiremock::{
    matchers::{header, method, path},
    Mock, MockServer, Request, Respond, ResponseTemplate,
};

use android_strings_translator::{
    config::{GLOBAL_CONFIG_FILE, MODULE_CONFIG_FILE, PROMPT_TEMPLATE_FILE},
    error::TranslatorError,
    resources::read_string_resources,
    scanner, translate_project,
};

// ==================== Test Helpers ====================

const THREE_STRINGS: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<resources>
    <string name="title">Hello</string>
    <string name="message">It's "great"</string>
    <string name="action">Save &amp; exit</string>
</resources>
"#;

/// Answers a ping with "Pong" and a translation with the user prompt itself.
/// With a `{words_json}` template the prompt is the entry array, so every
/// entry comes back unchanged.
struct EchoResponder;

impl Respond for EchoResponder {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let body: Value = serde_json::from_slice(&request.body).unwrap_or(Value::Null);
        let prompt = body["messages"]
            .as_array()
            .and_then(|messages| messages.last())
            .and_then(|message| message["content"].as_str())
            .unwrap_or_default()
            .to_string();

        let content = if prompt == "Ping" {
            "Pong".to_string()
        } else {
            prompt
        };

        ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{ "message": { "role": "assistant", "content": content } }]
        }))
    }
}

fn write_file(root: &Path, relative: &str, content: &str) -> PathBuf {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).expect("create parent");
    fs::write(&path, content).expect("write file");
    path
}

fn write_global_config(root: &Path, endpoint: &str, extra: &str) {
    let config = format!(
        r#"config:
  appDescription: Note-taking app
  sourceLanguage: en
  targetLanguages:
    - es
    - fr
  aiProvider: openai
  aiKey: test-openai-key
  aiEndpoint: {}
  aiTimeoutSeconds: 5
{}"#,
        endpoint, extra
    );
    write_file(root, GLOBAL_CONFIG_FILE, &config);
}

fn two_module_project(endpoint: &str) -> TempDir {
    let dir = TempDir::new().expect("temp dir");
    let root = dir.path();
    write_global_config(root, endpoint, "");
    write_file(root, PROMPT_TEMPLATE_FILE, "{words_json}");
    write_file(root, "app/src/main/res/values/strings.xml", THREE_STRINGS);
    write_file(root, "feature/src/main/res/values/strings.xml", THREE_STRINGS);
    write_file(
        root,
        &format!("app/{}", MODULE_CONFIG_FILE),
        "config:\n  moduleDescription: Main screen\n",
    );
    dir
}

fn translated_pairs(path: &Path) -> Vec<(String, String)> {
    read_string_resources(path)
        .expect("readable output")
        .into_iter()
        .map(|r| (r.name, r.value))
        .collect()
}

async fn echo_server() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer test-openai-key"))
        .respond_with(EchoResponder)
        .mount(&server)
        .await;
    server
}

// ==================== End-to-End Tests ====================

#[tokio::test]
async fn test_full_run_writes_every_module_and_language() {
    let server = echo_server().await;
    let dir = two_module_project(&server.uri());
    let root = dir.path();

    let report = translate_project(root).await.expect("run succeeds");

    assert_eq!(report.total_modules, 2);
    assert_eq!(report.total_translated, 12);

    let expected = vec![
        ("title".to_string(), "Hello".to_string()),
        ("message".to_string(), "It's \"great\"".to_string()),
        ("action".to_string(), "Save & exit".to_string()),
    ];
    for module in ["app", "feature"] {
        for language in ["es", "fr"] {
            let output = root.join(format!(
                "{}/src/main/res/values-{}/strings.xml",
                module, language
            ));
            assert_eq!(translated_pairs(&output), expected, "{} {}", module, language);
        }
    }

    // 1 ping + 4 translations
    let requests = server.received_requests().await.expect("recording enabled");
    assert_eq!(requests.len(), 5);
}

#[tokio::test]
async fn test_output_file_uses_android_escaping() {
    let server = echo_server().await;
    let dir = two_module_project(&server.uri());
    let root = dir.path();

    translate_project(root).await.expect("run succeeds");

    let xml = fs::read_to_string(root.join("app/src/main/res/values-es/strings.xml")).unwrap();
    assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"utf-8\"?>"));
    assert!(xml.contains("<!-- Generated by Translator AI -->"));
    assert!(xml.contains(r#"    <string name="message">It\'s \"great\"</string>"#));
    assert!(xml.contains(r#"    <string name="action">Save &amp; exit</string>"#));
}

#[tokio::test]
async fn test_rerun_is_byte_identical() {
    let server = echo_server().await;
    let dir = two_module_project(&server.uri());
    let root = dir.path();
    let output = root.join("feature/src/main/res/values-fr/strings.xml");

    translate_project(root).await.expect("first run");
    let first = fs::read(&output).unwrap();
    translate_project(root).await.expect("second run");

    assert_eq!(fs::read(&output).unwrap(), first);
}

#[tokio::test]
async fn test_report_json_has_totals_without_credential() {
    let server = echo_server().await;
    let dir = two_module_project(&server.uri());

    let report = translate_project(dir.path()).await.expect("run succeeds");
    let json = report.to_json().unwrap();

    assert!(!json.contains("test-openai-key"));
    let value: Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["totalTranslated"], 12);
    assert_eq!(value["modules"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_default_prompt_includes_module_description() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{ "message": { "content": "[]" } }]
        })))
        .mount(&server)
        .await;

    let dir = two_module_project(&server.uri());
    fs::remove_file(dir.path().join(PROMPT_TEMPLATE_FILE)).unwrap();

    translate_project(dir.path()).await.expect("run succeeds");

    let requests = server.received_requests().await.unwrap();
    let prompt: Value = serde_json::from_slice(&requests[1].body).unwrap();
    let text = prompt["messages"][1]["content"].as_str().unwrap();
    assert!(text.contains("Module (screen) description: Main screen"));
    assert!(text.contains("from English to Spanish"));
    assert_eq!(prompt["model"], "gpt-4.1-mini");
}

// ==================== Failure Tests ====================

#[tokio::test]
async fn test_rejected_credentials_abort_before_scanning() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid key"))
        .expect(1)
        .mount(&server)
        .await;

    let dir = two_module_project(&server.uri());
    let err = translate_project(dir.path()).await.unwrap_err();

    assert!(matches!(err, TranslatorError::Authentication(_)));
    assert!(!dir.path().join("app/src/main/res/values-es").exists());
}

#[tokio::test]
async fn test_empty_module_description_fails_before_translation() {
    let server = echo_server().await;
    let dir = two_module_project(&server.uri());
    write_file(
        dir.path(),
        &format!("feature/{}", MODULE_CONFIG_FILE),
        "config:\n  moduleDescription: \"\"\n",
    );

    let err = translate_project(dir.path()).await.unwrap_err();
    assert!(matches!(err, TranslatorError::Configuration(_)));
    assert!(err.to_string().contains(MODULE_CONFIG_FILE));

    // Only the credential ping reached the provider
    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(!dir.path().join("app/src/main/res/values-es").exists());
}

#[tokio::test]
async fn test_missing_global_config_is_configuration_error() {
    let dir = TempDir::new().unwrap();
    let err = translate_project(dir.path()).await.unwrap_err();
    assert!(matches!(err, TranslatorError::Configuration(_)));
}

#[tokio::test]
async fn test_yandex_without_folder_fails_without_network() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    write_file(
        dir.path(),
        GLOBAL_CONFIG_FILE,
        &format!(
            "config:\n  sourceLanguage: en\n  targetLanguages: [es]\n  aiProvider: Yandex\n  aiKey: key\n  aiEndpoint: {}\n",
            server.uri()
        ),
    );

    let err = translate_project(dir.path()).await.unwrap_err();
    assert!(matches!(err, TranslatorError::Configuration(_)));
    assert!(err.to_string().contains("aiFolder"));
}

#[tokio::test]
async fn test_unparseable_translation_is_fatal() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{ "message": { "content": "I can't translate that." } }]
        })))
        .mount(&server)
        .await;

    let dir = two_module_project(&server.uri());
    let err = translate_project(dir.path()).await.unwrap_err();

    assert!(matches!(err, TranslatorError::Parse(_)));
    assert!(err.to_string().contains("I can't translate that."));
}

// ==================== Discovery Tests ====================

#[test]
fn test_scan_ignores_language_directories() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write_file(root, "app/src/main/res/values/strings.xml", THREE_STRINGS);
    for qualifier in ["es", "fr", "pt-rBR", "night"] {
        write_file(
            root,
            &format!("app/src/main/res/values-{}/strings.xml", qualifier),
            THREE_STRINGS,
        );
    }

    let graph = scanner::scan(root).expect("scan succeeds");
    assert_eq!(graph.len(), 1);
    assert!(graph[0].resource_file.ends_with("values/strings.xml"));
    assert_eq!(graph[0].module_root, root.join("app"));
}

#[tokio::test]
async fn test_malformed_source_file_is_skipped() {
    let server = echo_server().await;
    let dir = two_module_project(&server.uri());
    write_file(
        dir.path(),
        "feature/src/main/res/values/strings.xml",
        "<resources><string name=\"broken\">",
    );

    let report = translate_project(dir.path()).await.expect("run continues");
    assert_eq!(report.total_modules, 2);
    assert_eq!(report.total_translated, 6);

    let empty = dir.path().join("feature/src/main/res/values-es/strings.xml");
    assert!(translated_pairs(&empty).is_empty());
}
