//! End-to-end pull tests against a mock translation backend.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::fs;
use std::path::{Path, PathBuf};

use locale_sync_core::{BackendClient, PullEvent, SyncError, pull_translations};
use reqwest::StatusCode;
use serde_json::{Value, json};
use tempfile::TempDir;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> BackendClient {
    let http = reqwest::Client::builder().no_proxy().build().unwrap();
    BackendClient::with_http(http, Url::parse(&server.uri()).unwrap())
}

async fn mount_manifest(server: &MockServer, manifest: Value) {
    Mock::given(method("GET"))
        .and(path("/locales/manifest.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(manifest))
        .expect(1)
        .mount(server)
        .await;
}

async fn mount_bundle(
    server: &MockServer,
    lng: &str,
    ns: &str,
    template: ResponseTemplate,
    hits: u64,
) {
    Mock::given(method("GET"))
        .and(path(format!("/locales/{lng}/{ns}.json")))
        .respond_with(template)
        .expect(hits)
        .mount(server)
        .await;
}

async fn request_paths(server: &MockServer) -> Vec<String> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .map(|request| request.url.path().to_string())
        .collect()
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap()
}

#[tokio::test]
async fn test_pull_writes_every_pair() {
    let server = MockServer::start().await;
    mount_manifest(
        &server,
        json!({"languages": ["en", "de"], "namespaces": ["common"]}),
    )
    .await;
    mount_bundle(
        &server,
        "en",
        "common",
        ResponseTemplate::new(200).set_body_json(json!({"title": "Hi"})),
        1,
    )
    .await;
    mount_bundle(
        &server,
        "de",
        "common",
        ResponseTemplate::new(200).set_body_json(json!({"title": "Hallo"})),
        1,
    )
    .await;

    let out = TempDir::new().unwrap();
    let mut events = Vec::new();
    let report = pull_translations(&client_for(&server), out.path(), |event| {
        events.push(event.clone());
    })
    .await
    .unwrap();

    let en = out.path().join("en").join("common.json");
    let de = out.path().join("de").join("common.json");
    assert_eq!(read(&en), "{\n  \"title\": \"Hi\"\n}\n");
    assert_eq!(read(&de), "{\n  \"title\": \"Hallo\"\n}\n");

    assert_eq!(report.languages, vec!["en", "de"]);
    assert_eq!(report.namespaces, vec!["common"]);
    assert_eq!(report.written, vec![en.clone(), de.clone()]);

    assert_eq!(events.len(), 3);
    assert!(matches!(
        &events[0],
        PullEvent::Manifest { languages: 2, namespaces: 1, .. }
    ));
    assert_eq!(events[1], PullEvent::Wrote(en));
    assert_eq!(events[2], PullEvent::Wrote(de));
}

#[tokio::test]
async fn test_pull_issues_one_request_per_pair_in_manifest_order() {
    let server = MockServer::start().await;
    mount_manifest(
        &server,
        json!({"languages": ["en", "de"], "namespaces": ["common", "errors"]}),
    )
    .await;
    for lng in ["en", "de"] {
        for ns in ["common", "errors"] {
            mount_bundle(
                &server,
                lng,
                ns,
                ResponseTemplate::new(200).set_body_json(json!({"key": format!("{lng}:{ns}")})),
                1,
            )
            .await;
        }
    }

    let out = TempDir::new().unwrap();
    let report = pull_translations(&client_for(&server), out.path(), |_| {})
        .await
        .unwrap();

    assert_eq!(report.written.len(), 4);
    assert_eq!(
        request_paths(&server).await,
        vec![
            "/locales/manifest.json",
            "/locales/en/common.json",
            "/locales/en/errors.json",
            "/locales/de/common.json",
            "/locales/de/errors.json",
        ]
    );
    assert_eq!(
        read(&out.path().join("de").join("errors.json")),
        "{\n  \"key\": \"de:errors\"\n}\n"
    );
}

#[tokio::test]
async fn test_empty_manifest_fetches_no_bundles() {
    for manifest in [
        json!({"languages": [], "namespaces": ["common"]}),
        json!({"languages": ["en"], "namespaces": []}),
    ] {
        let server = MockServer::start().await;
        mount_manifest(&server, manifest.clone()).await;

        let out = TempDir::new().unwrap();
        let root = out.path().join("locales");
        let err = pull_translations(&client_for(&server), &root, |_| {})
            .await
            .unwrap_err();

        assert!(
            matches!(&err, SyncError::ManifestShape { manifest: shown } if *shown == manifest.to_string()),
            "{err}"
        );
        assert_eq!(request_paths(&server).await, vec!["/locales/manifest.json"]);
        assert!(!root.exists());
    }
}

#[tokio::test]
async fn test_manifest_failure_reports_url_and_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/locales/manifest.json"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let out = TempDir::new().unwrap();
    let err = pull_translations(&client_for(&server), out.path(), |_| {})
        .await
        .unwrap_err();

    match &err {
        SyncError::Fetch {
            method,
            url,
            status,
        } => {
            assert_eq!(*method, "GET");
            assert_eq!(*url, format!("{}/locales/manifest.json", server.uri()));
            assert_eq!(*status, StatusCode::NOT_FOUND);
        }
        other => unreachable!("unexpected error: {other}"),
    }
    assert!(err.to_string().contains("404"));
}

#[tokio::test]
async fn test_bundle_failure_aborts_and_keeps_earlier_files() {
    let server = MockServer::start().await;
    mount_manifest(
        &server,
        json!({"languages": ["en", "de"], "namespaces": ["common", "errors"]}),
    )
    .await;
    mount_bundle(
        &server,
        "en",
        "common",
        ResponseTemplate::new(200).set_body_json(json!({"title": "Hi"})),
        1,
    )
    .await;
    mount_bundle(&server, "en", "errors", ResponseTemplate::new(500), 1).await;
    mount_bundle(
        &server,
        "de",
        "common",
        ResponseTemplate::new(200).set_body_json(json!({})),
        0,
    )
    .await;
    mount_bundle(
        &server,
        "de",
        "errors",
        ResponseTemplate::new(200).set_body_json(json!({})),
        0,
    )
    .await;

    let out = TempDir::new().unwrap();
    let mut written: Vec<PathBuf> = Vec::new();
    let err = pull_translations(&client_for(&server), out.path(), |event| {
        if let PullEvent::Wrote(path) = event {
            written.push(path.clone());
        }
    })
    .await
    .unwrap_err();

    assert!(
        matches!(&err, SyncError::Fetch { status, .. } if *status == StatusCode::INTERNAL_SERVER_ERROR),
        "{err}"
    );
    let en_common = out.path().join("en").join("common.json");
    assert_eq!(written, vec![en_common.clone()]);
    assert_eq!(read(&en_common), "{\n  \"title\": \"Hi\"\n}\n");
    assert!(!out.path().join("en").join("errors.json").exists());
    assert!(!out.path().join("de").exists());
}

#[tokio::test]
async fn test_rerun_produces_identical_bytes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/locales/manifest.json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"languages": ["en"], "namespaces": ["common"]})),
        )
        .expect(2)
        .mount(&server)
        .await;
    mount_bundle(
        &server,
        "en",
        "common",
        ResponseTemplate::new(200).set_body_raw(
            r#"{"welcome":"Welcome to i18next","title":"Hello, World!","helloUser":"Hello, {{name}}","nested":{"b":"2","a":"1"}}"#,
            "application/json",
        ),
        2,
    )
    .await;

    let out = TempDir::new().unwrap();
    let client = client_for(&server);
    let target = out.path().join("en").join("common.json");

    pull_translations(&client, out.path(), |_| {}).await.unwrap();
    let first = fs::read(&target).unwrap();
    pull_translations(&client, out.path(), |_| {}).await.unwrap();
    let second = fs::read(&target).unwrap();

    assert_eq!(first, second);
    assert_eq!(
        String::from_utf8(first).unwrap(),
        "{\n  \"welcome\": \"Welcome to i18next\",\n  \"title\": \"Hello, World!\",\n  \"helloUser\": \"Hello, {{name}}\",\n  \"nested\": {\n    \"b\": \"2\",\n    \"a\": \"1\"\n  }\n}\n"
    );
}

#[tokio::test]
async fn test_existing_files_are_overwritten() {
    let server = MockServer::start().await;
    mount_manifest(
        &server,
        json!({"languages": ["en"], "namespaces": ["common"]}),
    )
    .await;
    mount_bundle(
        &server,
        "en",
        "common",
        ResponseTemplate::new(200).set_body_json(json!({"title": "New"})),
        1,
    )
    .await;

    let out = TempDir::new().unwrap();
    let en_dir = out.path().join("en");
    fs::create_dir_all(&en_dir).unwrap();
    fs::write(en_dir.join("common.json"), "{\"title\": \"Old\", \"stale\": true}").unwrap();
    fs::write(en_dir.join("legacy.json"), "{}\n").unwrap();

    pull_translations(&client_for(&server), out.path(), |_| {})
        .await
        .unwrap();

    assert_eq!(read(&en_dir.join("common.json")), "{\n  \"title\": \"New\"\n}\n");
    assert_eq!(read(&en_dir.join("legacy.json")), "{}\n");
}

#[tokio::test]
async fn test_language_and_namespace_are_url_encoded() {
    let server = MockServer::start().await;
    mount_manifest(
        &server,
        json!({"languages": ["pt BR"], "namespaces": ["home page"]}),
    )
    .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"title": "Olá"})))
        .with_priority(10)
        .expect(1)
        .mount(&server)
        .await;

    let out = TempDir::new().unwrap();
    pull_translations(&client_for(&server), out.path(), |_| {})
        .await
        .unwrap();

    assert_eq!(
        request_paths(&server).await,
        vec!["/locales/manifest.json", "/locales/pt%20BR/home%20page.json"]
    );
    assert_eq!(
        read(&out.path().join("pt BR").join("home page.json")),
        "{\n  \"title\": \"Olá\"\n}\n"
    );
}

#[tokio::test]
async fn test_invalid_bundle_json_is_fatal() {
    let server = MockServer::start().await;
    mount_manifest(
        &server,
        json!({"languages": ["en"], "namespaces": ["common"]}),
    )
    .await;
    mount_bundle(
        &server,
        "en",
        "common",
        ResponseTemplate::new(200).set_body_string("<html>not json</html>"),
        1,
    )
    .await;

    let out = TempDir::new().unwrap();
    let err = pull_translations(&client_for(&server), out.path(), |_| {})
        .await
        .unwrap_err();

    assert!(matches!(err, SyncError::Decode { .. }), "{err}");
    assert!(!out.path().join("en").exists());
}
