use std::net::SocketAddr;
use std::path::PathBuf;

use configs::AppConfig;
use reqwest::StatusCode as HttpStatusCode;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use uuid::Uuid;

struct TestApp {
    base_url: String,
    root: PathBuf,
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.root);
    }
}

async fn start_server() -> anyhow::Result<TestApp> {
    // isolated store per test, created by the app itself
    let root = std::env::temp_dir()
        .join(format!("doc_store_e2e_{}", Uuid::new_v4()))
        .join("uploads");
    let mut cfg = AppConfig::default();
    cfg.storage.root = root.clone();

    let app = server::build_app(&cfg).await?;
    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    let base_url = format!("http://{}:{}", addr.ip(), addr.port());

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await { eprintln!("server error: {}", e); }
    });

    Ok(TestApp { base_url, root: root.parent().map(PathBuf::from).unwrap_or(root) })
}

#[tokio::test]
async fn e2e_store_directory_created_on_start() -> anyhow::Result<()> {
    let app = start_server().await?;
    assert!(app.root.join("uploads").is_dir());

    let res = reqwest::get(format!("{}/", app.base_url)).await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert!(res.text().await?.contains("running"));
    Ok(())
}

#[tokio::test]
async fn e2e_korean_document_round_trip() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = reqwest::Client::new();

    let res = c
        .post(format!("{}/upload", app.base_url))
        .json(&json!({"filename": "전일근무.json", "content": {"a": 1}}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert_eq!(res.json::<Value>().await?, json!({"ok": true, "saved": "전일근무.json"}));

    // reqwest percent-encodes the non-ASCII path
    let res = c.get(format!("{}/download/전일근무.json", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert_eq!(res.json::<Value>().await?, json!({"a": 1}));

    let res = c.get(format!("{}/list", app.base_url)).send().await?;
    let body = res.json::<Value>().await?;
    assert_eq!(body, json!({"files": ["전일근무.json"]}));

    // stored on disk unescaped
    let raw = std::fs::read_to_string(app.root.join("uploads").join("전일근무.json"))?;
    assert!(raw.contains("\"a\": 1"));
    Ok(())
}

#[tokio::test]
async fn e2e_traversal_does_not_escape_root() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = reqwest::Client::new()
        .post(format!("{}/upload", app.base_url))
        .json(&json!({"filename": "../escaped.json", "content": {"pwned": true}}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);
    assert!(!app.root.join("escaped.json").exists());
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn e2e_concurrent_uploads_to_distinct_names() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = reqwest::Client::new();

    let mut handles = Vec::new();
    for i in 0..16 {
        let (c, url) = (c.clone(), format!("{}/upload", app.base_url));
        handles.push(tokio::spawn(async move {
            c.post(url)
                .json(&json!({"filename": format!("doc-{i:02}.json"), "content": {"i": i}}))
                .send()
                .await
                .map(|r| r.status())
        }));
    }
    for h in handles {
        assert_eq!(h.await??, HttpStatusCode::OK);
    }

    let body = c.get(format!("{}/list", app.base_url)).send().await?.json::<Value>().await?;
    assert_eq!(body["files"].as_array().map(Vec::len), Some(16));
    for i in 0..16 {
        let v = c
            .get(format!("{}/download/doc-{i:02}.json", app.base_url))
            .send()
            .await?
            .json::<Value>()
            .await?;
        assert_eq!(v, json!({"i": i}));
    }
    Ok(())
}
