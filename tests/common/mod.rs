#![allow(dead_code)]

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde_json::{json, Value};

use student_api::config::PaginationConfig;
use student_api::database::StudentStore;
use student_api::testing::MemoryStudentStore;
use student_api::AppState;

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    pub store: Arc<MemoryStudentStore>,
    pub client: reqwest::Client,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            if let Ok(resp) = self.client.get(self.url("/api")).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }
}

/// Serve the router on a free port, backed by an in-memory store.
///
/// The server runs on the calling test's runtime and stops with it.
pub async fn spawn_server() -> Result<TestServer> {
    spawn_with_store(MemoryStudentStore::new()).await
}

pub async fn spawn_with_store(store: MemoryStudentStore) -> Result<TestServer> {
    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let base_url = format!("http://127.0.0.1:{}", port);

    let store = Arc::new(store);
    let state = AppState::new(
        store.clone() as Arc<dyn StudentStore>,
        PaginationConfig::default(),
    );
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
        .await
        .with_context(|| format!("failed to bind port {}", port))?;

    tokio::spawn(async move {
        let _ = axum::serve(listener, student_api::app(state)).await;
    });

    let server = TestServer {
        port,
        base_url,
        store,
        client: reqwest::Client::new(),
    };
    server.wait_ready(Duration::from_secs(5)).await?;
    Ok(server)
}

/// A complete create payload with no optional fields
pub fn student_payload(student_id: &str) -> Value {
    json!({
        "student_id": student_id,
        "name": "Asha Rao",
        "date_of_birth": "2010-04-12",
        "guardian_name": "Meera Rao",
        "ph_no": 9876543210u64
    })
}

pub async fn create(server: &TestServer, payload: &Value) -> Result<reqwest::Response> {
    Ok(server
        .client
        .post(server.url("/api/students"))
        .json(payload)
        .send()
        .await?)
}
