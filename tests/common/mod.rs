#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use reqwest::{Client, StatusCode};
use serde_json::{Value, json};
use tokio::sync::Notify;

use api_studio::config::{Config, GenerationConfig, SyncConfig};
use api_studio::generation::{CompletionRequest, GenerationBackend, GenerationError, GenerationGateway};
use api_studio::models::{EndpointDraft, EndpointRecord, HttpMethod};
use api_studio::state::SharedState;
use api_studio::sync::{SyncBackend, SyncError, SyncGateway};

pub const ENDPOINT_JSON: &str = r#"{
    "name": "List Orders",
    "method": "GET",
    "path": "/orders",
    "description": "Returns the caller's orders.",
    "responseSchema": "{\"type\":\"array\",\"items\":{\"type\":\"object\"}}",
    "exampleResponse": [{ "id": "ord_1", "total": 42 }]
}"#;

/// Scripted completion backend.
///
/// Structured requests (endpoint generation) answer with `endpoint_reply`.
/// Code requests answer with a fenced snippet naming the language, after the
/// delay configured for that language.
pub struct StubGenerator {
    pub endpoint_reply: Mutex<Result<String, String>>,
    pub code_failure: Mutex<Option<String>>,
    pub code_delays: Mutex<Vec<(String, Duration)>>,
    pub calls: AtomicUsize,
    pub prompts: Mutex<Vec<CompletionRequest>>,
}

impl StubGenerator {
    pub fn new() -> Self {
        Self {
            endpoint_reply: Mutex::new(Ok(ENDPOINT_JSON.to_string())),
            code_failure: Mutex::new(None),
            code_delays: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn reply_with(&self, text: &str) {
        *self.endpoint_reply.lock() = Ok(text.to_string());
    }

    pub fn fail_with(&self, message: &str) {
        *self.endpoint_reply.lock() = Err(message.to_string());
        *self.code_failure.lock() = Some(message.to_string());
    }

    pub fn delay_language(&self, language: &str, delay: Duration) {
        self.code_delays.lock().push((language.to_string(), delay));
    }
}

/// Language named in a client code prompt.
pub fn prompt_language(prompt: &str) -> String {
    prompt
        .strip_prefix("Generate a production-ready ")
        .and_then(|rest| rest.split(" client function").next())
        .unwrap_or("unknown")
        .to_string()
}

#[async_trait]
impl GenerationBackend for StubGenerator {
    fn id(&self) -> &str {
        "stub"
    }

    async fn complete(&self, request: CompletionRequest) -> Result<String, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().push(request.clone());

        if request.response_schema.is_some() {
            return self
                .endpoint_reply
                .lock()
                .clone()
                .map_err(GenerationError::Backend);
        }

        if let Some(message) = self.code_failure.lock().clone() {
            return Err(GenerationError::Backend(message));
        }

        let language = prompt_language(&request.prompt);
        let delay = self
            .code_delays
            .lock()
            .iter()
            .find(|(l, _)| *l == language)
            .map(|(_, d)| *d);
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        Ok(format!(
            "```{}\n// {language} client\n```",
            language.to_lowercase()
        ))
    }
}

/// Scripted sync backend. Optionally parks every call until released.
pub struct StubSync {
    pub drafts: Mutex<Vec<EndpointDraft>>,
    pub failure: Mutex<Option<String>>,
    pub gate: Mutex<Option<Arc<Notify>>>,
    pub pushed: Mutex<Vec<(String, Vec<EndpointRecord>)>>,
}

impl StubSync {
    pub fn new() -> Self {
        Self {
            drafts: Mutex::new(vec![draft("Remote A", "/a"), draft("Remote B", "/b")]),
            failure: Mutex::new(None),
            gate: Mutex::new(None),
            pushed: Mutex::new(Vec::new()),
        }
    }

    /// Park subsequent calls until the returned handle is notified.
    pub fn hold(&self) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        *self.gate.lock() = Some(notify.clone());
        notify
    }

    pub fn fail_with(&self, message: &str) {
        *self.failure.lock() = Some(message.to_string());
    }

    async fn wait_gate(&self) {
        let gate = self.gate.lock().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
    }
}

#[async_trait]
impl SyncBackend for StubSync {
    fn id(&self) -> &str {
        "stub"
    }

    async fn fetch(&self, _locator: &str) -> Result<Vec<EndpointDraft>, SyncError> {
        self.wait_gate().await;
        if let Some(message) = self.failure.lock().clone() {
            return Err(SyncError::Backend(message));
        }
        Ok(self.drafts.lock().clone())
    }

    async fn submit(&self, locator: &str, records: &[EndpointRecord]) -> Result<bool, SyncError> {
        self.wait_gate().await;
        if let Some(message) = self.failure.lock().clone() {
            return Err(SyncError::Backend(message));
        }
        self.pushed
            .lock()
            .push((locator.to_string(), records.to_vec()));
        Ok(true)
    }
}

pub fn draft(name: &str, path: &str) -> EndpointDraft {
    EndpointDraft {
        name: name.to_string(),
        method: HttpMethod::Get,
        path: path.to_string(),
        description: format!("{name} endpoint"),
        request_schema: None,
        response_schema: r#"{"type":"object"}"#.to_string(),
        example_response: json!({ "ok": true }),
    }
}

pub fn generation_gateway(backend: Arc<StubGenerator>, timeout: Duration) -> GenerationGateway {
    GenerationGateway::new(backend, "endpoint-model", "code-model", timeout)
}

pub fn sync_gateway(backend: Arc<StubSync>) -> SyncGateway {
    SyncGateway::new(backend, Duration::from_secs(5))
}

pub fn test_config() -> Config {
    Config {
        host: "127.0.0.1".parse().unwrap(),
        port: 0,
        max_body_size: 1_048_576,
        log_level: "warn".to_string(),
        generation: GenerationConfig {
            api_key: None,
            base_url: "http://127.0.0.1:9".to_string(),
            endpoint_model: "endpoint-model".to_string(),
            code_model: "code-model".to_string(),
            timeout: Duration::from_secs(5),
        },
        sync: SyncConfig {
            timeout: Duration::from_secs(5),
            pull_latency: Duration::ZERO,
            push_latency: Duration::ZERO,
        },
    }
}

/// A running test server backed by stub gateways.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    pub state: SharedState,
    pub generator: Arc<StubGenerator>,
    pub sync: Arc<StubSync>,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub async fn get(&self, path: &str) -> (Value, StatusCode) {
        let resp = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("get request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    pub async fn post(&self, path: &str, body: &Value) -> (Value, StatusCode) {
        let resp = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("post request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    pub async fn put(&self, path: &str, body: &Value) -> (Value, StatusCode) {
        let resp = self
            .client
            .put(self.url(path))
            .json(body)
            .send()
            .await
            .expect("put request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    pub async fn delete(&self, path: &str) -> (Value, StatusCode) {
        let resp = self
            .client
            .delete(self.url(path))
            .send()
            .await
            .expect("delete request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    /// Create an endpoint, return the endpoint JSON.
    pub async fn create_endpoint(&self, name: &str, path: &str) -> Value {
        let (body, status) = self
            .post(
                "/api/v1/endpoints",
                &json!({
                    "name": name,
                    "method": "GET",
                    "path": path,
                    "description": "",
                    "responseSchema": "{\"type\":\"object\"}",
                    "exampleResponse": { "ok": true }
                }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "create endpoint failed: {body}");
        body
    }
}

/// Spawn the app on a random port with stub backends.
pub async fn spawn_app() -> TestApp {
    let generator = Arc::new(StubGenerator::new());
    let sync = Arc::new(StubSync::new());

    let (app, state) = api_studio::build_app_with(test_config(), generator.clone(), sync.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server failed");
    });

    TestApp {
        addr,
        client: Client::new(),
        state,
        generator,
        sync,
    }
}
