// src/test_support.rs
//! Shared fixtures for unit and router tests

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

use crate::common::config::AppConfig;
use crate::common::AppState;
use crate::services::graphql::{Credential, GraphqlError, GraphqlRequest, GraphqlTransport};

pub const TEST_JWT_SECRET: &str = "test-secret-for-unit-tests";
pub const TEST_CHAPA_SECRET: &str = "CHASECK_TEST-gateway-secret";

type Responder = dyn Fn(&GraphqlRequest) -> Result<Value, GraphqlError> + Send + Sync;

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub credential: Credential,
    pub request: GraphqlRequest,
}

/// In-memory transport that records every call and answers from a closure
pub struct FakeTransport {
    calls: Mutex<Vec<RecordedCall>>,
    responder: Box<Responder>,
}

impl FakeTransport {
    pub fn new<F>(responder: F) -> Arc<Self>
    where
        F: Fn(&GraphqlRequest) -> Result<Value, GraphqlError> + Send + Sync + 'static,
    {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            responder: Box::new(responder),
        })
    }

    /// A transport that must never be reached
    pub fn unreachable() -> Arc<Self> {
        Self::new(|request| panic!("unexpected GraphQL call: {}", request.query))
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn mutation_count(&self) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|call| call.request.is_mutation())
            .count()
    }
}

#[async_trait]
impl GraphqlTransport for FakeTransport {
    async fn execute(
        &self,
        credential: &Credential,
        request: &GraphqlRequest,
    ) -> Result<Value, GraphqlError> {
        self.calls.lock().unwrap().push(RecordedCall {
            credential: credential.clone(),
            request: request.clone(),
        });
        (self.responder)(request)
    }
}

fn config_with(upload_dir: &Path, extra: &[(&'static str, String)]) -> AppConfig {
    let mut vars: HashMap<&str, String> = HashMap::from([
        ("JWT_SECRET", TEST_JWT_SECRET.to_string()),
        ("HASURA_ADMIN_SECRET", "admin-secret".to_string()),
        ("BCRYPT_COST", "4".to_string()),
        ("UPLOAD_DIR", upload_dir.display().to_string()),
    ]);
    vars.extend(extra.iter().cloned());
    AppConfig::from_lookup(|key| vars.get(key).cloned())
}

pub fn test_config(upload_dir: &Path) -> AppConfig {
    config_with(upload_dir, &[])
}

/// Outbound client that never routes loopback traffic through a proxy
pub fn local_client() -> Client {
    Client::builder().no_proxy().build().unwrap()
}

pub fn test_state(upload_dir: &Path, transport: Arc<FakeTransport>) -> Arc<AppState> {
    Arc::new(AppState::with_transport(
        test_config(upload_dir),
        Client::new(),
        transport,
    ))
}

/// State whose payment gateway points at `gateway_url`
pub fn test_state_with_gateway(
    upload_dir: &Path,
    transport: Arc<FakeTransport>,
    gateway_url: &str,
) -> Arc<AppState> {
    let config = config_with(
        upload_dir,
        &[
            ("CHAPA_SECRET_KEY", TEST_CHAPA_SECRET.to_string()),
            ("CHAPA_BASE_URL", gateway_url.to_string()),
            ("CHAPA_CALLBACK_URL", "https://api.test/payments/callback".to_string()),
            ("CHAPA_RETURN_URL", "https://app.test/payments/done".to_string()),
        ],
    );
    Arc::new(AppState::with_transport(config, local_client(), transport))
}

// ============================================================================
// PAYMENT GATEWAY STUB
// ============================================================================

/// One HTTP request as it arrived at [`StubGateway`]
#[derive(Debug)]
pub struct CapturedRequest {
    pub head: String,
    pub body: Vec<u8>,
}

impl CapturedRequest {
    pub fn request_line(&self) -> &str {
        self.head.lines().next().unwrap_or_default()
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.head.lines().skip(1).find_map(|line| {
            let (key, value) = line.split_once(':')?;
            key.trim()
                .eq_ignore_ascii_case(name)
                .then(|| value.trim())
        })
    }

    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap()
    }
}

/// Loopback HTTP server that accepts a single request and answers it with a
/// canned JSON reply
pub struct StubGateway {
    pub base_url: String,
    captured: JoinHandle<CapturedRequest>,
}

impl StubGateway {
    pub async fn reply(status: u16, body: Value) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());

        let captured = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let request = read_request(&mut socket).await;

            let body = body.to_string();
            let reply = format!(
                "HTTP/1.1 {} Stub\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(reply.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
            request
        });

        Self { base_url, captured }
    }

    /// Waits for the request the gateway received.
    pub async fn request(self) -> CapturedRequest {
        self.captured.await.unwrap()
    }
}

async fn read_request(socket: &mut TcpStream) -> CapturedRequest {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    loop {
        let n = socket.read(&mut chunk).await.unwrap();
        assert!(n > 0, "client closed before sending a full request");
        buf.extend_from_slice(&chunk[..n]);

        let Some(head_end) = buf.windows(4).position(|w| w == b"\r\n\r\n") else {
            continue;
        };
        let head = String::from_utf8_lossy(&buf[..head_end]).into_owned();
        let body_start = head_end + 4;
        let content_length = head
            .lines()
            .filter_map(|line| line.split_once(':'))
            .find(|(key, _)| key.trim().eq_ignore_ascii_case("content-length"))
            .and_then(|(_, value)| value.trim().parse::<usize>().ok())
            .unwrap_or(0);

        if buf.len() >= body_start + content_length {
            return CapturedRequest {
                head,
                body: buf[body_start..body_start + content_length].to_vec(),
            };
        }
    }
}
