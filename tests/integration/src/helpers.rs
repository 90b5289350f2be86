//! Test helpers for integration tests
//!
//! Provides utilities for spawning test servers, acting as independent
//! browser sessions, and unwrapping the `{success, data}` envelope.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Result;
use apollo_api::{create_app, create_app_state};
use apollo_common::{AppConfig, StorageBackend};
use reqwest::{Client, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use crate::fixtures::{
    AuthData, Envelope, ErrorData, EventData, NonceData, RegisterForm,
};

/// Test server instance that manages lifecycle
pub struct TestServer {
    pub addr: SocketAddr,
    _handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a server on the in-process store
    pub async fn start() -> Result<Self> {
        Self::start_with_config(test_config()).await
    }

    /// Start a test server with custom config
    pub async fn start_with_config(config: AppConfig) -> Result<Self> {
        let state = create_app_state(config).await?;
        let app = create_app(state);

        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = listener.local_addr()?;

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        Ok(Self {
            addr,
            _handle: handle,
        })
    }

    /// Get base URL for the server
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// A fresh browser session with its own cookie jar
    pub fn visitor(&self) -> Result<Visitor> {
        let client = Client::builder()
            .cookie_store(true)
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Visitor {
            base_url: self.base_url(),
            client,
        })
    }

    /// A visitor that has registered and holds a session cookie
    pub async fn signed_in(&self) -> Result<(Visitor, AuthData)> {
        let visitor = self.visitor()?;
        let auth = visitor.register(&RegisterForm::unique()).await?;
        Ok((visitor, auth))
    }
}

/// One browser session
pub struct Visitor {
    base_url: String,
    pub client: Client,
}

impl Visitor {
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Make a GET request
    pub async fn get(&self, path: &str) -> Result<Response> {
        Ok(self.client.get(self.url(path)).send().await?)
    }

    /// Make a form-encoded POST request
    pub async fn post_form<T: Serialize + ?Sized>(&self, path: &str, form: &T) -> Result<Response> {
        Ok(self.client.post(self.url(path)).form(form).send().await?)
    }

    /// Register and keep the session cookie
    pub async fn register(&self, form: &RegisterForm) -> Result<AuthData> {
        let response = self.post_form("/auth/register", form).await?;
        envelope(response, StatusCode::CREATED).await
    }

    /// Fetch a nonce for `action`
    pub async fn nonce(&self, action: &str) -> Result<String> {
        let response = self.get(&format!("/ajax/nonce?action={action}")).await?;
        let data: NonceData = envelope(response, StatusCode::OK).await?;
        Ok(data.nonce)
    }

    /// Create a published listing
    pub async fn create_event(&self, title: &str) -> Result<EventData> {
        self.create_post(title, "event_listing", "publish").await
    }

    /// Create any post type in any status
    pub async fn create_post(&self, title: &str, post_type: &str, status: &str) -> Result<EventData> {
        let nonce = self.nonce("edit_event").await?;
        let response = self
            .post_form(
                "/events",
                &[
                    ("title", title),
                    ("post_type", post_type),
                    ("status", status),
                    ("nonce", nonce.as_str()),
                ],
            )
            .await?;
        envelope(response, StatusCode::CREATED).await
    }

    /// Toggle with a freshly issued nonce
    pub async fn toggle(&self, kind: &str, event_id: i64) -> Result<Response> {
        let nonce = self.nonce("toggle").await?;
        let event_id = event_id.to_string();
        self.post_form(
            &format!("/ajax/toggle/{kind}"),
            &[("event_id", event_id.as_str()), ("nonce", nonce.as_str())],
        )
        .await
    }

    /// Record a view with a freshly issued nonce
    pub async fn view(&self, event_id: i64, kind: &str) -> Result<Response> {
        let nonce = self.nonce("view").await?;
        let event_id = event_id.to_string();
        self.post_form(
            "/ajax/view",
            &[
                ("event_id", event_id.as_str()),
                ("kind", kind),
                ("nonce", nonce.as_str()),
            ],
        )
        .await
    }
}

/// Create a test configuration on the in-process store
pub fn test_config() -> AppConfig {
    let mut config = AppConfig::in_memory("integration-test-secret");
    // Tests fire requests in bursts
    config.rate_limit.burst = 100_000;
    config
}

/// PostgreSQL configuration, when the environment provides one
pub fn postgres_config() -> Option<AppConfig> {
    dotenvy::dotenv().ok();

    let url = std::env::var("DATABASE_URL").ok()?;
    let mut config = test_config();
    config.database.backend = StorageBackend::Postgres;
    config.database.url = Some(url);
    Some(config)
}

/// Assert status, then unwrap a successful envelope
pub async fn envelope<T: DeserializeOwned>(response: Response, expected_status: StatusCode) -> Result<T> {
    let status = response.status();
    let body = response.text().await?;
    if status != expected_status {
        anyhow::bail!("Expected status {expected_status}, got {status}. Body: {body}");
    }

    let envelope: Envelope<T> = serde_json::from_str(&body)?;
    if !envelope.success {
        anyhow::bail!("Expected success envelope. Body: {body}");
    }
    Ok(envelope.data)
}

/// Assert status, then unwrap a failure envelope
pub async fn error_envelope(response: Response, expected_status: StatusCode) -> Result<ErrorData> {
    let status = response.status();
    let body = response.text().await?;
    if status != expected_status {
        anyhow::bail!("Expected status {expected_status}, got {status}. Body: {body}");
    }

    let envelope: Envelope<ErrorData> = serde_json::from_str(&body)?;
    if envelope.success {
        anyhow::bail!("Expected failure envelope. Body: {body}");
    }
    Ok(envelope.data)
}

/// Assert response status without parsing body
pub async fn assert_status(response: Response, expected_status: StatusCode) -> Result<()> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!("Expected status {expected_status}, got {status}. Body: {body}");
    }
    Ok(())
}
