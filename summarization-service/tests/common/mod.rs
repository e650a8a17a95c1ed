#![allow(dead_code)]

use secrecy::Secret;
use serde_json::Value;
use service_core::config::Config as CommonConfig;
use std::sync::Arc;
use summarization_service::config::{
    AuthConfig, Backend, CredentialsConfig, HttpConfig, ModelConfig, SummarizationConfig,
    TokenStrategy,
};
use summarization_service::services::{init_metrics, MockGateway, ModelGateway};
use summarization_service::startup::Application;

pub const TEST_CLIENT_SECRET: &str = "integration-secret";

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub client: reqwest::Client,
    /// Present when the app runs on a mock gateway.
    pub gateway: Option<Arc<MockGateway>>,
}

pub fn test_config() -> SummarizationConfig {
    SummarizationConfig {
        common: CommonConfig { port: 0 }, // Random port
        auth: AuthConfig {
            client_secret: Secret::new(TEST_CLIENT_SECRET.to_string()),
        },
        model: ModelConfig {
            backend: Backend::Mock,
            project: "test-project".to_string(),
            region: "us-central1".to_string(),
            model: "gemini-1.5-flash".to_string(),
            api_base: None,
        },
        credentials: CredentialsConfig {
            token_strategy: TokenStrategy::Static,
            metadata_server_url: "http://127.0.0.1:9".to_string(),
            access_token: Secret::new("test-token".to_string()),
            api_key: Secret::new(String::new()),
        },
        http: HttpConfig {
            allowed_origins: Vec::new(),
            max_body_bytes: 10 * 1024 * 1024,
        },
    }
}

impl TestApp {
    /// Spawn with a gateway that echoes the prompt back.
    pub async fn spawn() -> Self {
        Self::spawn_with_gateway(MockGateway::echo()).await
    }

    pub async fn spawn_with_gateway(gateway: MockGateway) -> Self {
        let gateway = Arc::new(gateway);
        let shared: Arc<dyn ModelGateway> = gateway.clone();

        let app = Application::build_with_gateway(test_config(), shared)
            .await
            .expect("Failed to build test application");

        let mut test_app = Self::launch(app).await;
        test_app.gateway = Some(gateway);
        test_app
    }

    /// Spawn through the regular startup path, gateway chosen by `config`.
    pub async fn spawn_with_config(config: SummarizationConfig) -> Self {
        let app = Application::build(config)
            .await
            .expect("Failed to build test application");

        Self::launch(app).await
    }

    async fn launch(app: Application) -> Self {
        init_metrics();

        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for HTTP server to be ready by polling health endpoint
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            port,
            client,
            gateway: None,
        }
    }

    pub async fn post_json(&self, path: &str, body: &Value) -> reqwest::Response {
        self.client
            .post(format!("{}{}", self.address, path))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn post_raw(&self, path: &str, body: &'static str) -> reqwest::Response {
        self.client
            .post(format!("{}{}", self.address, path))
            .header("content-type", "application/json")
            .body(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub fn mock(&self) -> &MockGateway {
        self.gateway
            .as_deref()
            .expect("Test app was not spawned with a mock gateway")
    }
}
