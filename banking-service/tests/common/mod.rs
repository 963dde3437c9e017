#![allow(dead_code)]

use banking_service::config::{Config, MockDataConfig, ServerConfig};
use banking_service::startup::Application;
use reqwest::{Client, RequestBuilder, Response};
use serde_json::Value;

pub const TEST_TOKEN: &str = "Bearer test-token-123456";

pub const CHECKING_ACCOUNT: &str = "acc-123456789";
pub const PENDING_PAYMENT: &str = "pmt-20260109-001";
pub const PROCESSING_PAYMENT: &str = "pmt-20260109-002";
pub const COMPLETED_PAYMENT: &str = "pmt-20260109-003";
pub const CANCELLED_PAYMENT: &str = "pmt-20260109-004";
pub const FIRST_BENEFICIARY: &str = "ben-20260109-001";
pub const JANUARY_STATEMENT: &str = "stmt-202401-001";

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub client: Client,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with(Config::default()).await
    }

    pub async fn spawn_with(mut config: Config) -> Self {
        config.server = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0, // Random port
        };
        config.mock_data = MockDataConfig { seed: Some(42) };

        let app = Application::build(config)
            .await
            .expect("Failed to build test application");
        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        let client = Client::new();
        for _ in 0..50 {
            if client.get(format!("{}/health", address)).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(20)).await;
        }

        TestApp {
            address,
            port,
            client,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    /// GET with valid credentials.
    pub fn get(&self, path: &str) -> RequestBuilder {
        self.client
            .get(self.url(path))
            .header("Authorization", TEST_TOKEN)
    }

    pub fn post(&self, path: &str, body: &Value) -> RequestBuilder {
        self.client
            .post(self.url(path))
            .header("Authorization", TEST_TOKEN)
            .json(body)
    }

    pub fn put(&self, path: &str, body: &Value) -> RequestBuilder {
        self.client
            .put(self.url(path))
            .header("Authorization", TEST_TOKEN)
            .json(body)
    }

    pub fn delete(&self, path: &str) -> RequestBuilder {
        self.client
            .delete(self.url(path))
            .header("Authorization", TEST_TOKEN)
    }
}

/// Send the request and return the status with the parsed JSON body.
pub async fn send_json(request: RequestBuilder) -> (reqwest::StatusCode, Value) {
    let response: Response = request.send().await.expect("Failed to execute request");
    let status = response.status();
    let body = response.json().await.expect("Failed to parse JSON");
    (status, body)
}

/// Field names listed in a VALIDATION_ERROR body, in order.
pub fn detail_fields(body: &Value) -> Vec<String> {
    body["error"]["details"]
        .as_array()
        .map(|details| {
            details
                .iter()
                .filter_map(|detail| detail["field"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}
