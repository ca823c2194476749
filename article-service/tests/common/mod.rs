#![allow(dead_code)]

use article_service::config::{
    ArticleConfig, HttpConfig, MongoConfig, StoreBackend, StoreConfig,
};
use article_service::services::{ArticleStore, InMemoryArticleStore};
use article_service::startup::{build_router, AppState, Application};
use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use service_core::config::Config as CoreConfig;
use std::net::Ipv4Addr;
use std::sync::Arc;
use tower::util::ServiceExt;
use uuid::Uuid;

pub const MONGODB_URI: &str = "mongodb://localhost:27017";

pub fn test_config(backend: StoreBackend, database: &str) -> ArticleConfig {
    ArticleConfig {
        common: CoreConfig {
            host: Ipv4Addr::LOCALHOST.into(),
            port: 0, // Random port for testing
        },
        mongodb: MongoConfig {
            uri: MONGODB_URI.to_string(),
            database: database.to_string(),
            collection: "articles".to_string(),
        },
        store: StoreConfig { backend },
        http: HttpConfig {
            request_timeout_secs: 5,
        },
        log_level: "error".to_string(),
        otlp_endpoint: None,
    }
}

/// Router wired to the given store, no listener involved.
pub fn router_with_store(store: Arc<dyn ArticleStore>) -> Router {
    build_router(AppState {
        config: test_config(StoreBackend::Memory, "unused"),
        store,
    })
}

pub fn memory_router() -> Router {
    router_with_store(Arc::new(InMemoryArticleStore::new()))
}

/// Issue one request against the router and decode the JSON response.
pub async fn send(app: &Router, method: Method, uri: &str, body: Option<&str>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

pub async fn create(app: &Router, body: &str) -> String {
    let (status, json) = send(app, Method::POST, "/articles", Some(body)).await;
    assert_eq!(status, StatusCode::CREATED);
    json["id"].as_str().expect("id missing").to_string()
}

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub db_name: String,
}

impl TestApp {
    /// Spawn the real server against a throwaway MongoDB database.
    pub async fn spawn() -> Self {
        let db_name = format!("article_test_{}", Uuid::new_v4());
        let config = test_config(StoreBackend::Mongodb, &db_name);

        let app = Application::build(config)
            .await
            .expect("Failed to build test application");
        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for the server to answer health checks
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
            db_name,
        }
    }

    pub async fn cleanup(&self) {
        if let Ok(client) = mongodb::Client::with_uri_str(MONGODB_URI).await {
            let _ = client.database(&self.db_name).drop(None).await;
        }
    }
}
