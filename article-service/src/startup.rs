//! Application startup and lifecycle management.

use crate::config::{ArticleConfig, StoreBackend};
use crate::handlers;
use crate::services::{ArticleStore, InMemoryArticleStore, MongoArticleStore, MongoDb};
use axum::{middleware, routing::get, Router};
use service_core::error::AppError;
use service_core::middleware::{metrics_middleware, request_id_middleware};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

/// Shared application state. The store handle is built once and cloned
/// into every request.
#[derive(Clone)]
pub struct AppState {
    pub config: ArticleConfig,
    pub store: Arc<dyn ArticleStore>,
}

pub fn build_router(state: AppState) -> Router {
    let request_timeout = Duration::from_secs(state.config.http.request_timeout_secs);

    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .route("/metrics", get(handlers::metrics_endpoint))
        .route(
            "/articles",
            get(handlers::list_articles).post(handlers::create_article),
        )
        .route(
            "/articles/:id",
            get(handlers::get_article)
                .put(handlers::update_article)
                .delete(handlers::delete_article),
        )
        .layer(TimeoutLayer::new(request_timeout))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(request_id_middleware))
        .with_state(state)
}

async fn build_store(config: &ArticleConfig) -> Result<Arc<dyn ArticleStore>, AppError> {
    match config.store.backend {
        StoreBackend::Mongodb => {
            let db = MongoDb::connect(
                &config.mongodb.uri,
                &config.mongodb.database,
                &config.mongodb.collection,
            )
            .await?;

            // Fail at startup rather than on the first request.
            db.health_check().await.map_err(|e| {
                tracing::error!("MongoDB is not reachable: {}", e);
                e
            })?;

            tracing::info!(
                collection = %config.mongodb.collection,
                "Using MongoDB article store"
            );
            Ok(Arc::new(MongoArticleStore::new(db)))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory article store; data will not survive a restart");
            Ok(Arc::new(InMemoryArticleStore::new()))
        }
    }
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    state: AppState,
}

impl Application {
    /// Connect the configured store and bind the HTTP listener.
    pub async fn build(config: ArticleConfig) -> Result<Self, AppError> {
        let store = build_store(&config).await?;

        let state = AppState {
            config: config.clone(),
            store,
        };

        // Port 0 = random port for testing
        let addr = config.common.bind_addr();
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Article service listening on port {}", port);

        Ok(Self {
            port,
            listener,
            state,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        self.run_with_graceful_shutdown(std::future::pending()).await
    }

    /// Serve until `signal` resolves, then drain in-flight requests.
    pub async fn run_with_graceful_shutdown<F>(self, signal: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let app = build_router(self.state);
        axum::serve(self.listener, app)
            .with_graceful_shutdown(signal)
            .await
    }
}
