pub mod config;
pub mod error;
pub mod generator;
pub mod models;
pub mod routes;
pub mod services;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::generator::GeminiGenerator;
use crate::services::quiz::QuizService;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub quiz: QuizService,
}

/// Build the router with all routes.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/quiz", get(routes::quiz::current))
        .route("/api/quiz/answer", post(routes::quiz::answer))
        .route("/api/quiz/next", post(routes::quiz::next))
        .route("/api/quiz/restart", post(routes::quiz::restart))
        .with_state(state)
}

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    if config.api_key.is_none() {
        tracing::warn!("GEMINI_API_KEY not set; the quiz will run on fallback cards");
    }

    tracing::info!("Using generator model {}", config.model);
    let generator = GeminiGenerator::new(&config)?;
    let quiz = QuizService::new(Arc::new(generator), config.batch_size);
    quiz.start();

    let router = app(AppState { quiz })
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr = config.bind_addr();
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}

async fn health_check() -> &'static str {
    "OK"
}
