//! Nightfall Engine - Main entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::{HeaderValue, Method};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use nightfall_engine::api::{self, AppState, ConnectionManager};
use nightfall_engine::app::{GameEngine, Repositories};
use nightfall_engine::content::{StaticContent, WorldSeeder};
use nightfall_engine::infrastructure::{
    clock::{SystemClock, SystemRandom},
    config::EngineConfig,
    memory::InMemoryStore,
    ports::ContentRepo,
    sqlite::SqliteStore,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment from repo root (the engine may run from `crates/engine`).
    load_dotenv_from_repo_root();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "nightfall_engine=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Nightfall Engine");

    let config = EngineConfig::from_env();
    let content: Arc<dyn ContentRepo> = Arc::new(StaticContent::haven());

    let repos = match &config.database_url {
        Some(url) => {
            tracing::info!(database = %url, "Using SQLite store");
            Repositories::from_store(Arc::new(SqliteStore::connect(url).await?), content)
        }
        None => {
            tracing::warn!("NIGHTFALL_DATABASE_URL not set, world state will not survive a restart");
            Repositories::from_store(Arc::new(InMemoryStore::new()), content)
        }
    };

    if config.seed_world {
        WorldSeeder::new(repos.rooms.clone(), repos.mobs.clone(), repos.items.clone())
            .seed_if_empty()
            .await?;
    }

    let connections = Arc::new(ConnectionManager::new(repos.characters.clone()));
    let engine = Arc::new(GameEngine::new(
        repos,
        connections.clone(),
        Arc::new(SystemClock::new()),
        Arc::new(SystemRandom::new()),
        &config,
    ));
    let _scheduler = engine.spawn_combat_scheduler();
    tracing::info!(tick_ms = config.combat_tick.as_millis() as u64, "Combat scheduler started");

    let state = Arc::new(AppState {
        engine,
        connections,
    });

    let mut router = api::router(state).layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()));
    if let Some(cors) = build_cors_layer(config.cors_allowed_origins.as_deref()) {
        router = router.layer(cors);
    }

    let addr: SocketAddr = config.bind_addr().parse()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}

fn load_dotenv_from_repo_root() {
    let repo_root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..");

    // Prefer local overrides.
    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}

fn build_cors_layer(allowed_origins: Option<&str>) -> Option<CorsLayer> {
    let allowed_origins = allowed_origins?.trim();

    let mut cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([axum::http::header::CONTENT_TYPE]);

    if allowed_origins == "*" {
        cors = cors.allow_origin(Any);
    } else {
        let origins: Vec<HeaderValue> = allowed_origins
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .filter_map(|s| HeaderValue::from_str(s).ok())
            .collect();

        if origins.is_empty() {
            return None;
        }

        cors = cors.allow_origin(origins);
    }

    Some(cors)
}
