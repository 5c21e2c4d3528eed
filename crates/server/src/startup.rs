use std::{env, net::SocketAddr, sync::Arc};

use axum::Router;
use configs::AppConfig;
use dotenvy::dotenv;
use migration::MigratorTrait;
use sea_orm::DatabaseConnection;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::errors::StartupError;
use crate::routes;
use crate::state::ServerState;
use service::{
    configuration::{
        repo::seaorm::SeaOrmConfigurationRepository, repository::ConfigurationRepository, ConfigurationResolver,
        ResolverOptions,
    },
    frontend::{FrontendComponentService, InstalledModules},
    runtime,
};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Load the file named by `CONFIG_PATH` (default `config.toml`).
fn load_config() -> Result<AppConfig, StartupError> {
    let path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    load_config_from(&path)
}

/// A missing file falls back to defaults plus env vars; a present but
/// invalid file is an error.
fn load_config_from(path: &str) -> Result<AppConfig, StartupError> {
    let mut cfg = match configs::load_from_file(path) {
        Ok(cfg) => cfg,
        Err(e) if is_missing_file(&e) => {
            warn!(%path, "config file not found; using defaults and environment");
            let cfg = env_fallback();
            if env::var("DATABASE_URL").is_err() {
                // models::db::connect falls back to its built-in URL
                return Ok(cfg);
            }
            cfg
        }
        Err(e) => return Err(StartupError::InvalidConfig(format!("{path}: {e}"))),
    };
    cfg.normalize_and_validate()
        .map_err(|e| StartupError::InvalidConfig(format!("{path}: {e}")))?;
    Ok(cfg)
}

fn is_missing_file(e: &anyhow::Error) -> bool {
    e.downcast_ref::<std::io::Error>()
        .is_some_and(|io| io.kind() == std::io::ErrorKind::NotFound)
}

fn env_fallback() -> AppConfig {
    let mut cfg = AppConfig::default();
    if let Ok(host) = env::var("SERVER_HOST") {
        cfg.server.host = host;
    }
    if let Some(port) = env::var("SERVER_PORT").ok().and_then(|p| p.parse::<u16>().ok()) {
        cfg.server.port = port;
    }
    if let Ok(www) = env::var("WWW_DIR") {
        cfg.frontend.www_dir = www;
    }
    cfg
}

fn bind_addr(cfg: &AppConfig) -> Result<SocketAddr, StartupError> {
    format!("{}:{}", cfg.server.host, cfg.server.port)
        .parse()
        .map_err(|e| StartupError::InvalidConfig(format!("server address: {e}")))
}

async fn connect(cfg: &AppConfig) -> anyhow::Result<DatabaseConnection> {
    let db = if cfg.database.url.trim().is_empty() {
        models::db::connect().await?
    } else {
        models::db::connect_with_config(&cfg.database).await?
    };
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

/// Wire the resolver and frontend discovery into shared handler state.
pub fn build_state(repo: Arc<dyn ConfigurationRepository>, cfg: &AppConfig) -> ServerState {
    let resolver = ConfigurationResolver::new(repo, ResolverOptions::from(&cfg.resolver));
    let modules = InstalledModules::new(cfg.frontend.installed_modules.iter().cloned());
    ServerState {
        resolver: Arc::new(resolver),
        frontend: Arc::new(FrontendComponentService::new(&cfg.frontend.www_dir, modules)),
    }
}

/// Public entry: build the app and run the HTTP server
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();

    let cfg = load_config()?;
    runtime::ensure_env(&cfg.frontend.www_dir)
        .await
        .map_err(|e| StartupError::Runtime(e.to_string()))?;

    let db = connect(&cfg).await?;
    let repo: Arc<dyn ConfigurationRepository> = Arc::new(SeaOrmConfigurationRepository { db });
    let state = build_state(repo, &cfg);

    let app: Router = routes::build_router(state, build_cors());

    let addr = bind_addr(&cfg)?;
    info!(
        %addr,
        max_depth = cfg.resolver.max_inheritance_depth,
        modules = cfg.frontend.installed_modules.len(),
        "starting resolver http server"
    );
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
