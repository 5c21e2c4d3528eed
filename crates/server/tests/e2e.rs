use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use reqwest::StatusCode;
use serde_json::{json, Value};
use service::configuration::domain::ServiceMacro;
use service::configuration::repository::{mock::InMemoryConfigurationRepository, ConfigurationRepository};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use uuid::Uuid;

use server::{routes, startup};

struct TestApp {
    base_url: String,
    www: PathBuf,
}

impl TestApp {
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get(&self, path: &str) -> anyhow::Result<(StatusCode, Value)> {
        let res = reqwest::get(self.url(path)).await?;
        let status = res.status();
        Ok((status, res.json().await?))
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.www);
    }
}

/// Template 1 declares the command and three macros, service 2 inherits from
/// it and overrides WARN, service 3 stands alone, 10 and 11 form a cycle.
fn sample_repo() -> InMemoryConfigurationRepository {
    InMemoryConfigurationRepository::default()
        .with_service(1, Some("$USER1$/check_ping -H $HOSTADDRESS$"), None)
        .with_macro(1, "WARN", "70")
        .with_macro(1, "CRIT", "90")
        .with_service_macro(ServiceMacro::new(1, "SNMP_COMMUNITY", "s3cret").with_password(true))
        .with_service(2, None, Some(1))
        .with_macro(2, "WARN", "80")
        .with_service(3, None, None)
        .with_service(10, None, Some(11))
        .with_service(11, None, Some(10))
}

async fn write_asset(www: &PathBuf, rel: &str) -> anyhow::Result<()> {
    let path = www.join(rel);
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, b"/* asset */").await?;
    Ok(())
}

async fn start_server(repo: InMemoryConfigurationRepository) -> anyhow::Result<TestApp> {
    let www = std::env::temp_dir().join(format!("resolver_e2e_{}", Uuid::new_v4()));
    write_asset(&www, "modules/bam/static/hooks/header/topCounter/index.js").await?;
    write_asset(&www, "modules/bam/static/pages/bam/ba/_id/edit/app.js").await?;

    let mut cfg = configs::AppConfig::default();
    cfg.frontend.www_dir = www.to_string_lossy().into_owned();
    cfg.frontend.installed_modules = vec!["bam".into()];

    let repo: Arc<dyn ConfigurationRepository> = Arc::new(repo);
    let state = startup::build_state(repo, &cfg);
    let app = routes::build_router(state, CorsLayer::very_permissive());

    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            eprintln!("server error: {}", e);
        }
    });

    Ok(TestApp { base_url: format!("http://{}:{}", addr.ip(), addr.port()), www })
}

#[tokio::test]
async fn e2e_public_health() -> anyhow::Result<()> {
    let app = start_server(sample_repo()).await?;
    let (status, body) = app.get("/health").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));
    Ok(())
}

#[tokio::test]
async fn e2e_command_line_resolution() -> anyhow::Result<()> {
    let app = start_server(sample_repo()).await?;

    let (status, body) = app.get("/api/services/2/command-line").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "service_id": 2, "command_line": "$USER1$/check_ping -H $HOSTADDRESS$" }));

    // absent everywhere is a null, not an error
    let (status, body) = app.get("/api/services/3/command-line").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["command_line"], Value::Null);

    let (status, body) = app.get("/api/services/404/command-line").await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 2001);

    let (status, body) = app.get("/api/services/10/command-line").await?;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 2002);
    Ok(())
}

#[tokio::test]
async fn e2e_macros_with_and_without_inheritance() -> anyhow::Result<()> {
    let app = start_server(sample_repo()).await?;

    let (status, body) = app.get("/api/services/2/macros").await?;
    assert_eq!(status, StatusCode::OK);
    let own = body.as_array().cloned().unwrap_or_default();
    assert_eq!(own.len(), 1);
    assert_eq!(own[0]["name"], "WARN");
    assert_eq!(own[0]["value"], "80");

    let (status, body) = app.get("/api/services/2/macros?inheritance=true").await?;
    assert_eq!(status, StatusCode::OK);
    let merged = body.as_array().cloned().unwrap_or_default();
    let by_name = |name: &str| merged.iter().find(|m| m["name"] == name).cloned();
    assert_eq!(merged.len(), 3);
    assert_eq!(by_name("WARN").map(|m| m["value"].clone()), Some(json!("80")));
    assert_eq!(by_name("WARN").map(|m| m["owner_id"].clone()), Some(json!(2)));
    assert_eq!(by_name("CRIT").map(|m| m["value"].clone()), Some(json!("90")));

    let secret = by_name("SNMP_COMMUNITY").unwrap_or_default();
    assert_eq!(secret["is_password"], true);
    assert_eq!(secret["value"], "*****");

    let (status, _) = app.get("/api/services/2/macros?inheritance=false").await?;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.get("/api/services/11/macros?inheritance=true").await?;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Inconsistent Inheritance");
    Ok(())
}

#[tokio::test]
async fn e2e_service_definition() -> anyhow::Result<()> {
    let app = start_server(sample_repo()).await?;

    let (status, body) = app.get("/api/services/2").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], 2);
    assert_eq!(body["template_id"], 1);

    let (status, _) = app.get("/api/services/99").await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let res = reqwest::get(app.url("/api/services/not-a-number")).await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn e2e_store_unavailable_maps_to_503() -> anyhow::Result<()> {
    let repo = sample_repo();
    repo.set_unavailable(true);
    let app = start_server(repo).await?;

    let (status, body) = app.get("/api/services/2/command-line").await?;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["code"], 2100);
    Ok(())
}

#[tokio::test]
async fn e2e_frontend_components() -> anyhow::Result<()> {
    let app = start_server(sample_repo()).await?;

    let (status, body) = app.get("/api/frontend/hooks").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "/header/topCounter": [{ "js": "/modules/bam/static/hooks/header/topCounter/index.js" }] })
    );

    let (status, body) = app.get("/api/frontend/pages").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "/bam/ba/:id/edit": { "js": "/modules/bam/static/pages/bam/ba/_id/edit/app.js" } })
    );
    Ok(())
}
