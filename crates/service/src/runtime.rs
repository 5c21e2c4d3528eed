//! Runtime environment helpers
//!
//! Thin wrapper around `common::env` to keep binary crates importing
//! `service::runtime::ensure_env` without depending directly on `common`.

/// Check the frontend web root; a missing directory is only logged.
pub async fn ensure_env(www_dir: &str) -> anyhow::Result<()> {
    common::env::ensure_env(www_dir).await
}
