//! Environment/runtime helpers
//!
//! Sanity checks on the filesystem layout expected at startup.

use tracing::warn;

/// Check the web root used for frontend component discovery.
///
/// A missing directory is tolerated (no hooks or pages will be found) and only
/// logged; a path that exists but is not a directory is an error.
pub async fn ensure_env(www_dir: &str) -> anyhow::Result<()> {
    match tokio::fs::metadata(www_dir).await {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(anyhow::anyhow!("{www_dir} exists but is not a directory")),
        Err(_) => {
            warn!(%www_dir, "web root not found; no frontend components will be discovered");
            Ok(())
        }
    }
}
