//! Environment/runtime helpers
//!
//! Sanity checks to ensure expected directories and files exist at startup.

use std::path::Path;

use tracing::info;

/// Ensure the upload directory and the data file's parent exist, and seed the
/// data file with an empty JSON array if it is missing.
pub async fn ensure_env(data_file: &Path, upload_dir: &Path) -> anyhow::Result<()> {
    tokio::fs::create_dir_all(upload_dir)
        .await
        .map_err(|e| anyhow::anyhow!("cannot create {}: {e}", upload_dir.display()))?;

    if let Some(parent) = data_file.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| anyhow::anyhow!("cannot create {}: {e}", parent.display()))?;
    }

    match tokio::fs::metadata(data_file).await {
        Ok(_) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tokio::fs::write(data_file, b"[]")
                .await
                .map_err(|e| anyhow::anyhow!("cannot initialize {}: {e}", data_file.display()))?;
            info!(data_file = %data_file.display(), "initialized empty post store");
        }
        Err(e) => anyhow::bail!("cannot stat {}: {e}", data_file.display()),
    }
    Ok(())
}
