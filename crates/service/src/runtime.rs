//! Runtime environment helpers
//!
//! Thin wrapper around `common::env` to keep binary crates importing
//! `service::runtime::ensure_env` without depending directly on `common`.

use std::path::Path;

/// Create the upload directory and seed the data file if missing.
pub async fn ensure_env(data_file: &Path, upload_dir: &Path) -> anyhow::Result<()> {
    common::env::ensure_env(data_file, upload_dir).await
}
