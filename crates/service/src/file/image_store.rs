use std::path::{Path, PathBuf};

use base64::{engine::general_purpose::STANDARD, Engine as _};
use tokio::fs;
use tracing::debug;

use crate::errors::ImageError;

/// URL prefix under which the upload directory is served.
pub const UPLOAD_ROUTE: &str = "/api/uploads";

/// Writes inline (data URI) images into the upload directory.
#[derive(Clone, Debug)]
pub struct ImageStore {
    upload_dir: PathBuf,
}

impl ImageStore {
    pub fn new<P: Into<PathBuf>>(upload_dir: P) -> Self {
        Self { upload_dir: upload_dir.into() }
    }

    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    /// Decode the base64 payload following the first comma of a data URI.
    /// The media type before the comma is not inspected.
    pub fn decode_data_uri(data_uri: &str) -> Result<Vec<u8>, ImageError> {
        let (_, payload) = data_uri.split_once(',').ok_or(ImageError::MissingPayload)?;
        let compact: String = payload.chars().filter(|c| !c.is_ascii_whitespace()).collect();
        Ok(STANDARD.decode(compact)?)
    }

    /// `post_<id>_<YYYYMMDD_HHMMSS>.jpg`, whatever the real format is.
    pub fn filename_for(post_id: usize, stamp: &str) -> String {
        format!("post_{post_id}_{stamp}.jpg")
    }

    pub fn url_for(filename: &str) -> String {
        format!("{UPLOAD_ROUTE}/{filename}")
    }

    /// Decode `data_uri`, write it for `post_id` and return the URL it is served at.
    pub async fn save_data_uri(&self, post_id: usize, data_uri: &str) -> Result<String, ImageError> {
        let bytes = Self::decode_data_uri(data_uri)?;
        let filename = Self::filename_for(post_id, &models::timestamp::now_compact());
        fs::create_dir_all(&self.upload_dir).await?;
        fs::write(self.upload_dir.join(&filename), &bytes).await?;
        debug!(post_id, %filename, size = bytes.len(), "stored uploaded image");
        Ok(Self::url_for(&filename))
    }
}
