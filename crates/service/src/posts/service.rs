use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use async_trait::async_trait;
use common::metrics::{record_op, IMAGE_DECODE_FAILURES_TOTAL};
use models::{reindex, timestamp, Comment, Fields, LikeAction, Post};
use serde_json::Value;
use tracing::{info, warn};

use crate::errors::{ImageError, ServiceError};
use crate::file::image_store::ImageStore;
use crate::posts::repository::PostRepository;
use crate::storage::json_list_store::JsonListStore;

/// Posts persisted in a single JSON file, images in an upload directory.
pub struct PostService {
    store: Arc<JsonListStore<Post>>,
    images: ImageStore,
}

impl PostService {
    /// Open (or create) the data file and bind the upload directory.
    pub async fn open<P, U>(data_file: P, upload_dir: U) -> Result<Arc<Self>, ServiceError>
    where
        P: Into<PathBuf>,
        U: Into<PathBuf>,
    {
        let store = JsonListStore::<Post>::new(data_file).await?;
        Ok(Arc::new(Self { store, images: ImageStore::new(upload_dir) }))
    }

    pub fn upload_dir(&self) -> &Path {
        self.images.upload_dir()
    }

    pub async fn list(&self) -> Vec<Post> {
        record_op("list");
        self.store.list().await
    }

    /// Append a new post. Server-owned keys in `fields` are ignored; a non-empty
    /// `image` is stored as a file, or nulled if it cannot be decoded.
    pub async fn create(&self, mut fields: Fields) -> Result<Post, ServiceError> {
        record_op("create");
        let mut posts = self.store.write().await;
        let id = posts.len();

        let image = match fields.remove("image") {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) if s.is_empty() => Some(s),
            Some(raw) => match self.store_image(id, &raw).await {
                Ok(url) => Some(url),
                Err(e) => {
                    image_failed(id, &e);
                    None
                }
            },
        };

        let post = Post::new(id, timestamp::now_display(), image, fields);
        posts.push(post.clone());
        posts.commit().await?;
        info!(post_id = id, "post created");
        Ok(post)
    }

    /// Shallow-merge `patch` into the post at `index`. A `data:` image is stored
    /// as a file once the rest of the patch has merged cleanly; if storing fails
    /// the previous image is kept.
    pub async fn update(&self, index: usize, mut patch: Fields) -> Result<Post, ServiceError> {
        record_op("update");
        let mut posts = self.store.write().await;
        let post = posts.get_mut(index).ok_or_else(|| ServiceError::not_found("Post"))?;

        let has_data_uri = matches!(patch.get("image"), Some(Value::String(s)) if s.starts_with("data:"));
        let data_uri = if has_data_uri { patch.remove("image") } else { None };

        post.merge(patch)?;

        if let Some(Value::String(data_uri)) = data_uri {
            match self.images.save_data_uri(index, &data_uri).await {
                Ok(url) => post.image = Some(url),
                Err(e) => image_failed(index, &e),
            }
        }

        let updated = post.clone();
        posts.commit().await?;
        Ok(updated)
    }

    /// Remove the post at `index` and renumber the rest.
    pub async fn delete(&self, index: usize) -> Result<Post, ServiceError> {
        record_op("delete");
        let removed = self
            .store
            .update(|posts| {
                if index >= posts.len() {
                    return Err(ServiceError::not_found("Post"));
                }
                let removed = posts.remove(index);
                reindex(posts);
                Ok(removed)
            })
            .await?;
        info!(post_id = index, "post deleted");
        Ok(removed)
    }

    pub async fn like(&self, index: usize, action: LikeAction) -> Result<Post, ServiceError> {
        record_op("like");
        self.store
            .update(|posts| {
                let post = posts.get_mut(index).ok_or_else(|| ServiceError::not_found("Post"))?;
                post.apply_like(action);
                Ok(post.clone())
            })
            .await
    }

    pub async fn add_comment(&self, index: usize, fields: Fields) -> Result<Comment, ServiceError> {
        record_op("comment");
        let now = timestamp::now_display();
        self.store
            .update(|posts| {
                let post = posts.get_mut(index).ok_or_else(|| ServiceError::not_found("Post"))?;
                Ok(post.add_comment(now, fields))
            })
            .await
    }

    async fn store_image(&self, post_id: usize, raw: &Value) -> Result<String, ImageError> {
        let data_uri = raw.as_str().ok_or(ImageError::NotAString)?;
        self.images.save_data_uri(post_id, data_uri).await
    }
}

fn image_failed(post_id: usize, error: &ImageError) {
    IMAGE_DECODE_FAILURES_TOTAL.inc();
    warn!(post_id, error = %error, "error saving image");
}

#[async_trait]
impl PostRepository for PostService {
    async fn list(&self) -> Vec<Post> { self.list().await }
    async fn create(&self, fields: Fields) -> Result<Post, ServiceError> { self.create(fields).await }
    async fn update(&self, index: usize, patch: Fields) -> Result<Post, ServiceError> { self.update(index, patch).await }
    async fn delete(&self, index: usize) -> Result<Post, ServiceError> { self.delete(index).await }
    async fn like(&self, index: usize, action: LikeAction) -> Result<Post, ServiceError> { self.like(index, action).await }
    async fn add_comment(&self, index: usize, fields: Fields) -> Result<Comment, ServiceError> { self.add_comment(index, fields).await }
}
