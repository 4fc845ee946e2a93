use async_trait::async_trait;
use models::{Comment, Fields, LikeAction, Post};

use crate::errors::ServiceError;

/// Trait abstraction for the post store.
/// Posts are addressed by their positional index.
#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn list(&self) -> Vec<Post>;
    async fn create(&self, fields: Fields) -> Result<Post, ServiceError>;
    async fn update(&self, index: usize, patch: Fields) -> Result<Post, ServiceError>;
    async fn delete(&self, index: usize) -> Result<Post, ServiceError>;
    async fn like(&self, index: usize, action: LikeAction) -> Result<Post, ServiceError>;
    async fn add_comment(&self, index: usize, fields: Fields) -> Result<Comment, ServiceError>;
}
