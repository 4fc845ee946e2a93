//! Data types persisted by the post store.
//!
//! Posts and comments carry a handful of typed fields plus whatever extra
//! keys the client sent, kept verbatim in a flattened JSON map.

pub mod errors;
pub mod timestamp;
pub mod comment;
pub mod post;

pub use comment::Comment;
pub use post::{reindex, LikeAction, Post};

/// Free-form JSON object as sent by clients.
pub type Fields = serde_json::Map<String, serde_json::Value>;
