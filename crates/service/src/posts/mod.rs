//! Post operations: list, create, update, delete, like and comment.

pub mod repository;
pub mod service;

pub use repository::PostRepository;
pub use service::PostService;
