//! Service layer for the post board.
//! - `storage`: JSON-file backed list store with write-through commits.
//! - `file`: upload directory handling for inline images.
//! - `posts`: the post operations exposed over HTTP.

pub mod errors;
pub mod runtime;
pub mod storage;
pub mod file;
pub mod posts;
