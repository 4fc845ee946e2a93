//! Storage abstractions for service layer
//!
//! File-backed stores that keep their whole content in memory and rewrite
//! the backing JSON file on every committed change.

pub mod json_list_store;
