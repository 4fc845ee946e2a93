//! Files kept next to the JSON store.

pub mod image_store;
