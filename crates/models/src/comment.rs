use serde::{Deserialize, Serialize};

use crate::Fields;

/// A reply attached to a post. `id` is its position within the post's comments.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Comment {
    pub id: usize,
    pub timestamp: String,
    #[serde(flatten)]
    pub fields: Fields,
}

impl Comment {
    pub fn new(id: usize, timestamp: String, mut fields: Fields) -> Self {
        fields.remove("id");
        fields.remove("timestamp");
        Self { id, timestamp, fields }
    }
}
