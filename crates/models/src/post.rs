use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::comment::Comment;
use crate::errors::ModelError;
use crate::Fields;

/// Keys owned by the server; client values for them are dropped on create.
const RESERVED: [&str; 5] = ["id", "created_at", "likes", "comments", "image"];

/// A user-submitted post.
///
/// `id` mirrors the post's current index in the store and is rewritten by
/// [`reindex`] after deletions. Anything else the client sent lives in `fields`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Post {
    pub id: usize,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub likes: u64,
    #[serde(default)]
    pub comments: Vec<Comment>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(flatten)]
    pub fields: Fields,
}

/// Like counter mutation requested by a client.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LikeAction {
    Like,
    Unlike,
    /// Any other value; leaves the counter alone.
    Ignore,
}

impl LikeAction {
    pub fn from_value(action: Option<&Value>) -> Self {
        match action.and_then(Value::as_str) {
            Some("like") => Self::Like,
            Some("unlike") => Self::Unlike,
            _ => Self::Ignore,
        }
    }
}

impl Post {
    /// Build a fresh post at position `id`. `image` must already be resolved.
    pub fn new(id: usize, created_at: String, image: Option<String>, mut fields: Fields) -> Self {
        for key in RESERVED {
            fields.remove(key);
        }
        Self { id, created_at, likes: 0, comments: Vec::new(), image, fields }
    }

    /// Shallow merge: every top-level key in `patch` replaces the current value.
    ///
    /// `id` is positional and never taken from the patch. Fails if the merged
    /// object no longer deserializes as a post (e.g. `likes: "many"`), in which
    /// case `self` is left untouched.
    pub fn merge(&mut self, mut patch: Fields) -> Result<(), ModelError> {
        patch.remove("id");
        let mut current = match serde_json::to_value(&*self) {
            Ok(Value::Object(map)) => map,
            Ok(_) => return Err(ModelError::Validation("post did not serialize to an object".into())),
            Err(e) => return Err(ModelError::Validation(e.to_string())),
        };
        current.extend(patch);
        let merged: Post = serde_json::from_value(Value::Object(current))
            .map_err(|e| ModelError::Validation(e.to_string()))?;
        *self = merged;
        Ok(())
    }

    pub fn apply_like(&mut self, action: LikeAction) {
        match action {
            LikeAction::Like => self.likes += 1,
            LikeAction::Unlike => self.likes = self.likes.saturating_sub(1),
            LikeAction::Ignore => {}
        }
    }

    /// Append a comment numbered after the existing ones and return a copy.
    pub fn add_comment(&mut self, timestamp: String, fields: Fields) -> Comment {
        let comment = Comment::new(self.comments.len(), timestamp, fields);
        self.comments.push(comment.clone());
        comment
    }
}

/// Restore the `id == position` invariant.
pub fn reindex(posts: &mut [Post]) {
    for (i, post) in posts.iter_mut().enumerate() {
        post.id = i;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(v: Value) -> Fields {
        match v {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn new_post_ignores_client_owned_keys() {
        let post = Post::new(
            3,
            "2025-06-05 10:00:00".into(),
            None,
            fields(json!({"text": "hi", "id": 99, "likes": 7, "comments": [1], "created_at": "x"})),
        );
        assert_eq!(post.id, 3);
        assert_eq!(post.likes, 0);
        assert!(post.comments.is_empty());
        assert_eq!(post.created_at, "2025-06-05 10:00:00");
        assert_eq!(post.fields.len(), 1);
        assert_eq!(post.fields["text"], "hi");
    }

    #[test]
    fn serializes_flat_with_null_image() {
        let post = Post::new(0, "t".into(), None, fields(json!({"text": "hi"})));
        let v = serde_json::to_value(&post).unwrap();
        assert_eq!(v, json!({"id": 0, "created_at": "t", "likes": 0, "comments": [], "image": null, "text": "hi"}));
    }

    #[test]
    fn merge_overwrites_top_level_keys_only() {
        let mut post = Post::new(0, "t".into(), None, fields(json!({"title": "a", "meta": {"x": 1, "y": 2}})));
        post.merge(fields(json!({"title": "b", "meta": {"x": 5}, "id": 42, "likes": 3}))).unwrap();
        assert_eq!(post.id, 0);
        assert_eq!(post.likes, 3);
        assert_eq!(post.fields["title"], "b");
        assert_eq!(post.fields["meta"], json!({"x": 5}));
    }

    #[test]
    fn merge_rejects_ill_typed_values_and_keeps_post() {
        let mut post = Post::new(0, "t".into(), None, fields(json!({"title": "a"})));
        let before = post.clone();
        let err = post.merge(fields(json!({"likes": "many"}))).unwrap_err();
        assert!(matches!(err, ModelError::Validation(_)));
        assert_eq!(post, before);
    }

    #[test]
    fn unlike_never_goes_negative() {
        let mut post = Post::new(0, "t".into(), None, Fields::new());
        post.apply_like(LikeAction::Unlike);
        assert_eq!(post.likes, 0);
        post.apply_like(LikeAction::Like);
        post.apply_like(LikeAction::Like);
        post.apply_like(LikeAction::Unlike);
        assert_eq!(post.likes, 1);
        post.apply_like(LikeAction::Ignore);
        assert_eq!(post.likes, 1);
    }

    #[test]
    fn like_action_parsing() {
        assert_eq!(LikeAction::from_value(Some(&json!("like"))), LikeAction::Like);
        assert_eq!(LikeAction::from_value(Some(&json!("unlike"))), LikeAction::Unlike);
        assert_eq!(LikeAction::from_value(Some(&json!("LIKE"))), LikeAction::Ignore);
        assert_eq!(LikeAction::from_value(Some(&json!(1))), LikeAction::Ignore);
        assert_eq!(LikeAction::from_value(None), LikeAction::Ignore);
    }

    #[test]
    fn comments_are_numbered_in_order() {
        let mut post = Post::new(0, "t".into(), None, Fields::new());
        let first = post.add_comment("t1".into(), fields(json!({"text": "a", "id": 9})));
        let second = post.add_comment("t2".into(), fields(json!({"text": "b"})));
        assert_eq!(first.id, 0);
        assert_eq!(second.id, 1);
        assert_eq!(post.comments[1].fields["text"], "b");
    }

    #[test]
    fn reindex_matches_positions() {
        let mut posts: Vec<Post> = (0..4)
            .map(|i| Post::new(i, "t".into(), None, fields(json!({"n": i}))))
            .collect();
        posts.remove(1);
        reindex(&mut posts);
        let ids: Vec<usize> = posts.iter().map(|p| p.id).collect();
        let ns: Vec<Value> = posts.iter().map(|p| p.fields["n"].clone()).collect();
        assert_eq!(ids, vec![0, 1, 2]);
        assert_eq!(ns, vec![json!(0), json!(2), json!(3)]);
    }
}
