//! Discussion board models: posts, comments, replies and their likes

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Outcome of toggling a like
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LikeState {
    Liked,
    Unliked,
}

/// The set of users who liked a post, comment or reply.
///
/// Order of first like is preserved; a user appears at most once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LikeSet(Vec<Uuid>);

impl LikeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from stored ids, dropping duplicates
    pub fn from_ids(ids: impl IntoIterator<Item = Uuid>) -> Self {
        let mut set = Self::new();
        for id in ids {
            if !set.contains(id) {
                set.0.push(id);
            }
        }
        set
    }

    pub fn contains(&self, user_id: Uuid) -> bool {
        self.0.contains(&user_id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Like if the user has not liked yet, otherwise take the like back
    pub fn toggle(&mut self, user_id: Uuid) -> LikeState {
        match self.0.iter().position(|id| *id == user_id) {
            Some(index) => {
                self.0.remove(index);
                LikeState::Unliked
            }
            None => {
                self.0.push(user_id);
                LikeState::Liked
            }
        }
    }

    pub fn as_slice(&self) -> &[Uuid] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<Uuid> {
        self.0
    }
}

/// Public author details embedded in discussion responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reply {
    pub id: Uuid,
    pub post: Uuid,
    pub comment: Uuid,
    pub content: String,
    pub author: Uuid,
    pub likes: LikeSet,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: Uuid,
    pub post: Uuid,
    pub content: String,
    pub author: Uuid,
    pub likes: LikeSet,
    pub created_at: DateTime<Utc>,
}

/// A comment with its replies, oldest first
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentThread {
    #[serde(flatten)]
    pub comment: Comment,
    pub replies: Vec<Reply>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub author: Uuid,
    pub likes: LikeSet,
    pub created_at: DateTime<Utc>,
}

/// Post listing entry: author details and top-level comments
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostSummary {
    #[serde(flatten)]
    pub post: Post,
    pub author_details: Option<AuthorSummary>,
    pub comments: Vec<Comment>,
}

/// Full post view with every comment thread
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDetail {
    #[serde(flatten)]
    pub post: Post,
    pub author_details: Option<AuthorSummary>,
    pub comments: Vec<CommentThread>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_adds_then_removes() {
        let user = Uuid::new_v4();
        let mut likes = LikeSet::new();

        assert_eq!(likes.toggle(user), LikeState::Liked);
        assert!(likes.contains(user));
        assert_eq!(likes.len(), 1);

        assert_eq!(likes.toggle(user), LikeState::Unliked);
        assert!(likes.is_empty());
    }

    #[test]
    fn toggle_only_touches_the_given_user() {
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let mut likes = LikeSet::from_ids([a, b]);

        likes.toggle(a);
        assert_eq!(likes.as_slice(), &[b]);
    }

    #[test]
    fn from_ids_drops_duplicates() {
        let a = Uuid::new_v4();
        let likes = LikeSet::from_ids([a, a, a]);
        assert_eq!(likes.len(), 1);
    }

    #[test]
    fn like_set_serializes_as_plain_array() {
        let a = Uuid::nil();
        let json = serde_json::to_string(&LikeSet::from_ids([a])).unwrap();
        assert_eq!(json, format!("[\"{}\"]", a));
    }
}
