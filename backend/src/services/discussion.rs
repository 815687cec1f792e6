//! Discussion board service: posts, comments, replies and likes

use chrono::{DateTime, Utc};
use shared::{
    validate_content, AuthorSummary, Comment, CommentThread, LikeSet, LikeState, Post,
    PostDetail, PostSummary, Reply,
};
use sqlx::PgPool;
use std::collections::HashMap;
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Discussion service
#[derive(Clone)]
pub struct DiscussionService {
    db: PgPool,
}

/// Anything that can be liked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeTarget {
    Post,
    Comment,
    Reply,
}

impl LikeTarget {
    fn table(self) -> &'static str {
        match self {
            LikeTarget::Post => "posts",
            LikeTarget::Comment => "comments",
            LikeTarget::Reply => "replies",
        }
    }

    fn resource(self) -> &'static str {
        match self {
            LikeTarget::Post => "Post",
            LikeTarget::Comment => "Comment",
            LikeTarget::Reply => "Reply",
        }
    }
}

/// Result of a like toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LikeUpdate {
    pub state: LikeState,
    pub likes: usize,
}

#[derive(Debug, sqlx::FromRow)]
struct PostRow {
    id: Uuid,
    title: String,
    content: String,
    author: Uuid,
    likes: Vec<Uuid>,
    created_at: DateTime<Utc>,
    author_name: Option<String>,
    author_email: Option<String>,
}

impl PostRow {
    fn split(self) -> (Post, Option<AuthorSummary>) {
        let author = match (self.author_name, self.author_email) {
            (Some(name), Some(email)) => Some(AuthorSummary {
                id: self.author,
                name,
                email,
            }),
            _ => None,
        };
        let post = Post {
            id: self.id,
            title: self.title,
            content: self.content,
            author: self.author,
            likes: LikeSet::from_ids(self.likes),
            created_at: self.created_at,
        };
        (post, author)
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CommentRow {
    id: Uuid,
    post: Uuid,
    content: String,
    author: Uuid,
    likes: Vec<Uuid>,
    created_at: DateTime<Utc>,
}

impl From<CommentRow> for Comment {
    fn from(row: CommentRow) -> Self {
        Comment {
            id: row.id,
            post: row.post,
            content: row.content,
            author: row.author,
            likes: LikeSet::from_ids(row.likes),
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ReplyRow {
    id: Uuid,
    post: Uuid,
    comment: Uuid,
    content: String,
    author: Uuid,
    likes: Vec<Uuid>,
    created_at: DateTime<Utc>,
}

impl From<ReplyRow> for Reply {
    fn from(row: ReplyRow) -> Self {
        Reply {
            id: row.id,
            post: row.post,
            comment: row.comment,
            content: row.content,
            author: row.author,
            likes: LikeSet::from_ids(row.likes),
            created_at: row.created_at,
        }
    }
}

const POST_SELECT: &str = r#"
    SELECT p.id, p.title, p.content, p.author, p.likes, p.created_at,
           u.name AS author_name, u.email AS author_email
    FROM posts p
    LEFT JOIN users u ON u.id = p.author
"#;

/// Attach replies to their comments, keeping comment order
pub fn build_threads(comments: Vec<Comment>, replies: Vec<Reply>) -> Vec<CommentThread> {
    let mut by_comment: HashMap<Uuid, Vec<Reply>> = HashMap::new();
    for reply in replies {
        by_comment.entry(reply.comment).or_default().push(reply);
    }

    comments
        .into_iter()
        .map(|comment| {
            let replies = by_comment.remove(&comment.id).unwrap_or_default();
            CommentThread { comment, replies }
        })
        .collect()
}

fn content_error(what: &str) -> AppError {
    AppError::Validation(format!("{} content is required", what))
}

impl DiscussionService {
    /// Create a new DiscussionService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// All posts with author details and their comments
    pub async fn list_posts(&self) -> AppResult<Vec<PostSummary>> {
        let rows = sqlx::query_as::<_, PostRow>(&format!(
            "{} ORDER BY p.created_at DESC, p.id",
            POST_SELECT
        ))
        .fetch_all(&self.db)
        .await?;

        let post_ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
        let comments = sqlx::query_as::<_, CommentRow>(
            r#"
            SELECT id, post, content, author, likes, created_at
            FROM comments
            WHERE post = ANY($1)
            ORDER BY created_at, id
            "#,
        )
        .bind(&post_ids)
        .fetch_all(&self.db)
        .await?;

        let mut comments_by_post: HashMap<Uuid, Vec<Comment>> = HashMap::new();
        for row in comments {
            comments_by_post.entry(row.post).or_default().push(row.into());
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let (post, author_details) = row.split();
                let comments = comments_by_post.remove(&post.id).unwrap_or_default();
                PostSummary {
                    post,
                    author_details,
                    comments,
                }
            })
            .collect())
    }

    /// A post with its comments and their replies
    pub async fn get_post(&self, post_id: Uuid) -> AppResult<PostDetail> {
        let row = sqlx::query_as::<_, PostRow>(&format!("{} WHERE p.id = $1", POST_SELECT))
            .bind(post_id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Post".to_string()))?;

        let comments = sqlx::query_as::<_, CommentRow>(
            r#"
            SELECT id, post, content, author, likes, created_at
            FROM comments
            WHERE post = $1
            ORDER BY created_at, id
            "#,
        )
        .bind(post_id)
        .fetch_all(&self.db)
        .await?;

        let replies = sqlx::query_as::<_, ReplyRow>(
            r#"
            SELECT id, post, comment, content, author, likes, created_at
            FROM replies
            WHERE post = $1
            ORDER BY created_at, id
            "#,
        )
        .bind(post_id)
        .fetch_all(&self.db)
        .await?;

        let (post, author_details) = row.split();
        Ok(PostDetail {
            post,
            author_details,
            comments: build_threads(
                comments.into_iter().map(Comment::from).collect(),
                replies.into_iter().map(Reply::from).collect(),
            ),
        })
    }

    /// Create a post by the given author
    pub async fn create_post(&self, author: Uuid, title: &str, content: &str) -> AppResult<Post> {
        if title.trim().is_empty() {
            return Err(AppError::Validation("Post title is required".to_string()));
        }
        validate_content(content).map_err(|_| content_error("Post"))?;

        let row = sqlx::query_as::<_, PostRow>(
            r#"
            INSERT INTO posts (title, content, author)
            VALUES ($1, $2, $3)
            RETURNING id, title, content, author, likes, created_at,
                      NULL::TEXT AS author_name, NULL::TEXT AS author_email
            "#,
        )
        .bind(title)
        .bind(content)
        .bind(author)
        .fetch_one(&self.db)
        .await?;

        tracing::info!(post_id = %row.id, "post created");
        Ok(row.split().0)
    }

    /// Comment on an existing post
    pub async fn add_comment(&self, post_id: Uuid, author: Uuid, content: &str) -> AppResult<Comment> {
        validate_content(content).map_err(|_| content_error("Comment"))?;

        let post_exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM posts WHERE id = $1)")
                .bind(post_id)
                .fetch_one(&self.db)
                .await?;
        if !post_exists {
            return Err(AppError::NotFound("Post".to_string()));
        }

        let row = sqlx::query_as::<_, CommentRow>(
            r#"
            INSERT INTO comments (post, content, author)
            VALUES ($1, $2, $3)
            RETURNING id, post, content, author, likes, created_at
            "#,
        )
        .bind(post_id)
        .bind(content)
        .bind(author)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }

    /// Delete a comment and its replies. Only the author may do this.
    pub async fn delete_comment(&self, comment_id: Uuid, user_id: Uuid) -> AppResult<()> {
        let mut tx = self.db.begin().await?;

        let author = sqlx::query_scalar::<_, Uuid>(
            "SELECT author FROM comments WHERE id = $1 FOR UPDATE",
        )
        .bind(comment_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Comment".to_string()))?;

        if author != user_id {
            return Err(AppError::Forbidden(
                "Not authorized to delete this comment".to_string(),
            ));
        }

        sqlx::query("DELETE FROM replies WHERE comment = $1")
            .bind(comment_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(comment_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        tracing::info!(comment_id = %comment_id, "comment deleted");
        Ok(())
    }

    /// Reply to an existing comment
    pub async fn add_reply(&self, comment_id: Uuid, author: Uuid, content: &str) -> AppResult<Reply> {
        validate_content(content).map_err(|_| content_error("Reply"))?;

        let post_id = sqlx::query_scalar::<_, Uuid>("SELECT post FROM comments WHERE id = $1")
            .bind(comment_id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Comment".to_string()))?;

        let row = sqlx::query_as::<_, ReplyRow>(
            r#"
            INSERT INTO replies (post, comment, content, author)
            VALUES ($1, $2, $3, $4)
            RETURNING id, post, comment, content, author, likes, created_at
            "#,
        )
        .bind(post_id)
        .bind(comment_id)
        .bind(content)
        .bind(author)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }

    /// Delete a reply. Only the author may do this.
    pub async fn delete_reply(&self, comment_id: Uuid, reply_id: Uuid, user_id: Uuid) -> AppResult<()> {
        let author = sqlx::query_scalar::<_, Uuid>(
            "SELECT author FROM replies WHERE id = $1 AND comment = $2",
        )
        .bind(reply_id)
        .bind(comment_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Reply".to_string()))?;

        if author != user_id {
            return Err(AppError::Forbidden(
                "Not authorized to delete this reply".to_string(),
            ));
        }

        sqlx::query("DELETE FROM replies WHERE id = $1")
            .bind(reply_id)
            .execute(&self.db)
            .await?;

        Ok(())
    }

    /// Like or unlike a post, comment or reply for a user.
    ///
    /// The row is locked for the read-modify-write, so concurrent toggles by
    /// different users are not lost.
    pub async fn toggle_like(&self, target: LikeTarget, id: Uuid, user_id: Uuid) -> AppResult<LikeUpdate> {
        let table = target.table();
        let mut tx = self.db.begin().await?;

        let current = sqlx::query_scalar::<_, Vec<Uuid>>(&format!(
            "SELECT likes FROM {} WHERE id = $1 FOR UPDATE",
            table
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound(target.resource().to_string()))?;

        let mut likes = LikeSet::from_ids(current);
        let state = likes.toggle(user_id);
        let count = likes.len();

        sqlx::query(&format!("UPDATE {} SET likes = $1 WHERE id = $2", table))
            .bind(likes.into_vec())
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        tracing::debug!(?target, %id, ?state, count, "like toggled");

        Ok(LikeUpdate {
            state,
            likes: count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn comment(id: Uuid, post: Uuid) -> Comment {
        Comment {
            id,
            post,
            content: "Looks healthy".to_string(),
            author: Uuid::new_v4(),
            likes: LikeSet::new(),
            created_at: Utc::now(),
        }
    }

    fn reply(comment: Uuid, post: Uuid, content: &str) -> Reply {
        Reply {
            id: Uuid::new_v4(),
            post,
            comment,
            content: content.to_string(),
            author: Uuid::new_v4(),
            likes: LikeSet::new(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_threads_keep_comment_and_reply_order() {
        let post = Uuid::new_v4();
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let threads = build_threads(
            vec![comment(a, post), comment(b, post)],
            vec![reply(b, post, "first"), reply(a, post, "only"), reply(b, post, "second")],
        );

        assert_eq!(threads.len(), 2);
        assert_eq!(threads[0].comment.id, a);
        assert_eq!(threads[0].replies.len(), 1);
        let contents: Vec<&str> = threads[1].replies.iter().map(|r| r.content.as_str()).collect();
        assert_eq!(contents, ["first", "second"]);
    }

    #[test]
    fn test_threads_drop_orphan_replies() {
        let post = Uuid::new_v4();
        let a = Uuid::new_v4();
        let threads = build_threads(vec![comment(a, post)], vec![reply(Uuid::new_v4(), post, "x")]);
        assert!(threads[0].replies.is_empty());
    }

    #[test]
    fn test_like_targets_map_to_tables() {
        assert_eq!(LikeTarget::Post.table(), "posts");
        assert_eq!(LikeTarget::Comment.table(), "comments");
        assert_eq!(LikeTarget::Reply.table(), "replies");
        assert_eq!(LikeTarget::Reply.resource(), "Reply");
    }
}
