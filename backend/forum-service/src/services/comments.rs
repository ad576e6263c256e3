/// Comment service - handles comment listing and creation
use crate::error::{AppError, Result};
use crate::metrics;
use crate::models::{Comment, NewComment, User};
use crate::repository::ForumRepository;
use std::sync::Arc;
use uuid::Uuid;

pub struct CommentService {
    repo: Arc<dyn ForumRepository>,
}

impl CommentService {
    pub fn new(repo: Arc<dyn ForumRepository>) -> Self {
        Self { repo }
    }

    /// Comments on a post, oldest first. An unknown post has no comments.
    pub async fn list(&self, post_id: Uuid) -> Result<Vec<Comment>> {
        self.repo.list_comments(post_id).await
    }

    pub async fn create(&self, author: &User, post_id: Uuid, content: String) -> Result<Comment> {
        let content = content.trim().to_string();
        if content.is_empty() {
            return Err(AppError::BadRequest("A comment cannot be empty".to_string()));
        }

        if self.repo.find_post(post_id).await?.is_none() {
            return Err(AppError::NotFound("No posts found".to_string()));
        }

        let comment = self
            .repo
            .insert_comment(NewComment {
                post: post_id,
                author: author.id,
                username: author.username.clone(),
                content,
            })
            .await?;

        metrics::COMMENTS_CREATED_TOTAL.inc();
        tracing::info!(comment_id = %comment.id, %post_id, author = %author.id, "comment created");

        Ok(comment)
    }
}
