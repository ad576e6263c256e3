/// Post service - listing, creation and deletion of posts
use crate::error::{AppError, Result};
use crate::metrics;
use crate::middleware::check_post_deletion;
use crate::models::{Comment, NewPost, Post, PublicUser, User, VoteState};
use crate::repository::ForumRepository;
use std::sync::Arc;
use uuid::Uuid;

/// Posts per listing request
pub const PAGE_SIZE: i64 = 50;

pub struct PostService {
    repo: Arc<dyn ForumRepository>,
}

impl PostService {
    pub fn new(repo: Arc<dyn ForumRepository>) -> Self {
        Self { repo }
    }

    /// Newest posts, one page
    pub async fn list_latest(&self) -> Result<Vec<Post>> {
        self.repo.list_posts(0, PAGE_SIZE).await
    }

    /// Posts starting at offset `skip * page`.
    ///
    /// The offset is the product of both path segments, not
    /// `skip + page * PAGE_SIZE`. Existing clients depend on this.
    pub async fn list_page(&self, skip: i64, page: i64) -> Result<Vec<Post>> {
        let offset = skip
            .checked_mul(page)
            .filter(|offset| *offset >= 0)
            .ok_or_else(|| AppError::BadRequest("Invalid page offset".to_string()))?;

        self.repo.list_posts(offset, PAGE_SIZE).await
    }

    pub async fn get_with_comments(&self, post_id: Uuid) -> Result<(Post, Vec<Comment>)> {
        let post = self
            .repo
            .find_post(post_id)
            .await?
            .ok_or_else(|| AppError::NotFound("No posts found".to_string()))?;
        let comments = self.repo.list_comments(post_id).await?;

        Ok((post, comments))
    }

    /// Up to one page of posts by `username`, with the author's public record
    pub async fn list_by_author(&self, username: &str) -> Result<(PublicUser, Vec<Post>)> {
        let user = self
            .repo
            .find_user_by_username(username)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
        let posts = self
            .repo
            .list_posts_by_username(username, PAGE_SIZE)
            .await?;

        Ok((user.stripped(), posts))
    }

    /// Insert a post by `author`, who upvotes it immediately
    pub async fn create(
        &self,
        author: &User,
        title: String,
        text: String,
        link: Option<String>,
    ) -> Result<(PublicUser, Post)> {
        let title = title.trim().to_string();
        if title.is_empty() {
            return Err(AppError::BadRequest("A post needs a title".to_string()));
        }
        let link = link.filter(|l| !l.trim().is_empty());

        let post = self
            .repo
            .insert_post(NewPost {
                author: author.id,
                username: author.username.clone(),
                title,
                text,
                link,
            })
            .await?;

        let user = self
            .repo
            .set_user_vote(author.id, post.id, VoteState::Up)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        metrics::POSTS_CREATED_TOTAL.inc();
        tracing::info!(post_id = %post.id, author = %author.id, "post created");

        Ok((user.stripped(), post))
    }

    /// Delete a post if `actor` owns it or is an admin. Returns the deleted id.
    pub async fn delete(&self, actor: &User, post_id: Uuid) -> Result<Uuid> {
        let post = self
            .repo
            .find_post(post_id)
            .await?
            .ok_or_else(|| AppError::NotFound("No posts found".to_string()))?;

        check_post_deletion(actor, &post)?;

        if !self.repo.delete_post(post_id).await? {
            return Err(AppError::NotFound("No posts found".to_string()));
        }

        metrics::POSTS_DELETED_TOTAL.inc();
        tracing::info!(%post_id, actor = %actor.id, admin = actor.admin, "post deleted");

        Ok(post_id)
    }
}
