pub mod memory;
pub mod postgres;

pub use memory::MemoryForumRepository;
pub use postgres::PgForumRepository;

use crate::error::Result;
use crate::models::{Comment, NewComment, NewPost, Post, User, VoteState};
use uuid::Uuid;

/// Storage operations the forum needs.
///
/// Users, posts and comments behave like three independent collections:
/// every method touches one logical record set, and no method spans the
/// user and post sides of a vote. Callers keep the mirrored vote
/// membership in step by issuing one update per side.
#[async_trait::async_trait]
pub trait ForumRepository: Send + Sync {
    /// Cheap round trip used by readiness probes
    async fn health_check(&self) -> Result<()>;

    async fn find_user(&self, user_id: Uuid) -> Result<Option<User>>;

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>>;

    /// Posts newest-first by creation time
    async fn list_posts(&self, offset: i64, limit: i64) -> Result<Vec<Post>>;

    /// Posts whose author has `username`, newest-first
    async fn list_posts_by_username(&self, username: &str, limit: i64) -> Result<Vec<Post>>;

    async fn find_post(&self, post_id: Uuid) -> Result<Option<Post>>;

    /// Insert a post with its author already in `upvotedby`
    async fn insert_post(&self, new_post: NewPost) -> Result<Post>;

    /// Remove a post, its comments and every user's vote on it.
    /// Returns false if the post did not exist.
    async fn delete_post(&self, post_id: Uuid) -> Result<bool>;

    /// Set the user-side membership of `post_id` to `state` in one update.
    /// Returns the updated user, or None if the user does not exist.
    async fn set_user_vote(
        &self,
        user_id: Uuid,
        post_id: Uuid,
        state: VoteState,
    ) -> Result<Option<User>>;

    /// Set the post-side membership of `user_id` to `state` in one update.
    /// Returns the updated post, or None if the post does not exist.
    async fn set_post_vote(
        &self,
        post_id: Uuid,
        user_id: Uuid,
        state: VoteState,
    ) -> Result<Option<Post>>;

    /// Comments of a post, oldest first
    async fn list_comments(&self, post_id: Uuid) -> Result<Vec<Comment>>;

    async fn insert_comment(&self, new_comment: NewComment) -> Result<Comment>;
}
