use super::ForumRepository;
use crate::error::Result;
use crate::models::{Comment, NewComment, NewPost, Post, User, VoteState};
use sqlx::PgPool;
use uuid::Uuid;

/// PostgreSQL-backed repository.
///
/// Vote lists are `UUID[]` columns. Each vote update is a single `UPDATE`
/// that rewrites both lists of one row, so a row never shows the id in
/// both lists, even mid-toggle.
#[derive(Clone)]
pub struct PgForumRepository {
    pool: PgPool,
}

impl PgForumRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait::async_trait]
impl ForumRepository for PgForumRepository {
    async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn find_user(&self, user_id: Uuid) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, banned, admin, upvotes, downvotes, created
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, banned, admin, upvotes, downvotes, created
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn list_posts(&self, offset: i64, limit: i64) -> Result<Vec<Post>> {
        let posts = sqlx::query_as::<_, Post>(
            r#"
            SELECT id, author, username, title, text, link, created, upvoted_by, downvoted_by
            FROM posts
            ORDER BY created DESC, id DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(posts)
    }

    async fn list_posts_by_username(&self, username: &str, limit: i64) -> Result<Vec<Post>> {
        let posts = sqlx::query_as::<_, Post>(
            r#"
            SELECT id, author, username, title, text, link, created, upvoted_by, downvoted_by
            FROM posts
            WHERE username = $1
            ORDER BY created DESC, id DESC
            LIMIT $2
            "#,
        )
        .bind(username)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(posts)
    }

    async fn find_post(&self, post_id: Uuid) -> Result<Option<Post>> {
        let post = sqlx::query_as::<_, Post>(
            r#"
            SELECT id, author, username, title, text, link, created, upvoted_by, downvoted_by
            FROM posts
            WHERE id = $1
            "#,
        )
        .bind(post_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(post)
    }

    async fn insert_post(&self, new_post: NewPost) -> Result<Post> {
        let post = sqlx::query_as::<_, Post>(
            r#"
            INSERT INTO posts (author, username, title, text, link, upvoted_by)
            VALUES ($1, $2, $3, $4, $5, ARRAY[$1]::uuid[])
            RETURNING id, author, username, title, text, link, created, upvoted_by, downvoted_by
            "#,
        )
        .bind(new_post.author)
        .bind(&new_post.username)
        .bind(&new_post.title)
        .bind(&new_post.text)
        .bind(&new_post.link)
        .fetch_one(&self.pool)
        .await?;

        Ok(post)
    }

    async fn delete_post(&self, post_id: Uuid) -> Result<bool> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            UPDATE users
            SET upvotes = array_remove(upvotes, $1::uuid),
                downvotes = array_remove(downvotes, $1::uuid)
            WHERE $1::uuid = ANY(upvotes) OR $1::uuid = ANY(downvotes)
            "#,
        )
        .bind(post_id)
        .execute(&mut *tx)
        .await?;

        // Comments go with the post via ON DELETE CASCADE
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(post_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(result.rows_affected() > 0)
    }

    async fn set_user_vote(
        &self,
        user_id: Uuid,
        post_id: Uuid,
        state: VoteState,
    ) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET upvotes = CASE WHEN $3::text = 'up'
                               THEN array_append(array_remove(upvotes, $2::uuid), $2::uuid)
                               ELSE array_remove(upvotes, $2::uuid) END,
                downvotes = CASE WHEN $3::text = 'down'
                                 THEN array_append(array_remove(downvotes, $2::uuid), $2::uuid)
                                 ELSE array_remove(downvotes, $2::uuid) END
            WHERE id = $1
            RETURNING id, username, email, password_hash, banned, admin, upvotes, downvotes, created
            "#,
        )
        .bind(user_id)
        .bind(post_id)
        .bind(state.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn set_post_vote(
        &self,
        post_id: Uuid,
        user_id: Uuid,
        state: VoteState,
    ) -> Result<Option<Post>> {
        let post = sqlx::query_as::<_, Post>(
            r#"
            UPDATE posts
            SET upvoted_by = CASE WHEN $3::text = 'up'
                                  THEN array_append(array_remove(upvoted_by, $2::uuid), $2::uuid)
                                  ELSE array_remove(upvoted_by, $2::uuid) END,
                downvoted_by = CASE WHEN $3::text = 'down'
                                    THEN array_append(array_remove(downvoted_by, $2::uuid), $2::uuid)
                                    ELSE array_remove(downvoted_by, $2::uuid) END
            WHERE id = $1
            RETURNING id, author, username, title, text, link, created, upvoted_by, downvoted_by
            "#,
        )
        .bind(post_id)
        .bind(user_id)
        .bind(state.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(post)
    }

    async fn list_comments(&self, post_id: Uuid) -> Result<Vec<Comment>> {
        let comments = sqlx::query_as::<_, Comment>(
            r#"
            SELECT id, post, author, username, content, created
            FROM comments
            WHERE post = $1
            ORDER BY created ASC, id ASC
            "#,
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(comments)
    }

    async fn insert_comment(&self, new_comment: NewComment) -> Result<Comment> {
        let comment = sqlx::query_as::<_, Comment>(
            r#"
            INSERT INTO comments (post, author, username, content)
            VALUES ($1, $2, $3, $4)
            RETURNING id, post, author, username, content, created
            "#,
        )
        .bind(new_comment.post)
        .bind(new_comment.author)
        .bind(&new_comment.username)
        .bind(&new_comment.content)
        .fetch_one(&self.pool)
        .await?;

        Ok(comment)
    }
}
