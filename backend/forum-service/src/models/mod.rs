/// Data models for forum-service
///
/// - `User`: stored account row, never serialized directly
/// - `PublicUser`: user with sensitive fields stripped, safe to return
/// - `Post`, `Comment`: forum content
/// - `VoteState`, `VoteAction`: per (user, post) vote membership
///
/// Identifiers travel as `_id` on the wire so existing clients keep working.
pub mod response;

pub use response::ApiResponse;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stored user row, including credentials owned by the auth collaborator
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub banned: bool,
    pub admin: bool,
    pub upvotes: Vec<Uuid>,
    pub downvotes: Vec<Uuid>,
    pub created: DateTime<Utc>,
}

impl User {
    /// Drop email and password hash before the user leaves the service
    pub fn stripped(&self) -> PublicUser {
        PublicUser::from(self.clone())
    }

    pub fn can_act(&self) -> bool {
        !self.banned
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PublicUser {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub username: String,
    #[serde(default)]
    pub banned: bool,
    #[serde(default)]
    pub admin: bool,
    #[serde(default)]
    pub upvotes: Vec<Uuid>,
    #[serde(default)]
    pub downvotes: Vec<Uuid>,
    pub created: DateTime<Utc>,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            banned: user.banned,
            admin: user.admin,
            upvotes: user.upvotes,
            downvotes: user.downvotes,
            created: user.created,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, sqlx::FromRow)]
pub struct Post {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub author: Uuid,
    pub username: String,
    pub title: String,
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    pub created: DateTime<Utc>,
    #[serde(rename = "upvotedby", default)]
    pub upvoted_by: Vec<Uuid>,
    #[serde(rename = "downvotedby", default)]
    pub downvoted_by: Vec<Uuid>,
}

/// Fields needed to insert a post; id and timestamp come from storage
#[derive(Debug, Clone)]
pub struct NewPost {
    pub author: Uuid,
    pub username: String,
    pub title: String,
    pub text: String,
    pub link: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, sqlx::FromRow)]
pub struct Comment {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub post: Uuid,
    pub author: Uuid,
    pub username: String,
    pub content: String,
    pub created: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewComment {
    pub post: Uuid,
    pub author: Uuid,
    pub username: String,
    pub content: String,
}

/// Vote membership of one user on one post
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteState {
    None,
    Up,
    Down,
}

impl VoteState {
    /// Derive the state from a pair of vote lists; upvote wins if both hold it
    pub fn from_lists(upvotes: &[Uuid], downvotes: &[Uuid], post_id: Uuid) -> Self {
        if upvotes.contains(&post_id) {
            VoteState::Up
        } else if downvotes.contains(&post_id) {
            VoteState::Down
        } else {
            VoteState::None
        }
    }

    /// Stored state of `user` on `post_id`
    pub fn of(user: &User, post_id: Uuid) -> Self {
        Self::from_lists(&user.upvotes, &user.downvotes, post_id)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            VoteState::None => "none",
            VoteState::Up => "up",
            VoteState::Down => "down",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteAction {
    Upvote,
    Downvote,
}

impl VoteAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            VoteAction::Upvote => "upvote",
            VoteAction::Downvote => "downvote",
        }
    }
}
