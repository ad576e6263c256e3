#![allow(dead_code)]

use actix_web::test::TestRequest;
use chrono::Duration;
use crypto_core::JwtKeys;
use forum_service::models::{NewPost, Post, User};
use forum_service::repository::{ForumRepository, MemoryForumRepository};
use std::sync::Arc;

pub const SECRET: &str = "forum-integration-test-secret-0123456789";

pub struct TestContext {
    pub repo: Arc<MemoryForumRepository>,
    pub keys: JwtKeys,
}

impl TestContext {
    pub fn new() -> Self {
        Self {
            repo: Arc::new(MemoryForumRepository::new()),
            keys: JwtKeys::from_secret(SECRET).expect("test secret"),
        }
    }

    pub async fn user(&self, username: &str) -> User {
        self.repo.seed_user(username).await
    }

    pub async fn banned_user(&self, username: &str) -> User {
        let mut user = self.repo.seed_user(username).await;
        user.banned = true;
        self.repo.insert_user(user.clone()).await;
        user
    }

    pub async fn admin(&self, username: &str) -> User {
        let mut user = self.repo.seed_user(username).await;
        user.admin = true;
        self.repo.insert_user(user.clone()).await;
        user
    }

    pub async fn reload(&self, user: &User) -> User {
        self.repo
            .find_user(user.id)
            .await
            .unwrap()
            .expect("user still exists")
    }

    /// Insert a post the way the create endpoint would, author self-upvote included
    pub async fn post_by(&self, author: &User, title: &str) -> Post {
        let post = self
            .repo
            .insert_post(NewPost {
                author: author.id,
                username: author.username.clone(),
                title: title.to_string(),
                text: String::new(),
                link: None,
            })
            .await
            .unwrap();
        self.repo
            .set_user_vote(author.id, post.id, forum_service::models::VoteState::Up)
            .await
            .unwrap();
        post
    }

    pub fn token(&self, user: &User) -> String {
        self.keys
            .generate_access_token(user.id, &user.username)
            .unwrap()
    }

    pub fn expired_token(&self, user: &User) -> String {
        self.keys
            .generate_token_with_ttl(user.id, &user.username, Duration::seconds(-60))
            .unwrap()
    }
}

pub fn authed(req: TestRequest, token: &str) -> TestRequest {
    req.insert_header(("Authorization", format!("Bearer {}", token)))
}

/// Build the full forum app over the context's in-memory repository
macro_rules! forum_app {
    ($ctx:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(actix_web::web::Data::new(forum_service::AppState::new(
                    $ctx.repo.clone(),
                )))
                .app_data(actix_web::web::Data::new($ctx.keys.clone()))
                .configure(forum_service::handlers::configure_routes),
        )
        .await
    };
}
