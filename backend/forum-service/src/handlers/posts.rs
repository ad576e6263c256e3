/// Post handlers - HTTP endpoints for post operations
use crate::error::Result;
use crate::middleware::{ensure_active_user, ensure_subject_matches};
use crate::models::ApiResponse;
use crate::services::PostService;
use crate::AppState;
use actix_middleware::UserId;
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub text: String,
    pub link: Option<String>,
    /// Legacy clients send their own id; it must match the token
    pub author: Option<Uuid>,
}

/// Latest posts
pub async fn get_all_posts(state: web::Data<AppState>) -> Result<HttpResponse> {
    let posts = PostService::new(state.repo.clone()).list_latest().await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok().with_posts(posts)))
}

/// Posts at offset `skip * page`
pub async fn get_next_posts(
    state: web::Data<AppState>,
    path: web::Path<(i64, i64)>,
) -> Result<HttpResponse> {
    let (skip, page) = path.into_inner();
    let posts = PostService::new(state.repo.clone())
        .list_page(skip, page)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok().with_posts(posts)))
}

/// A single post and its comments
pub async fn get_post(
    state: web::Data<AppState>,
    post_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let (post, comments) = PostService::new(state.repo.clone())
        .get_with_comments(post_id.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok().with_post(post).with_comments(comments)))
}

pub async fn get_user_posts(
    state: web::Data<AppState>,
    username: web::Path<String>,
) -> Result<HttpResponse> {
    let (user, posts) = PostService::new(state.repo.clone())
        .list_by_author(&username)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok().with_user(user).with_posts(posts)))
}

/// Create a new post
pub async fn create_post(
    state: web::Data<AppState>,
    user_id: UserId,
    req: web::Json<CreatePostRequest>,
) -> Result<HttpResponse> {
    let req = req.into_inner();
    ensure_subject_matches(user_id.0, req.author)?;
    let author = ensure_active_user(state.repo.as_ref(), user_id.0).await?;

    let (user, post) = PostService::new(state.repo.clone())
        .create(&author, req.title, req.text, req.link)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok().with_post(post).with_user(user)))
}

/// Delete a post owned by the caller, or any post for admins
pub async fn delete_post(
    state: web::Data<AppState>,
    user_id: UserId,
    post_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let actor = ensure_active_user(state.repo.as_ref(), user_id.0).await?;

    let deleted = PostService::new(state.repo.clone())
        .delete(&actor, post_id.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(
        ApiResponse::ok()
            .with_message("Successfully deleted the post!")
            .with_deleted_id(deleted),
    ))
}
