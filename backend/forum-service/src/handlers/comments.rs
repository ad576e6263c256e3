/// Comment handlers
use crate::error::Result;
use crate::middleware::{ensure_active_user, ensure_subject_matches};
use crate::models::ApiResponse;
use crate::services::CommentService;
use crate::AppState;
use actix_middleware::UserId;
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct CreateCommentRequest {
    #[serde(default)]
    pub content: String,
    pub author: Option<Uuid>,
}

pub async fn get_comments(
    state: web::Data<AppState>,
    post_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let comments = CommentService::new(state.repo.clone())
        .list(post_id.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok().with_comments(comments)))
}

pub async fn create_comment(
    state: web::Data<AppState>,
    user_id: UserId,
    post_id: web::Path<Uuid>,
    req: web::Json<CreateCommentRequest>,
) -> Result<HttpResponse> {
    let req = req.into_inner();
    ensure_subject_matches(user_id.0, req.author)?;
    let author = ensure_active_user(state.repo.as_ref(), user_id.0).await?;

    let comment = CommentService::new(state.repo.clone())
        .create(&author, post_id.into_inner(), req.content)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok().with_comment(comment)))
}
