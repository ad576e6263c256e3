/// HTTP handlers for forum endpoints
///
/// - Posts: listing, pagination, single post, per-author listing, create, delete
/// - Votes: upvote and downvote toggles
/// - Comments: listing and creation
/// - Health: liveness and readiness probes
///
/// Write endpoints sit behind `actix_middleware::TokenGuard`.
pub mod comments;
pub mod health;
pub mod posts;
pub mod votes;

pub use comments::{create_comment, get_comments};
pub use health::{health_summary, liveness_check, readiness_check};
pub use posts::{
    create_post, delete_post, get_all_posts, get_next_posts, get_post, get_user_posts,
};
pub use votes::{downvote, upvote};

use crate::error::{render_token_rejection, AppError};
use actix_middleware::{RejectionRenderer, TokenGuard};
use actix_web::web;

/// Register every route along with extractor configs that turn bad JSON,
/// bad path segments and token rejections into the usual response envelope.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(RejectionRenderer(render_token_rejection))
    .app_data(web::JsonConfig::default().error_handler(|err, _req| {
        AppError::BadRequest(format!("Invalid request body: {}", err)).into()
    }))
    .app_data(web::PathConfig::default().error_handler(|err, _req| {
        AppError::BadRequest(format!("Invalid path: {}", err)).into()
    }))
    .route("/health", web::get().to(health_summary))
    .route("/health/live", web::get().to(liveness_check))
    .route("/health/ready", web::get().to(readiness_check))
    .route("/metrics", web::get().to(crate::metrics::serve_metrics))
    .route("/posts/all", web::get().to(get_all_posts))
    .service(
        web::resource("/posts/new")
            .wrap(TokenGuard)
            .route(web::post().to(create_post)),
    )
    .route("/posts/{skip}/{page}", web::get().to(get_next_posts))
    .route("/user/{username}/posts", web::get().to(get_user_posts))
    .route("/post/{id}", web::get().to(get_post))
    .service(
        web::resource("/post/{id}/upvote")
            .wrap(TokenGuard)
            .route(web::post().to(upvote)),
    )
    .service(
        web::resource("/post/{id}/downvote")
            .wrap(TokenGuard)
            .route(web::post().to(downvote)),
    )
    .service(
        web::resource("/post/{id}/delete")
            .wrap(TokenGuard)
            .route(web::delete().to(delete_post)),
    )
    .route("/post/{id}/comments/all", web::get().to(get_comments))
    .service(
        web::resource("/post/{id}/comment")
            .wrap(TokenGuard)
            .route(web::post().to(create_comment)),
    );
}
