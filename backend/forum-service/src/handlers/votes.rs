/// Vote handlers - upvote and downvote toggles
use crate::error::{AppError, Result};
use crate::middleware::{ensure_active_user, ensure_subject_matches};
use crate::models::{ApiResponse, VoteAction};
use crate::services::{VoteHint, VoteService};
use crate::AppState;
use actix_middleware::UserId;
use actix_web::{web, HttpResponse};
use serde::{Deserialize, Deserializer};
use uuid::Uuid;

/// Optional body sent by clients: the caller's id and its view of its own
/// vote lists. The lists never decide the outcome.
#[derive(Debug, Default, Deserialize)]
pub struct VoteRequest {
    #[serde(rename = "_id")]
    pub id: Option<Uuid>,
    #[serde(default, deserialize_with = "lenient_ids")]
    pub upvotes: Option<Vec<Uuid>>,
    #[serde(default, deserialize_with = "lenient_ids")]
    pub downvotes: Option<Vec<Uuid>>,
}

/// Keep the entries that are UUID strings and drop the rest
fn lenient_ids<'de, D>(deserializer: D) -> std::result::Result<Option<Vec<Uuid>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Vec<serde_json::Value>> = Option::deserialize(deserializer)?;
    Ok(raw.map(|entries| {
        let ids: Vec<Uuid> = entries
            .iter()
            .filter_map(|entry| entry.as_str())
            .filter_map(|entry| Uuid::parse_str(entry).ok())
            .collect();
        if ids.len() != entries.len() {
            tracing::debug!(
                dropped = entries.len() - ids.len(),
                "ignoring malformed vote list entries"
            );
        }
        ids
    }))
}

impl VoteRequest {
    fn parse(body: &[u8]) -> Result<Self> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        serde_json::from_slice(body)
            .map_err(|e| AppError::BadRequest(format!("Invalid request body: {}", e)))
    }

    fn hint(&self) -> Option<VoteHint> {
        if self.upvotes.is_none() && self.downvotes.is_none() {
            return None;
        }
        Some(VoteHint {
            upvotes: self.upvotes.clone().unwrap_or_default(),
            downvotes: self.downvotes.clone().unwrap_or_default(),
        })
    }
}

pub async fn upvote(
    state: web::Data<AppState>,
    user_id: UserId,
    post_id: web::Path<Uuid>,
    body: web::Bytes,
) -> Result<HttpResponse> {
    apply_vote(state, user_id, post_id.into_inner(), &body, VoteAction::Upvote).await
}

pub async fn downvote(
    state: web::Data<AppState>,
    user_id: UserId,
    post_id: web::Path<Uuid>,
    body: web::Bytes,
) -> Result<HttpResponse> {
    apply_vote(state, user_id, post_id.into_inner(), &body, VoteAction::Downvote).await
}

async fn apply_vote(
    state: web::Data<AppState>,
    user_id: UserId,
    post_id: Uuid,
    body: &[u8],
    action: VoteAction,
) -> Result<HttpResponse> {
    let request = VoteRequest::parse(body)?;
    ensure_subject_matches(user_id.0, request.id)?;
    let voter = ensure_active_user(state.repo.as_ref(), user_id.0).await?;

    let hint = request.hint();
    let (user, post) = VoteService::new(state.repo.clone())
        .vote(&voter, post_id, action, hint.as_ref())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok().with_user(user).with_post(post)))
}
