/// Vote service - toggles a user's upvote/downvote on a post
///
/// Membership is mirrored on both records: the user's `upvotes`/`downvotes`
/// hold post ids, the post's `upvotedby`/`downvotedby` hold user ids. The
/// stored user record decides the current state; each side is then moved to
/// the target state with a single update. There is no transaction spanning
/// both rows, so two concurrent toggles on the same pair may briefly leave
/// the sides disagreeing.
use crate::error::{AppError, Result};
use crate::metrics;
use crate::models::{Post, PublicUser, User, VoteAction, VoteState};
use crate::repository::ForumRepository;
use std::sync::Arc;
use uuid::Uuid;

/// Client's view of its own vote lists, used for diagnostics only
#[derive(Debug, Clone, Default)]
pub struct VoteHint {
    pub upvotes: Vec<Uuid>,
    pub downvotes: Vec<Uuid>,
}

/// Next state after applying `action` to `current`
pub fn toggle(current: VoteState, action: VoteAction) -> VoteState {
    match (action, current) {
        (VoteAction::Upvote, VoteState::Up) => VoteState::None,
        (VoteAction::Upvote, _) => VoteState::Up,
        (VoteAction::Downvote, VoteState::Down) => VoteState::None,
        (VoteAction::Downvote, _) => VoteState::Down,
    }
}

pub struct VoteService {
    repo: Arc<dyn ForumRepository>,
}

impl VoteService {
    pub fn new(repo: Arc<dyn ForumRepository>) -> Self {
        Self { repo }
    }

    /// Apply `action` for `user` on `post_id`.
    ///
    /// Returns the stripped user and the post after both updates.
    pub async fn vote(
        &self,
        user: &User,
        post_id: Uuid,
        action: VoteAction,
        hint: Option<&VoteHint>,
    ) -> Result<(PublicUser, Post)> {
        if self.repo.find_post(post_id).await?.is_none() {
            return Err(AppError::NotFound("No posts found".to_string()));
        }

        let current = VoteState::of(user, post_id);
        if let Some(hint) = hint {
            let claimed = VoteState::from_lists(&hint.upvotes, &hint.downvotes, post_id);
            if claimed != current {
                tracing::debug!(
                    user_id = %user.id,
                    %post_id,
                    claimed = claimed.as_str(),
                    stored = current.as_str(),
                    "client vote lists disagree with stored state"
                );
            }
        }

        let target = toggle(current, action);

        let updated_user = self
            .repo
            .set_user_vote(user.id, post_id, target)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        let updated_post = self
            .repo
            .set_post_vote(post_id, user.id, target)
            .await?
            .ok_or_else(|| {
                tracing::warn!(
                    user_id = %user.id,
                    %post_id,
                    "post vanished between user and post vote updates"
                );
                AppError::NotFound("No posts found".to_string())
            })?;

        metrics::record_vote(action, target);
        tracing::info!(
            user_id = %user.id,
            %post_id,
            action = action.as_str(),
            from = current.as_str(),
            to = target.as_str(),
            "vote toggled"
        );

        Ok((updated_user.stripped(), updated_post))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewPost;
    use crate::repository::MemoryForumRepository;

    async fn setup() -> (Arc<MemoryForumRepository>, VoteService, User, Post) {
        let repo = Arc::new(MemoryForumRepository::new());
        let author = repo.seed_user("author").await;
        let voter = repo.seed_user("voter").await;
        let post = repo
            .insert_post(NewPost {
                author: author.id,
                username: author.username.clone(),
                title: "hello".into(),
                text: String::new(),
                link: None,
            })
            .await
            .unwrap();
        let service = VoteService::new(repo.clone());
        (repo, service, voter, post)
    }

    async fn reload(repo: &MemoryForumRepository, user: &User) -> User {
        repo.find_user(user.id).await.unwrap().unwrap()
    }

    #[test]
    fn test_toggle_table() {
        use VoteAction::{Downvote, Upvote};

        assert_eq!(toggle(VoteState::None, Upvote), VoteState::Up);
        assert_eq!(toggle(VoteState::Up, Upvote), VoteState::None);
        assert_eq!(toggle(VoteState::Down, Upvote), VoteState::Up);
        assert_eq!(toggle(VoteState::None, Downvote), VoteState::Down);
        assert_eq!(toggle(VoteState::Down, Downvote), VoteState::None);
        assert_eq!(toggle(VoteState::Up, Downvote), VoteState::Down);
    }

    #[tokio::test]
    async fn test_upvote_from_none() {
        let (_repo, service, voter, post) = setup().await;

        let (user, post_after) = service
            .vote(&voter, post.id, VoteAction::Upvote, None)
            .await
            .unwrap();

        assert_eq!(user.upvotes, vec![post.id]);
        assert!(user.downvotes.is_empty());
        assert!(post_after.upvoted_by.contains(&voter.id));
        assert!(post_after.downvoted_by.is_empty());
    }

    #[tokio::test]
    async fn test_upvote_twice_clears() {
        let (repo, service, voter, post) = setup().await;

        service
            .vote(&voter, post.id, VoteAction::Upvote, None)
            .await
            .unwrap();
        let voter = reload(&repo, &voter).await;
        let (user, post_after) = service
            .vote(&voter, post.id, VoteAction::Upvote, None)
            .await
            .unwrap();

        assert!(user.upvotes.is_empty());
        assert!(!post_after.upvoted_by.contains(&voter.id));
    }

    #[tokio::test]
    async fn test_downvote_while_up_moves_in_one_call() {
        let (repo, service, voter, post) = setup().await;

        service
            .vote(&voter, post.id, VoteAction::Upvote, None)
            .await
            .unwrap();
        let voter = reload(&repo, &voter).await;
        let (user, post_after) = service
            .vote(&voter, post.id, VoteAction::Downvote, None)
            .await
            .unwrap();

        assert!(user.upvotes.is_empty());
        assert_eq!(user.downvotes, vec![post.id]);
        assert!(!post_after.upvoted_by.contains(&voter.id));
        assert_eq!(post_after.downvoted_by, vec![voter.id]);
    }

    #[tokio::test]
    async fn test_stale_hint_is_ignored() {
        let (repo, service, voter, post) = setup().await;

        service
            .vote(&voter, post.id, VoteAction::Upvote, None)
            .await
            .unwrap();
        let voter = reload(&repo, &voter).await;

        // Client still believes it has not voted
        let hint = VoteHint::default();
        let (user, _) = service
            .vote(&voter, post.id, VoteAction::Upvote, Some(&hint))
            .await
            .unwrap();

        assert!(user.upvotes.is_empty());
    }

    #[tokio::test]
    async fn test_missing_post() {
        let (_repo, service, voter, _post) = setup().await;

        let err = service
            .vote(&voter, Uuid::new_v4(), VoteAction::Downvote, None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
