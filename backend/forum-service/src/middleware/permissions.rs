/// Authorization module for forum-service
///
/// The token guard only proves who the caller is. These checks decide
/// whether that caller may act: the account must exist and not be banned,
/// body-supplied identities must match the token, and deletes need
/// ownership or admin rights.
use crate::error::{AppError, Result};
use crate::models::{Post, User};
use crate::repository::ForumRepository;
use uuid::Uuid;

/// Load the acting user and reject unknown or banned accounts
pub async fn ensure_active_user(repo: &dyn ForumRepository, user_id: Uuid) -> Result<User> {
    match repo.find_user(user_id).await? {
        Some(user) if user.can_act() => Ok(user),
        Some(_) => {
            tracing::info!(%user_id, "banned user attempted a write");
            Err(AppError::UserNotFoundOrBanned)
        }
        None => {
            tracing::debug!(%user_id, "token subject has no user record");
            Err(AppError::UserNotFoundOrBanned)
        }
    }
}

/// Reject a body-supplied identity that differs from the token subject
pub fn ensure_subject_matches(subject: Uuid, claimed: Option<Uuid>) -> Result<()> {
    match claimed {
        Some(claimed) if claimed != subject => {
            tracing::warn!(%subject, %claimed, "request body names a different user");
            Err(AppError::Forbidden(
                crate::error::NOT_AUTHORIZED_MESSAGE.to_string(),
            ))
        }
        _ => Ok(()),
    }
}

/// Only the post's author or an admin may delete it
pub fn check_post_deletion(user: &User, post: &Post) -> Result<()> {
    if post.author == user.id || user.admin {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "You don't have permission to delete this post".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MemoryForumRepository;
    use chrono::Utc;

    fn post_by(author: Uuid) -> Post {
        Post {
            id: Uuid::new_v4(),
            author,
            username: "alice".into(),
            title: "t".into(),
            text: String::new(),
            link: None,
            created: Utc::now(),
            upvoted_by: vec![author],
            downvoted_by: vec![],
        }
    }

    #[tokio::test]
    async fn test_active_user_passes() {
        let repo = MemoryForumRepository::new();
        let alice = repo.seed_user("alice").await;

        let user = ensure_active_user(&repo, alice.id).await.unwrap();
        assert_eq!(user.username, "alice");
    }

    #[tokio::test]
    async fn test_unknown_and_banned_rejected() {
        let repo = MemoryForumRepository::new();
        let mut mallory = repo.seed_user("mallory").await;
        mallory.banned = true;
        repo.insert_user(mallory.clone()).await;

        assert!(matches!(
            ensure_active_user(&repo, mallory.id).await,
            Err(AppError::UserNotFoundOrBanned)
        ));
        assert!(matches!(
            ensure_active_user(&repo, Uuid::new_v4()).await,
            Err(AppError::UserNotFoundOrBanned)
        ));
    }

    #[test]
    fn test_subject_mismatch() {
        let me = Uuid::new_v4();
        assert!(ensure_subject_matches(me, None).is_ok());
        assert!(ensure_subject_matches(me, Some(me)).is_ok());
        assert!(matches!(
            ensure_subject_matches(me, Some(Uuid::new_v4())),
            Err(AppError::Forbidden(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_predicate() {
        let repo = MemoryForumRepository::new();
        let alice = repo.seed_user("alice").await;
        let bob = repo.seed_user("bob").await;
        let mut admin = repo.seed_user("root").await;
        admin.admin = true;

        let post = post_by(alice.id);
        assert!(check_post_deletion(&alice, &post).is_ok());
        assert!(check_post_deletion(&admin, &post).is_ok());
        assert!(matches!(
            check_post_deletion(&bob, &post),
            Err(AppError::Forbidden(_))
        ));
    }
}
