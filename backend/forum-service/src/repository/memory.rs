use super::ForumRepository;
use crate::error::Result;
use crate::models::{Comment, NewComment, NewPost, Post, User, VoteState};
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

/// In-process repository used by tests and local runs without a database.
///
/// Posts and comments are kept in insertion order so that ties on
/// `created` resolve newest-inserted first, matching the Postgres ordering
/// closely enough for callers.
#[derive(Default)]
pub struct MemoryForumRepository {
    users: RwLock<HashMap<Uuid, User>>,
    posts: RwLock<Vec<Post>>,
    comments: RwLock<Vec<Comment>>,
}

impl MemoryForumRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user the way the auth collaborator would
    pub async fn insert_user(&self, user: User) {
        self.users.write().await.insert(user.id, user);
    }

    /// Create a plain active user with empty vote lists
    pub async fn seed_user(&self, username: &str) -> User {
        let user = User {
            id: Uuid::new_v4(),
            username: username.to_string(),
            email: None,
            password_hash: None,
            banned: false,
            admin: false,
            upvotes: Vec::new(),
            downvotes: Vec::new(),
            created: Utc::now(),
        };
        self.insert_user(user.clone()).await;
        user
    }

    /// Posts newest-first; equal timestamps fall back to later insertion first
    fn newest_first<'a>(posts: impl DoubleEndedIterator<Item = &'a Post>) -> Vec<Post> {
        let mut sorted: Vec<Post> = posts.rev().cloned().collect();
        sorted.sort_by(|a, b| b.created.cmp(&a.created));
        sorted
    }
}

fn apply_vote(up: &mut Vec<Uuid>, down: &mut Vec<Uuid>, id: Uuid, state: VoteState) {
    up.retain(|x| *x != id);
    down.retain(|x| *x != id);
    match state {
        VoteState::Up => up.push(id),
        VoteState::Down => down.push(id),
        VoteState::None => {}
    }
}

#[async_trait::async_trait]
impl ForumRepository for MemoryForumRepository {
    async fn health_check(&self) -> Result<()> {
        Ok(())
    }

    async fn find_user(&self, user_id: Uuid) -> Result<Option<User>> {
        Ok(self.users.read().await.get(&user_id).cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn list_posts(&self, offset: i64, limit: i64) -> Result<Vec<Post>> {
        let posts = self.posts.read().await;
        Ok(Self::newest_first(posts.iter())
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect())
    }

    async fn list_posts_by_username(&self, username: &str, limit: i64) -> Result<Vec<Post>> {
        let posts = self.posts.read().await;
        Ok(
            Self::newest_first(posts.iter().filter(|p| p.username == username))
                .into_iter()
                .take(limit.max(0) as usize)
                .collect(),
        )
    }

    async fn find_post(&self, post_id: Uuid) -> Result<Option<Post>> {
        Ok(self
            .posts
            .read()
            .await
            .iter()
            .find(|p| p.id == post_id)
            .cloned())
    }

    async fn insert_post(&self, new_post: NewPost) -> Result<Post> {
        let post = Post {
            id: Uuid::new_v4(),
            author: new_post.author,
            username: new_post.username,
            title: new_post.title,
            text: new_post.text,
            link: new_post.link,
            created: Utc::now(),
            upvoted_by: vec![new_post.author],
            downvoted_by: Vec::new(),
        };
        self.posts.write().await.push(post.clone());
        Ok(post)
    }

    async fn delete_post(&self, post_id: Uuid) -> Result<bool> {
        let removed = {
            let mut posts = self.posts.write().await;
            let before = posts.len();
            posts.retain(|p| p.id != post_id);
            posts.len() != before
        };

        self.comments.write().await.retain(|c| c.post != post_id);

        for user in self.users.write().await.values_mut() {
            user.upvotes.retain(|id| *id != post_id);
            user.downvotes.retain(|id| *id != post_id);
        }

        Ok(removed)
    }

    async fn set_user_vote(
        &self,
        user_id: Uuid,
        post_id: Uuid,
        state: VoteState,
    ) -> Result<Option<User>> {
        let mut users = self.users.write().await;
        Ok(users.get_mut(&user_id).map(|user| {
            apply_vote(&mut user.upvotes, &mut user.downvotes, post_id, state);
            user.clone()
        }))
    }

    async fn set_post_vote(
        &self,
        post_id: Uuid,
        user_id: Uuid,
        state: VoteState,
    ) -> Result<Option<Post>> {
        let mut posts = self.posts.write().await;
        Ok(posts.iter_mut().find(|p| p.id == post_id).map(|post| {
            apply_vote(&mut post.upvoted_by, &mut post.downvoted_by, user_id, state);
            post.clone()
        }))
    }

    async fn list_comments(&self, post_id: Uuid) -> Result<Vec<Comment>> {
        let comments = self.comments.read().await;
        let mut found: Vec<Comment> = comments
            .iter()
            .filter(|c| c.post == post_id)
            .cloned()
            .collect();
        found.sort_by(|a, b| a.created.cmp(&b.created));
        Ok(found)
    }

    async fn insert_comment(&self, new_comment: NewComment) -> Result<Comment> {
        let comment = Comment {
            id: Uuid::new_v4(),
            post: new_comment.post,
            author: new_comment.author,
            username: new_comment.username,
            content: new_comment.content,
            created: Utc::now(),
        };
        self.comments.write().await.push(comment.clone());
        Ok(comment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_post(author: &User, title: &str) -> NewPost {
        NewPost {
            author: author.id,
            username: author.username.clone(),
            title: title.to_string(),
            text: String::new(),
            link: None,
        }
    }

    #[tokio::test]
    async fn insert_post_self_upvotes_author() {
        let repo = MemoryForumRepository::new();
        let alice = repo.seed_user("alice").await;

        let post = repo.insert_post(new_post(&alice, "first")).await.unwrap();
        assert_eq!(post.upvoted_by, vec![alice.id]);
        assert!(post.downvoted_by.is_empty());
    }

    #[tokio::test]
    async fn list_posts_is_newest_first_with_insertion_tiebreak() {
        let repo = MemoryForumRepository::new();
        let alice = repo.seed_user("alice").await;

        for i in 0..5 {
            repo.insert_post(new_post(&alice, &format!("p{i}")))
                .await
                .unwrap();
        }

        let titles: Vec<String> = repo
            .list_posts(0, 3)
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.title)
            .collect();
        assert_eq!(titles, vec!["p4", "p3", "p2"]);

        let rest = repo.list_posts(3, 50).await.unwrap();
        assert_eq!(rest.len(), 2);
        assert_eq!(rest[1].title, "p0");
    }

    #[tokio::test]
    async fn set_vote_moves_between_lists() {
        let repo = MemoryForumRepository::new();
        let alice = repo.seed_user("alice").await;
        let post_id = Uuid::new_v4();

        let user = repo
            .set_user_vote(alice.id, post_id, VoteState::Up)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(user.upvotes, vec![post_id]);

        let user = repo
            .set_user_vote(alice.id, post_id, VoteState::Down)
            .await
            .unwrap()
            .unwrap();
        assert!(user.upvotes.is_empty());
        assert_eq!(user.downvotes, vec![post_id]);

        let user = repo
            .set_user_vote(alice.id, post_id, VoteState::None)
            .await
            .unwrap()
            .unwrap();
        assert!(user.upvotes.is_empty() && user.downvotes.is_empty());
    }

    #[tokio::test]
    async fn set_vote_on_missing_rows_returns_none() {
        let repo = MemoryForumRepository::new();
        assert!(repo
            .set_user_vote(Uuid::new_v4(), Uuid::new_v4(), VoteState::Up)
            .await
            .unwrap()
            .is_none());
        assert!(repo
            .set_post_vote(Uuid::new_v4(), Uuid::new_v4(), VoteState::Up)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn delete_post_cascades() {
        let repo = MemoryForumRepository::new();
        let alice = repo.seed_user("alice").await;
        let bob = repo.seed_user("bob").await;

        let post = repo.insert_post(new_post(&alice, "doomed")).await.unwrap();
        repo.set_user_vote(alice.id, post.id, VoteState::Up)
            .await
            .unwrap();
        repo.set_user_vote(bob.id, post.id, VoteState::Down)
            .await
            .unwrap();
        repo.insert_comment(NewComment {
            post: post.id,
            author: bob.id,
            username: bob.username.clone(),
            content: "meh".into(),
        })
        .await
        .unwrap();

        assert!(repo.delete_post(post.id).await.unwrap());
        assert!(!repo.delete_post(post.id).await.unwrap());

        assert!(repo.find_post(post.id).await.unwrap().is_none());
        assert!(repo.list_comments(post.id).await.unwrap().is_empty());
        let alice = repo.find_user(alice.id).await.unwrap().unwrap();
        let bob = repo.find_user(bob.id).await.unwrap().unwrap();
        assert!(alice.upvotes.is_empty());
        assert!(bob.downvotes.is_empty());
    }
}
