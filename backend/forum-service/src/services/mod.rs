/// Business logic layer for forum-service
///
/// - Post service: listing, pagination, creation with self-upvote, deletion
/// - Vote service: upvote/downvote toggling across the user and post records
/// - Comment service: listing and creation
pub mod comments;
pub mod posts;
pub mod votes;

pub use comments::CommentService;
pub use posts::{PostService, PAGE_SIZE};
pub use votes::{toggle, VoteHint, VoteService};
