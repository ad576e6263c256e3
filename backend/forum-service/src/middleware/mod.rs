/// Authorization predicates for forum-service
///
/// Token verification happens in `actix_middleware::TokenGuard`; the checks
/// here run inside handlers once the subject id is known.
pub mod permissions;

pub use permissions::*;
