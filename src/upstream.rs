pub mod eval;
#[cfg(test)]
pub mod mock;
pub mod structs;

use crate::errors::Fallible;
use async_trait::async_trait;
use structs::{RawComment, RawPost, RawUser};

/// The interface to the evaluation service. One implementation talks HTTP
/// ([`eval::EvalClient`]); tests swap in an in-memory mock.
///
/// Futures here are not `Send`: the HTTP client is tied to the actix worker it was built on.
#[async_trait(?Send)]
pub trait Client: Clone {
    /// All registered users, in the order upstream lists them.
    async fn list_users(&self) -> Fallible<Vec<RawUser>>;
    /// Every post belonging to one user.
    async fn list_posts(&self, user_id: &str) -> Fallible<Vec<RawPost>>;
    /// Every comment on one post.
    async fn list_comments(&self, post_id: u64) -> Fallible<Vec<RawComment>>;
}
