//! The dashboard's three views. Each owns local state only, fetches through the [`Api`]
//! trait, and renders to plain text. The REST-backed implementation lives in [`rest`];
//! tests swap in a counting mock.

pub mod calculator;
pub mod rest;
pub mod top_users;
pub mod trending;

use crate::aggregate::{Comment, Post, PostSort, User};
use async_trait::async_trait;

pub use calculator::CalculatorView;
pub use top_users::TopUsersView;
pub use trending::TrendingView;

/// The aggregator endpoints, as the views see them. Client-side errors are plain
/// strings: every view shows the same generic inline message regardless of cause.
#[async_trait(?Send)]
pub trait Api {
    async fn top_users(&self) -> anyhow::Result<Vec<User>>;
    async fn trending_posts(&self, sort: PostSort) -> anyhow::Result<Vec<Post>>;
    async fn post_comments(&self, post_id: &str) -> anyhow::Result<Vec<Comment>>;
    async fn average(&self, numbers: &[f64]) -> anyhow::Result<f64>;
}

/// Where a view's one remote fetch currently stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase<T> {
    Loading,
    Ready(T),
    Failed,
}

impl<T> Phase<T> {
    pub fn from_result<E>(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Phase::Ready(value),
            Err(_) => Phase::Failed,
        }
    }
}
