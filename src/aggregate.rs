//! Reshapes upstream's raw collections into the ranked, size-bounded views the dashboard
//! consumes. Everything here is recomputed per call: there is no cache, so two concurrent
//! calls may observe different upstream state.

use crate::errors::{Describe, External, Fallible};
use crate::upstream::Client;
use anyhow::anyhow;
use futures::future::try_join_all;
use serde::{Deserialize, Serialize};

/// How many users `/users` returns.
pub const TOP_USERS_LIMIT: usize = 5;
/// How many posts `/posts` returns.
pub const TRENDING_POSTS_LIMIT: usize = 10;

/// A user ranked by how much they post. Derived, never persisted.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub post_count: usize,
}

/// A post tagged with its owner. `comment_count` is only populated (and only serialized)
/// when ranking by popularity.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub user_id: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub comment_count: Option<usize>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub id: String,
    pub content: String,
}

/// The `?type=` filter of `/posts`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PostSort {
    Latest,
    Popular,
}

impl Default for PostSort {
    fn default() -> Self {
        PostSort::Latest
    }
}

impl PostSort {
    pub fn as_str(self) -> &'static str {
        match self {
            PostSort::Latest => "latest",
            PostSort::Popular => "popular",
        }
    }
}

/// Rank users by post count, descending, and keep the top five.
///
/// Issues one posts fetch per user, all concurrently, and fails the whole call if any one
/// fails. The sort is stable, so users with equal post counts keep upstream's ordering.
pub async fn top_users<C: Client>(upstream: &C) -> Fallible<Vec<User>> {
    let users = upstream.list_users().await?;
    let mut ranked = try_join_all(users.into_iter().map(|user| async move {
        let posts = upstream.list_posts(&user.id).await?;
        Ok::<_, crate::errors::Error>(User {
            id: user.id,
            name: user.name,
            post_count: posts.len(),
        })
    }))
    .await?;
    ranked.sort_by(|a, b| b.post_count.cmp(&a.post_count));
    ranked.truncate(TOP_USERS_LIMIT);
    Ok(ranked)
}

/// All posts across all users, ranked per `sort` and truncated to ten.
///
/// `Latest` orders by descending numeric post id (larger id = more recent). `Popular` fetches
/// each post's comments concurrently and orders by descending comment count, ties broken by
/// descending id so equal counts still rank deterministically.
pub async fn trending_posts<C: Client>(upstream: &C, sort: PostSort) -> Fallible<Vec<Post>> {
    let users = upstream.list_users().await?;
    let per_user = try_join_all(users.into_iter().map(|user| async move {
        let posts = upstream.list_posts(&user.id).await?;
        let tagged: Vec<(u64, Post)> = posts
            .into_iter()
            .map(|p| {
                (
                    p.id,
                    Post {
                        id: p.id.to_string(),
                        user_id: user.id.clone(),
                        content: p.content,
                        comment_count: None,
                    },
                )
            })
            .collect();
        Ok::<_, crate::errors::Error>(tagged)
    }))
    .await?;
    let all_posts: Vec<(u64, Post)> = per_user.into_iter().flatten().collect();

    let mut ranked = match sort {
        PostSort::Popular => {
            let mut counted = try_join_all(all_posts.into_iter().map(|(id, post)| async move {
                let comments = upstream.list_comments(id).await?;
                Ok::<_, crate::errors::Error>((
                    id,
                    Post {
                        comment_count: Some(comments.len()),
                        ..post
                    },
                ))
            }))
            .await?;
            counted.sort_by(|(a_id, a), (b_id, b)| {
                b.comment_count.cmp(&a.comment_count).then(b_id.cmp(a_id))
            });
            counted
        }
        PostSort::Latest => {
            let mut by_recency = all_posts;
            by_recency.sort_by(|(a_id, _), (b_id, _)| b_id.cmp(a_id));
            by_recency
        }
    };
    ranked.truncate(TRENDING_POSTS_LIMIT);
    Ok(ranked.into_iter().map(|(_, post)| post).collect())
}

/// Passthrough of one user's posts.
pub async fn user_posts<C: Client>(upstream: &C, user_id: &str) -> Fallible<Vec<Post>> {
    let posts = upstream.list_posts(user_id).await?;
    Ok(posts
        .into_iter()
        .map(|p| Post {
            id: p.id.to_string(),
            user_id: user_id.to_owned(),
            content: p.content,
            comment_count: None,
        })
        .collect())
}

/// Passthrough of one post's comments.
pub async fn post_comments<C: Client>(upstream: &C, post_id: u64) -> Fallible<Vec<Comment>> {
    let comments = upstream.list_comments(post_id).await?;
    Ok(comments
        .into_iter()
        .map(|c| Comment {
            id: c.id.to_string(),
            content: c.content,
        })
        .collect())
}

/// Arithmetic mean. Rejects an empty list rather than serving a NaN.
pub fn average(numbers: &[f64]) -> Fallible<f64> {
    if numbers.is_empty() {
        return Err(anyhow!("refusing to average zero numbers")
            .describe(External::invalid("numbers must not be empty")));
    }
    Ok(numbers.iter().sum::<f64>() / numbers.len() as f64)
}
