use crate::errors::{Describe, External, Fallible};
use crate::upstream::structs::{RawComment, RawPost, RawUser};
use anyhow::anyhow;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

type Store<T> = Arc<Mutex<T>>;

/// A mock implementation of upstream::Client. Serves fixture data in insertion order,
/// counts every call, and can be told to fail a specific user's posts fetch (for
/// all-or-nothing aggregation tests).
#[derive(Clone, Default)]
pub struct Client {
    users: Store<Vec<RawUser>>,
    posts: Store<HashMap<String, Vec<RawPost>>>,
    comments: Store<HashMap<u64, Vec<RawComment>>>,
    fail_posts_for: Store<Option<String>>,
    calls: Store<HashMap<&'static str, usize>>,
}

impl Client {
    pub fn add_user(&self, id: &str, name: &str, posts: Vec<RawPost>) {
        self.users.lock().unwrap().push(RawUser {
            id: id.to_owned(),
            name: name.to_owned(),
        });
        self.posts.lock().unwrap().insert(id.to_owned(), posts);
    }

    pub fn set_comments(&self, post_id: u64, count: usize) {
        let comments = (0..count)
            .map(|n| RawComment {
                id: post_id * 100 + n as u64,
                post_id: Some(post_id),
                content: format!("comment {}", n),
            })
            .collect();
        self.comments.lock().unwrap().insert(post_id, comments);
    }

    /// Make the next posts fetch for this user fail.
    pub fn fail_posts_for(&self, user_id: &str) {
        *self.fail_posts_for.lock().unwrap() = Some(user_id.to_owned());
    }

    pub fn calls(&self, name: &'static str) -> usize {
        *self.calls.lock().unwrap().get(name).unwrap_or(&0)
    }

    fn record(&self, name: &'static str) {
        *self.calls.lock().unwrap().entry(name).or_insert(0) += 1;
    }
}

pub fn post(id: u64, content: &str) -> RawPost {
    RawPost {
        id,
        user_id: None,
        content: content.to_owned(),
    }
}

#[async_trait(?Send)]
impl super::Client for Client {
    async fn list_users(&self) -> Fallible<Vec<RawUser>> {
        self.record("list_users");
        Ok(self.users.lock().unwrap().clone())
    }

    async fn list_posts(&self, user_id: &str) -> Fallible<Vec<RawPost>> {
        self.record("list_posts");
        if self.fail_posts_for.lock().unwrap().as_deref() == Some(user_id) {
            return Err(anyhow!("mock upstream failure for user {}", user_id)
                .describe(External::upstream()));
        }
        match self.posts.lock().unwrap().get(user_id) {
            Some(posts) => Ok(posts.clone()),
            None => {
                Err(anyhow!("mock has no user {}", user_id).describe(External::upstream()))
            }
        }
    }

    async fn list_comments(&self, post_id: u64) -> Fallible<Vec<RawComment>> {
        self.record("list_comments");
        Ok(self
            .comments
            .lock()
            .unwrap()
            .get(&post_id)
            .cloned()
            .unwrap_or_default())
    }
}
