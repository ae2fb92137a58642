//! The HTTP implementation of [`upstream::Client`](crate::upstream::Client), backed by awc.
//!
//! One instance is built per actix worker (awc clients are not `Send`), holding the base URL
//! and the bearer token. The token is immutable: if upstream starts answering 401, every call
//! fails with `AuthExpired` until the process restarts and re-authenticates.

use crate::config::{AuthProfile, Credentials};
use crate::errors::{Describe, DescribeErr, External, Fallible};
use crate::metrics;
use crate::upstream::structs::{
    CommentsEnvelope, PostsEnvelope, RawComment, RawPost, RawUser, UsersEnvelope,
};
use anyhow::anyhow;
use async_trait::async_trait;
use awc::http::{header, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use url::Url;

#[derive(Clone)]
pub struct EvalClient {
    http: awc::Client,
    base: Url,
    token: String,
}

impl EvalClient {
    pub fn new(base: Url, token: String) -> Self {
        Self {
            http: awc::Client::new(),
            base: with_trailing_slash(base),
            token,
        }
    }

    /// GET a JSON document from upstream, recording call latency and translating every
    /// failure mode (transport, status, decode) into a two-faced error.
    async fn get_json<T: DeserializeOwned>(&self, path: &str, call: &'static str) -> Fallible<T> {
        let url = self
            .base
            .join(path)
            .map_err(|e| anyhow!("building upstream URL for {}: {}", path, e))?;
        let timer = metrics::UPSTREAM_SECS
            .with_label_values(&[call])
            .start_timer();
        let response = self
            .http
            .get(url.as_str())
            .header(header::AUTHORIZATION, format!("Bearer {}", self.token))
            .send()
            .await;
        timer.observe_duration();

        // awc errors aren't Send, so they're formatted rather than wrapped.
        let mut response = response
            .map_err(|e| anyhow!("GET {}: {}", url, e).describe(External::upstream()))?;
        match response.status() {
            status if status.is_success() => response
                .json::<T>()
                .limit(1024 * 1024)
                .await
                .map_err(|e| anyhow!("decoding GET {} body: {}", url, e))
                .describe_err(External::upstream()),
            StatusCode::UNAUTHORIZED => {
                Err(anyhow!("GET {} returned 401", url).describe(External::auth_expired()))
            }
            status => {
                Err(anyhow!("GET {} returned {}", url, status).describe(External::upstream()))
            }
        }
    }
}

#[async_trait(?Send)]
impl super::Client for EvalClient {
    async fn list_users(&self) -> Fallible<Vec<RawUser>> {
        let envelope: UsersEnvelope = self.get_json("users", "list_users").await?;
        Ok(envelope.into_users())
    }

    async fn list_posts(&self, user_id: &str) -> Fallible<Vec<RawPost>> {
        let envelope: PostsEnvelope = self
            .get_json(&format!("users/{}/posts", user_id), "list_posts")
            .await?;
        Ok(envelope.posts)
    }

    async fn list_comments(&self, post_id: u64) -> Fallible<Vec<RawComment>> {
        let envelope: CommentsEnvelope = self
            .get_json(&format!("posts/{}/comments", post_id), "list_comments")
            .await?;
        Ok(envelope.comments)
    }
}

/// Exchange the registration profile and client credentials for a bearer token.
/// Called once at startup, before the server accepts traffic.
pub async fn authenticate(
    base: &Url,
    profile: &AuthProfile,
    credentials: &Credentials,
) -> Fallible<String> {
    let url = with_trailing_slash(base.clone())
        .join("auth")
        .map_err(|e| anyhow!("building upstream auth URL: {}", e))?;
    let body = AuthRequest {
        email: &profile.email,
        name: &profile.name,
        roll_no: &profile.roll_no,
        access_code: &profile.access_code,
        client_id: &credentials.client_id,
        client_secret: &credentials.client_secret,
    };
    let mut response = awc::Client::new()
        .post(url.as_str())
        .send_json(&body)
        .await
        .map_err(|e| anyhow!("POST {}: {}", url, e).describe(External::upstream()))?;
    if !response.status().is_success() {
        return Err(
            anyhow!("POST {} returned {}", url, response.status()).describe(External::upstream())
        );
    }
    let granted: AuthResponse = response
        .json()
        .await
        .map_err(|e| anyhow!("decoding auth response: {}", e))
        .describe_err(External::upstream())?;
    Ok(granted.access_token)
}

#[derive(Serialize)]
struct AuthRequest<'a> {
    email: &'a str,
    name: &'a str,
    #[serde(rename = "rollNo")]
    roll_no: &'a str,
    #[serde(rename = "accessCode")]
    access_code: &'a str,
    #[serde(rename = "clientID")]
    client_id: &'a str,
    #[serde(rename = "clientSecret")]
    client_secret: &'a str,
}

#[derive(Deserialize)]
struct AuthResponse {
    access_token: String,
}

/// `Url::join` treats the last path segment as a file unless the path ends in '/'.
fn with_trailing_slash(mut base: Url) -> Url {
    if !base.path().ends_with('/') {
        base.set_path(&format!("{}/", base.path()));
    }
    base
}
