//! The awc-backed [`Api`] implementation used by the CLI dashboard.

use crate::aggregate::{Comment, Post, PostSort, User};
use crate::api::handlers::{AverageBody, AverageResponse};
use crate::views::Api;
use anyhow::anyhow;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use url::Url;

#[derive(Clone)]
pub struct RestApi {
    http: awc::Client,
    base: Url,
}

impl RestApi {
    pub fn new(mut base: Url) -> Self {
        if !base.path().ends_with('/') {
            base.set_path(&format!("{}/", base.path()));
        }
        Self {
            http: awc::Client::new(),
            base,
        }
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> anyhow::Result<T> {
        let url = self.base.join(path)?;
        let mut response = self
            .http
            .get(url.as_str())
            .send()
            .await
            .map_err(|e| anyhow!("GET {}: {}", url, e))?;
        if !response.status().is_success() {
            return Err(anyhow!("GET {} returned {}", url, response.status()));
        }
        response
            .json()
            .await
            .map_err(|e| anyhow!("decoding GET {} body: {}", url, e))
    }
}

#[async_trait(?Send)]
impl Api for RestApi {
    async fn top_users(&self) -> anyhow::Result<Vec<User>> {
        self.get("users").await
    }

    async fn trending_posts(&self, sort: PostSort) -> anyhow::Result<Vec<Post>> {
        self.get(&format!("posts?type={}", sort.as_str())).await
    }

    async fn post_comments(&self, post_id: &str) -> anyhow::Result<Vec<Comment>> {
        self.get(&format!("posts/{}/comments", post_id)).await
    }

    async fn average(&self, numbers: &[f64]) -> anyhow::Result<f64> {
        let url = self.base.join("calculate-average")?;
        let mut response = self
            .http
            .post(url.as_str())
            .send_json(&AverageBody {
                numbers: numbers.to_vec(),
            })
            .await
            .map_err(|e| anyhow!("POST {}: {}", url, e))?;
        if !response.status().is_success() {
            return Err(anyhow!("POST {} returned {}", url, response.status()));
        }
        let body: AverageResponse = response
            .json()
            .await
            .map_err(|e| anyhow!("decoding average response: {}", e))?;
        Ok(body.average)
    }
}
