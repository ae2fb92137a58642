//! The aggregator's REST surface: four read endpoints over upstream data, one pure
//! computation endpoint. Handlers stay thin; ranking lives in [`crate::aggregate`].

use crate::aggregate::{self, Comment, Post, PostSort, User};
use crate::api::{observe, State};
use crate::errors::{Describe, DescribeErr, External, Fallible};
use crate::upstream::Client;
use actix_web::{web, HttpRequest};
use anyhow::anyhow;
use serde::{Deserialize, Serialize};

pub fn configure<C: Client + 'static>(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/users")
            .route("", web::get().to(list_top_users::<C>))
            .route("/{user_id}/posts", web::get().to(list_user_posts::<C>)),
    )
    .service(
        web::scope("/posts")
            .route("", web::get().to(list_trending_posts::<C>))
            .route("/{post_id}/comments", web::get().to(list_post_comments::<C>)),
    )
    .service(web::resource("/calculate-average").route(web::post().to(calculate_average::<C>)));
}

// Top five users by post count
async fn list_top_users<C: Client>(state: web::Data<State<C>>) -> Fallible<web::Json<Vec<User>>> {
    observe("list_top_users", || async {
        let users = aggregate::top_users(&state.upstream).await?;
        Ok(web::Json(users))
    })
    .await
}

// Passthrough of one user's posts
async fn list_user_posts<C: Client>(
    state: web::Data<State<C>>,
    user_id: web::Path<String>,
) -> Fallible<web::Json<Vec<Post>>> {
    observe("list_user_posts", || async {
        let posts = aggregate::user_posts(&state.upstream, &user_id).await?;
        Ok(web::Json(posts))
    })
    .await
}

/// Filter users can specify via `/posts?type=`.
#[derive(Default, Deserialize, Debug, Eq, PartialEq)]
pub struct PostsQuery {
    #[serde(rename = "type", default)]
    pub sort: PostSort,
}

// Top ten posts, latest or popular
async fn list_trending_posts<C: Client>(
    state: web::Data<State<C>>,
    query: web::Query<PostsQuery>,
) -> Fallible<web::Json<Vec<Post>>> {
    observe("list_trending_posts", || async {
        let posts = aggregate::trending_posts(&state.upstream, query.sort).await?;
        Ok(web::Json(posts))
    })
    .await
}

// Passthrough of one post's comments
async fn list_post_comments<C: Client>(
    state: web::Data<State<C>>,
    post_id: web::Path<String>,
) -> Fallible<web::Json<Vec<Comment>>> {
    observe("list_post_comments", || async {
        let post_id: u64 = post_id
            .parse()
            .map_err(|e| anyhow!("bad post id {:?}: {}", post_id.as_str(), e))
            .describe_err(External::invalid("post id must be numeric"))?;
        let comments = aggregate::post_comments(&state.upstream, post_id).await?;
        Ok(web::Json(comments))
    })
    .await
}

#[derive(Serialize, Deserialize)]
pub struct AverageBody {
    pub numbers: Vec<f64>,
}

#[derive(Serialize, Deserialize)]
pub struct AverageResponse {
    pub average: f64,
}

// The one endpoint with no upstream involvement
async fn calculate_average<C: Client>(
    _state: web::Data<State<C>>,
    body: web::Json<AverageBody>,
) -> Fallible<web::Json<AverageResponse>> {
    observe("calculate_average", || async {
        let average = aggregate::average(&body.numbers)?;
        Ok(web::Json(AverageResponse { average }))
    })
    .await
}

/// Turns JSON extractor failures (e.g. `numbers` not being an array) into the same
/// two-faced 400 the rest of the API serves.
pub fn json_error_handler(
    err: actix_web::error::JsonPayloadError,
    _req: &HttpRequest,
) -> actix_web::Error {
    anyhow!("rejecting request body: {}", err)
        .describe(External::invalid(
            "body must be a JSON object with a \"numbers\" array",
        ))
        .into()
}
