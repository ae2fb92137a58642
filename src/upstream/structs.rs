//! Wire types for the evaluation service. These mirror upstream's JSON exactly and never
//! reach API clients; the aggregation layer reshapes them first.

use serde::Deserialize;

/// A user, flattened out of upstream's `{"users": {id: name}}` map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawUser {
    pub id: String,
    pub name: String,
}

/// Response body of upstream `GET /users`. The map is an id -> name object; serde_json's
/// preserve_order feature keeps upstream's ordering, which the top-users ranking relies on
/// for stable ties.
#[derive(Deserialize, Debug)]
pub struct UsersEnvelope {
    pub users: serde_json::Map<String, serde_json::Value>,
}

impl UsersEnvelope {
    /// Flatten the id -> name map into an ordered list.
    pub fn into_users(self) -> Vec<RawUser> {
        self.users
            .into_iter()
            .map(|(id, name)| RawUser {
                id,
                name: match name.as_str() {
                    Some(s) => s.to_owned(),
                    None => name.to_string(),
                },
            })
            .collect()
    }
}

/// Response body of upstream `GET /users/{id}/posts`.
#[derive(Deserialize, Debug)]
pub struct PostsEnvelope {
    pub posts: Vec<RawPost>,
}

/// A post as upstream serves it. Ids are numeric on the wire; larger means more recent.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RawPost {
    pub id: u64,
    #[serde(rename = "userid", default)]
    pub user_id: Option<u64>,
    pub content: String,
}

/// Response body of upstream `GET /posts/{id}/comments`.
#[derive(Deserialize, Debug)]
pub struct CommentsEnvelope {
    pub comments: Vec<RawComment>,
}

/// A comment as upstream serves it.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RawComment {
    pub id: u64,
    #[serde(rename = "postid", default)]
    pub post_id: Option<u64>,
    pub content: String,
}
