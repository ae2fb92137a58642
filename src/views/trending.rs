use crate::aggregate::{Comment, Post, PostSort};
use crate::views::{Api, Phase};
use std::collections::HashMap;

/// The trending-posts view. The filter drives a re-fetch on every change; comments are
/// fetched lazily per post and cached for the life of the view, so re-expanding a post
/// never re-fetches. A failed comments fetch is not cached and may be retried.
pub struct TrendingView {
    filter: PostSort,
    phase: Phase<Vec<Post>>,
    comments: HashMap<String, Vec<Comment>>,
    expanded: Option<String>,
}

impl TrendingView {
    pub fn new() -> Self {
        Self {
            filter: PostSort::default(),
            phase: Phase::Loading,
            comments: HashMap::new(),
            expanded: None,
        }
    }

    pub fn filter(&self) -> PostSort {
        self.filter
    }

    /// Fetch the post list for the current filter.
    pub async fn refresh<A: Api>(&mut self, api: &A) {
        self.phase = Phase::from_result(api.trending_posts(self.filter).await);
    }

    /// Switch filter and re-fetch, even if the filter didn't change.
    pub async fn set_filter<A: Api>(&mut self, api: &A, filter: PostSort) {
        self.filter = filter;
        self.refresh(api).await;
    }

    /// Expand or collapse one post's comments panel. The first expansion fetches the
    /// comments; afterwards the cached copy is used.
    pub async fn toggle_comments<A: Api>(&mut self, api: &A, post_id: &str) {
        if self.expanded.as_deref() == Some(post_id) {
            self.expanded = None;
            return;
        }
        self.expanded = Some(post_id.to_owned());
        if self.comments.contains_key(post_id) {
            return;
        }
        if let Ok(comments) = api.post_comments(post_id).await {
            self.comments.insert(post_id.to_owned(), comments);
        }
    }

    pub fn render(&self) -> String {
        let posts = match &self.phase {
            Phase::Loading => return "Loading posts...\n".to_owned(),
            Phase::Failed => return "Failed to fetch posts. Please try again later.\n".to_owned(),
            Phase::Ready(posts) => posts,
        };
        let mut out = match self.filter {
            PostSort::Latest => String::from("Latest Posts\n"),
            PostSort::Popular => String::from("Popular Posts\n"),
        };
        for post in posts {
            out.push_str(&format!(" [{}] User {}: {}", post.id, post.user_id, post.content));
            if let Some(count) = post.comment_count {
                out.push_str(&format!(" ({} comments)", count));
            }
            out.push('\n');
            if self.expanded.as_deref() == Some(post.id.as_str()) {
                match self.comments.get(&post.id) {
                    Some(comments) if comments.is_empty() => out.push_str("    No comments yet.\n"),
                    Some(comments) => {
                        for comment in comments {
                            out.push_str(&format!("    - {}\n", comment.content));
                        }
                    }
                    None => out.push_str("    Couldn't load comments.\n"),
                }
            }
        }
        out
    }
}

impl Default for TrendingView {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::mock::MockApi;

    fn post(id: &str, comment_count: Option<usize>) -> Post {
        Post {
            id: id.to_owned(),
            user_id: "1".to_owned(),
            content: format!("post {}", id),
            comment_count,
        }
    }

    fn comment(content: &str) -> Comment {
        Comment {
            id: "9".to_owned(),
            content: content.to_owned(),
        }
    }

    fn api() -> MockApi {
        let mut api = MockApi::default();
        api.posts
            .insert("latest", vec![post("300", None), post("42", None)]);
        api.posts.insert("popular", vec![post("42", Some(7))]);
        api.comments
            .insert("42".to_owned(), vec![comment("first"), comment("second")]);
        api
    }

    #[actix_rt::test]
    async fn test_filter_change_refetches() {
        let api = api();
        let mut view = TrendingView::new();
        view.refresh(&api).await;
        assert_eq!(api.calls("trending_posts:latest"), 1);
        assert!(view.render().starts_with("Latest Posts"));

        view.set_filter(&api, PostSort::Popular).await;
        assert_eq!(api.calls("trending_posts:popular"), 1);
        assert!(view.render().contains("(7 comments)"));

        // Selecting the same filter again still re-fetches.
        view.set_filter(&api, PostSort::Popular).await;
        assert_eq!(api.calls("trending_posts:popular"), 2);
    }

    #[actix_rt::test]
    async fn test_comments_fetched_once_per_post() {
        let api = api();
        let mut view = TrendingView::new();
        view.refresh(&api).await;

        view.toggle_comments(&api, "42").await;
        assert_eq!(api.calls("post_comments:42"), 1);
        assert!(view.render().contains("- first"));

        // Collapse, then re-expand: the cache is hit, no second request.
        view.toggle_comments(&api, "42").await;
        assert!(!view.render().contains("- first"));
        view.toggle_comments(&api, "42").await;
        assert_eq!(api.calls("post_comments:42"), 1);
        assert!(view.render().contains("- second"));
    }

    #[actix_rt::test]
    async fn test_failed_comment_fetch_is_not_cached() {
        let mut api = api();
        api.fail = true;
        let mut view = TrendingView::new();
        view.phase = Phase::Ready(vec![post("42", None)]);

        view.toggle_comments(&api, "42").await;
        assert_eq!(api.calls("post_comments:42"), 1);
        assert!(view.render().contains("Couldn't load comments"));

        // The failure wasn't cached, so a retry issues a fresh request.
        api.fail = false;
        view.toggle_comments(&api, "42").await; // collapse
        view.toggle_comments(&api, "42").await; // expand again
        assert_eq!(api.calls("post_comments:42"), 2);
    }

    #[actix_rt::test]
    async fn test_empty_comments_render() {
        let api = api();
        let mut view = TrendingView::new();
        view.refresh(&api).await;
        view.toggle_comments(&api, "300").await;
        assert!(view.render().contains("No comments yet."));
    }
}
