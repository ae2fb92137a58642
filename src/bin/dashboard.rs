//! One-shot CLI front end for the three dashboard views. Renders a single view against a
//! running aggregator and exits.
//!
//! Usage:
//!   dashboard <base-url> users
//!   dashboard <base-url> latest|popular [post-id-to-expand]
//!   dashboard <base-url> average <number>...

use pulseboard::aggregate::PostSort;
use pulseboard::views::rest::RestApi;
use pulseboard::views::{CalculatorView, TopUsersView, TrendingView};
use url::Url;

#[actix_rt::main]
async fn main() {
    let args: Vec<String> = std::env::args().collect();
    let (base, view) = match (args.get(1), args.get(2)) {
        (Some(base), Some(view)) => (base, view.as_str()),
        _ => {
            eprintln!("usage: dashboard <base-url> <users|latest|popular|average> [args...]");
            return;
        }
    };
    let base = match Url::parse(base) {
        Ok(url) => url,
        Err(e) => {
            eprintln!("invalid base URL: {}", e);
            return;
        }
    };
    let api = RestApi::new(base);

    match view {
        "users" => {
            let mut view = TopUsersView::new();
            view.load(&api).await;
            print!("{}", view.render());
        }
        "latest" | "popular" => {
            let sort = if view == "popular" {
                PostSort::Popular
            } else {
                PostSort::Latest
            };
            let mut view = TrendingView::new();
            view.set_filter(&api, sort).await;
            if let Some(post_id) = args.get(3) {
                view.toggle_comments(&api, post_id).await;
            }
            print!("{}", view.render());
        }
        "average" => {
            let mut view = CalculatorView::new();
            for arg in &args[3..] {
                match arg.parse() {
                    Ok(n) => view.add(n),
                    Err(_) => {
                        eprintln!("not a number: {:?}", arg);
                        return;
                    }
                }
            }
            view.calculate(&api).await;
            print!("{}", view.render());
        }
        other => eprintln!("unknown view {:?}", other),
    }
}
