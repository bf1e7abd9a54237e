//! Robots.txt handling module
//!
//! The crawl is confined to one host, so robots.txt is fetched once at the
//! start of a run and consulted for every page afterwards.

mod parser;

pub use parser::ParsedRobots;

use crate::crawler::fetch_page;
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Fetches robots.txt for the host of `base`
///
/// A missing, failing or unreachable robots.txt allows everything.
pub async fn fetch_robots(client: &Client, base: &Url, timeout: Duration) -> ParsedRobots {
    let robots_url = match base.join("/robots.txt") {
        Ok(u) => u,
        Err(_) => return ParsedRobots::allow_all(),
    };

    match fetch_page(client, &robots_url, timeout).await {
        Ok(page) => {
            tracing::debug!("Loaded robots.txt from {}", robots_url);
            ParsedRobots::from_content(&page.body)
        }
        Err(e) => {
            tracing::debug!("No usable robots.txt ({}), allowing all", e);
            ParsedRobots::allow_all()
        }
    }
}
