//! Fetching, caching, and evaluating robots.txt.
//!
//! A domain's robots.txt is fetched at most once per TTL window across the
//! whole worker pool — see [`cache::RobotsCache`] — and an unreachable or
//! erroring robots.txt is treated as empty (allow all), matching how
//! browsers and well-behaved crawlers degrade.

mod cache;
mod parser;

pub use cache::RobotsCache;
pub use parser::ParsedRobots;

use url::Url;

const FETCH_TIMEOUT_SECONDS: u64 = 10;

/// Fetches (or serves from cache) and parses robots.txt for the domain that
/// `page_url` belongs to.
pub async fn fetch_robots(client: &reqwest::Client, cache: &RobotsCache, page_url: &Url) -> ParsedRobots {
    let Some(domain) = page_url.host_str() else {
        return ParsedRobots::allow_all();
    };
    let domain = domain.to_lowercase();

    if let Ok(Some(cached)) = cache.get(&domain).await {
        return ParsedRobots::from_content(&cached);
    }

    let robots_url = robots_url_for(page_url);
    let body = fetch_robots_body(client, &robots_url).await;
    let _ = cache.put(&domain, &body).await;
    ParsedRobots::from_content(&body)
}

fn robots_url_for(page_url: &Url) -> String {
    let mut url = page_url.clone();
    url.set_path("/robots.txt");
    url.set_query(None);
    url.set_fragment(None);
    url.into()
}

async fn fetch_robots_body(client: &reqwest::Client, robots_url: &str) -> String {
    let request = match client
        .get(robots_url)
        .timeout(std::time::Duration::from_secs(FETCH_TIMEOUT_SECONDS))
        .send()
        .await
    {
        Ok(resp) => resp,
        Err(_) => return String::new(),
    };
    if request.status().as_u16() >= 400 {
        return String::new();
    }
    request.text().await.unwrap_or_default()
}

/// Checks if `url` is allowed by `robots` for `user_agent`.
pub fn is_allowed(robots: &ParsedRobots, url: &str, user_agent: &str) -> bool {
    robots.is_allowed(url, user_agent)
}
