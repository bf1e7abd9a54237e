//! Robots.txt parser implementation
//!
//! Allow/disallow matching is delegated to the robotstxt crate; the
//! `Crawl-delay` extension is read here since that crate ignores it.

use robotstxt::DefaultMatcher;
use url::Url;

/// Parsed robots.txt data for the crawl host
#[derive(Debug, Clone, Default)]
pub struct ParsedRobots {
    /// Raw robots.txt content; empty means everything is allowed
    content: String,
}

impl ParsedRobots {
    /// Wraps raw robots.txt content
    pub fn from_content(content: &str) -> Self {
        Self {
            content: content.to_string(),
        }
    }

    /// A permissive policy, used when robots.txt is missing or unreachable
    pub fn allow_all() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.content.trim().is_empty()
    }

    /// Checks whether `user_agent` may fetch `url`
    pub fn is_allowed(&self, url: &Url, user_agent: &str) -> bool {
        if self.is_empty() {
            return true;
        }

        let mut matcher = DefaultMatcher::default();
        matcher.one_agent_allowed_by_robots(&self.content, user_agent, url.as_str())
    }

    /// Reads the `Crawl-delay` (seconds) that applies to `user_agent`
    ///
    /// A group naming the agent wins over the `*` group. Consecutive
    /// `User-agent` lines share one group; any other directive closes the
    /// agent list so the next `User-agent` starts a new group.
    pub fn crawl_delay(&self, user_agent: &str) -> Option<f64> {
        let agent = user_agent.to_lowercase();
        let mut group: Vec<String> = Vec::new();
        let mut group_closed = false;
        let mut for_agent = None;
        let mut for_wildcard = None;

        for line in self.content.lines() {
            let line = line.split('#').next().unwrap_or_default().trim();
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let value = value.trim();

            match key.trim().to_lowercase().as_str() {
                "user-agent" => {
                    if group_closed {
                        group.clear();
                        group_closed = false;
                    }
                    group.push(value.to_lowercase());
                }
                "crawl-delay" => {
                    group_closed = true;
                    let Some(delay) = value
                        .parse::<f64>()
                        .ok()
                        .filter(|d| d.is_finite() && *d >= 0.0)
                    else {
                        continue;
                    };

                    if group.iter().any(|ua| ua != "*" && agent.contains(ua.as_str())) {
                        for_agent.get_or_insert(delay);
                    } else if group.iter().any(|ua| ua == "*") {
                        for_wildcard.get_or_insert(delay);
                    }
                }
                _ => group_closed = true,
            }
        }

        for_agent.or(for_wildcard)
    }
}
