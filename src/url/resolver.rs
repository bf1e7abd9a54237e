//! Link resolution and classification
//!
//! Turns the raw `href` values of a page into absolute, same-host URLs and
//! sorts them into pages worth crawling and documents worth downloading.

use crate::crawler::VisitedSet;
use crate::url::{is_same_host, normalize_url};
use std::collections::HashSet;
use url::Url;

/// Path suffixes that mark a downloadable document
pub const DOCUMENT_EXTENSIONS: &[&str] = &[".pdf", ".docx", ".xlsx", ".doc"];

/// Path suffixes of archives that are neither crawled nor downloaded
pub const EXCLUDED_EXTENSIONS: &[&str] = &[".zip", ".tar", ".rar"];

/// What a URL path looks like to the resolver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    Document,
    Excluded,
    Page,
}

/// Classifies a URL path by its (case-insensitive) extension
pub fn classify_path(path: &str) -> LinkKind {
    let lower = path.to_lowercase();
    if DOCUMENT_EXTENSIONS.iter().any(|ext| lower.ends_with(ext)) {
        LinkKind::Document
    } else if EXCLUDED_EXTENSIONS.iter().any(|ext| lower.ends_with(ext)) {
        LinkKind::Excluded
    } else {
        LinkKind::Page
    }
}

/// Links discovered on one page, split by what should happen to them
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedLinks {
    /// Same-host pages not yet visited, in first-seen order
    pub crawlable: Vec<Url>,
    /// Same-host documents, in first-seen order, visited or not
    pub documents: Vec<Url>,
}

impl ResolvedLinks {
    pub fn is_empty(&self) -> bool {
        self.crawlable.is_empty() && self.documents.is_empty()
    }
}

/// Resolves hrefs against a page URL and applies the crawl's link policy
#[derive(Debug, Clone)]
pub struct LinkResolver {
    domain: String,
}

impl LinkResolver {
    /// Creates a resolver that only accepts URLs on `domain`
    pub fn new(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into().to_lowercase(),
        }
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Resolves and classifies every href found on `base`
    ///
    /// # Rules (applied per href, in order)
    ///
    /// 1. Empty and fragment-only hrefs point back at the page itself and
    ///    are dropped; the rest are joined against `base` and normalized,
    ///    and anything that is not http(s) is dropped
    /// 2. URLs whose host differs from the crawl domain are dropped
    /// 3. Paths ending in a document extension become `documents`
    /// 4. Archive paths, already-visited URLs and hrefs naming no path
    ///    (`https://host`) are dropped
    /// 5. Everything else becomes `crawlable`
    ///
    /// Rule 3 runs before rule 4, so a document is never lost to the
    /// visited filter; the coordinator decides whether it still needs
    /// downloading.
    pub fn resolve<'a, I>(&self, base: &Url, hrefs: I, visited: &VisitedSet) -> ResolvedLinks
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut resolved = ResolvedLinks::default();
        let mut seen: HashSet<String> = HashSet::new();

        for href in hrefs {
            let Some(url) = self.absolutize(base, href) else {
                continue;
            };

            if !is_same_host(&url, &self.domain) {
                tracing::debug!("Dropping external link {}", url);
                continue;
            }

            if has_empty_path(href.trim()) {
                tracing::debug!("Dropping link {} without a path", href.trim());
                continue;
            }

            if !seen.insert(url.as_str().to_string()) {
                continue;
            }

            match classify_path(url.path()) {
                LinkKind::Document => resolved.documents.push(url),
                LinkKind::Excluded => {
                    tracing::debug!("Dropping archive link {}", url);
                }
                LinkKind::Page => {
                    if visited.contains(&url) {
                        continue;
                    }
                    resolved.crawlable.push(url);
                }
            }
        }

        resolved
    }

    /// Joins an href against the page URL; `None` if it cannot be crawled
    fn absolutize(&self, base: &Url, href: &str) -> Option<Url> {
        let href = href.trim();
        if href.is_empty() || href.starts_with('#') {
            return None;
        }

        let joined = base.join(href).ok()?;
        match normalize_url(joined.as_str()) {
            Ok(url) => Some(url),
            Err(e) => {
                tracing::debug!("Dropping link {}: {}", href, e);
                None
            }
        }
    }
}

/// True for an absolute or scheme-relative href that names no path at all,
/// such as `https://host` or `//host?lang=en`
///
/// Joining and normalizing rewrite such a path to `/`, so this looks at the
/// raw href.
fn has_empty_path(href: &str) -> bool {
    let after_authority = match href.find("://") {
        Some(i)
            if i > 0
                && href[..i]
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')) =>
        {
            &href[i + 3..]
        }
        _ => match href.strip_prefix("//") {
            Some(rest) => rest,
            None => return false,
        },
    };

    match after_authority.find(|c| matches!(c, '/' | '?' | '#')) {
        Some(i) => !after_authority[i..].starts_with('/'),
        None => true,
    }
}
