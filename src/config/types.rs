use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration structure for Portal-Harvest
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// URLs the crawl starts from, all at depth 0
    pub seeds: Vec<String>,

    /// Host every crawled URL must match exactly
    pub domain: String,

    /// Maximum depth to crawl from seed URLs
    #[serde(rename = "max-depth")]
    pub max_depth: u32,

    /// Pause between successive page fetches (seconds)
    #[serde(rename = "politeness-delay", default = "default_politeness_delay")]
    pub politeness_delay: f64,

    /// Maximum number of jobs in flight at once
    #[serde(default = "default_workers")]
    pub workers: u32,

    /// Timeout for HTML page requests (seconds)
    #[serde(rename = "page-timeout", default = "default_page_timeout")]
    pub page_timeout: u64,

    /// Timeout for document downloads (seconds)
    #[serde(rename = "document-timeout", default = "default_document_timeout")]
    pub document_timeout: u64,

    /// Upper bound on a single downloaded document
    #[serde(rename = "max-document-bytes", default = "default_max_document_bytes")]
    pub max_document_bytes: u64,

    /// Whether robots.txt of the crawl host is honoured
    #[serde(rename = "respect-robots-txt", default = "default_true")]
    pub respect_robots_txt: bool,

    /// CSS selectors of main-content containers, tried in order
    #[serde(
        rename = "main-content-selectors",
        default = "default_main_content_selectors"
    )]
    pub main_content_selectors: Vec<String>,
}

impl CrawlerConfig {
    /// Pause between page fetches; zero if the value is not a valid duration
    pub fn politeness_delay(&self) -> Duration {
        Duration::try_from_secs_f64(self.politeness_delay).unwrap_or(Duration::ZERO)
    }

    pub fn page_timeout(&self) -> Duration {
        Duration::from_secs(self.page_timeout)
    }

    pub fn document_timeout(&self) -> Duration {
        Duration::from_secs(self.document_timeout)
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

impl UserAgentConfig {
    /// Formats the User-Agent header: `Name/Version (+ContactURL; ContactEmail)`
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{}; {})",
            self.crawler_name, self.crawler_version, self.contact_url, self.contact_email
        )
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory that receives `web_pages/` and `documents/`
    pub root: PathBuf,

    /// What happens when two URLs derive the same file name
    #[serde(rename = "collision-policy", default)]
    pub collision_policy: CollisionPolicy,

    /// Markdown run report, relative to `root`
    #[serde(rename = "summary-file", default)]
    pub summary_file: Option<String>,
}

/// How the artifact store names files whose derived names collide
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CollisionPolicy {
    /// Later writes replace earlier ones
    #[default]
    Overwrite,
    /// A short hash of the full URL is appended to every derived name
    HashSuffix,
}

fn default_politeness_delay() -> f64 {
    0.5
}

fn default_workers() -> u32 {
    1
}

fn default_page_timeout() -> u64 {
    15
}

fn default_document_timeout() -> u64 {
    30
}

fn default_max_document_bytes() -> u64 {
    100 * 1024 * 1024
}

fn default_true() -> bool {
    true
}

fn default_main_content_selectors() -> Vec<String> {
    vec!["div.main-content".to_string()]
}
