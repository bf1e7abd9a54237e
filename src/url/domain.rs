use url::Url;

/// Extracts the lowercase host of a URL
///
/// # Examples
///
/// ```
/// use url::Url;
/// use portal_harvest::url::extract_domain;
///
/// let url = Url::parse("https://WWW.MOSDAC.GOV.IN/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("www.mosdac.gov.in".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Strict same-host check used as the crawl's origin filter
///
/// The host string must equal `domain` exactly (ignoring ASCII case).
/// Subdomains never match implicitly and the port is not compared.
pub fn is_same_host(url: &Url, domain: &str) -> bool {
    url.host_str()
        .is_some_and(|host| host.eq_ignore_ascii_case(domain))
}
