use crate::error::Result;
use chrono::{DateTime, Utc};
use ratiocrawl_scanner::config::DEFAULT_URL_PROTOCOL;
use ratiocrawl_scanner::{
    CrawlConfig, CrawlSummary, Crawler, FileSink, MemorySink, ResultCallback, add_protocol,
};
use std::path::Path;
use tracing::info;
use url::Url;
use uuid::Uuid;

/// Options for configuring a crawl job
pub struct CrawlOptions {
    pub url: String,
    pub max_depth: usize,
    /// Scheme prepended when `url` has none
    pub scheme: String,
    pub config: CrawlConfig,
    pub result_callback: Option<ResultCallback>,
}

impl CrawlOptions {
    pub fn new(url: impl Into<String>, max_depth: usize) -> Self {
        Self {
            url: url.into(),
            max_depth,
            scheme: DEFAULT_URL_PROTOCOL.to_string(),
            config: CrawlConfig::default(),
            result_callback: None,
        }
    }

    pub fn with_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = scheme.into();
        self
    }

    pub fn with_config(mut self, config: CrawlConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_result_callback(mut self, callback: ResultCallback) -> Self {
        self.result_callback = Some(callback);
        self
    }

    /// Start URL after protocol normalization
    pub fn start_url(&self) -> String {
        add_protocol(&self.url, &self.scheme)
    }

    fn build_crawler(&self) -> Result<Crawler> {
        let mut crawler = Crawler::new(self.config.clone())?.with_max_depth(self.max_depth);
        if let Some(ref callback) = self.result_callback {
            crawler = crawler.with_result_callback(callback.clone());
        }
        Ok(crawler)
    }
}

/// A finished in-memory crawl, ready to hand to an object store
#[derive(Debug)]
pub struct CrawlOutput {
    pub bytes: Vec<u8>,
    pub file_name: String,
    pub summary: CrawlSummary,
}

/// Crawl into a TSV file at `output`, replacing whatever was there
pub async fn start_crawl(options: CrawlOptions, output: &Path) -> Result<CrawlSummary> {
    let start_url = options.start_url();
    let crawler = options.build_crawler()?;

    let sink = FileSink::create(output).await?;
    let summary = crawler.crawl(&start_url, &sink).await?;

    info!("Number of URLs traversed: {}", summary.visited);
    info!("Elapsed time: {:?}", summary.elapsed);
    Ok(summary)
}

/// Crawl into an in-memory buffer and name the result after the start URL
pub async fn start_crawl_worker(options: CrawlOptions) -> Result<CrawlOutput> {
    let start_url = options.start_url();
    let crawler = options.build_crawler()?;

    let sink = MemorySink::new();
    let summary = crawler.crawl(&start_url, &sink).await?;

    info!("Number of URLs traversed: {}", summary.visited);
    info!("Elapsed time: {:?}", summary.elapsed);
    Ok(CrawlOutput {
        bytes: sink.into_inner(),
        file_name: output_file_name(&start_url),
        summary,
    })
}

/// Object name for a crawl of `url`: `<host>_<utc timestamp>_<short id>.tsv`
pub fn output_file_name(url: &str) -> String {
    output_file_name_at(url, Utc::now(), Uuid::new_v4())
}

pub fn output_file_name_at(url: &str, at: DateTime<Utc>, id: Uuid) -> String {
    let host = Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(sanitize_host))
        .filter(|host| !host.is_empty())
        .unwrap_or_else(|| "unknown".to_string());

    let short_id: String = id.simple().to_string().chars().take(8).collect();
    format!("{}_{}_{}.tsv", host, at.format("%Y%m%dT%H%M%SZ"), short_id)
}

fn sanitize_host(host: &str) -> String {
    host.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 5, 7, 8, 9).unwrap()
    }

    #[test]
    fn test_start_url_gets_default_scheme() {
        assert_eq!(CrawlOptions::new("example.com", 2).start_url(), "https://example.com");
        assert_eq!(
            CrawlOptions::new("example.com", 2).with_scheme("http").start_url(),
            "http://example.com"
        );
        assert_eq!(CrawlOptions::new("http://x.test/", 2).start_url(), "http://x.test/");
    }

    #[test]
    fn test_output_file_name_format() {
        let id = Uuid::parse_str("a1b2c3d4-0000-4000-8000-000000000000").unwrap();
        assert_eq!(
            output_file_name_at("https://example.com/path?q=1", fixed_time(), id),
            "example.com_20240305T070809Z_a1b2c3d4.tsv"
        );
    }

    #[test]
    fn test_output_file_name_ipv6_and_missing_host() {
        let id = Uuid::nil();
        assert_eq!(
            output_file_name_at("http://[::1]:8080/", fixed_time(), id),
            "___1__20240305T070809Z_00000000.tsv"
        );
        assert_eq!(
            output_file_name_at("not a url", fixed_time(), id),
            "unknown_20240305T070809Z_00000000.tsv"
        );
    }

    #[test]
    fn test_output_file_names_are_unique() {
        assert_ne!(
            output_file_name("https://example.com"),
            output_file_name("https://example.com")
        );
    }
}
