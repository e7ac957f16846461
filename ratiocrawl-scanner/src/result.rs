use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::time::Duration;

/// Deduplicated absolute URLs extracted from one page
pub type LinkSet = HashSet<String>;

/// Header line written before any record
pub const TSV_HEADER: &str = "url\tdepth\tratio\n";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageResult {
    pub url: String,
    pub depth: usize,
    pub same_domain_ratio: f64,
}

impl PageResult {
    pub fn new(url: String, depth: usize, same_domain_ratio: f64) -> Self {
        Self {
            url,
            depth,
            same_domain_ratio,
        }
    }

    /// One tab-separated output line, newline included
    pub fn to_tsv_line(&self) -> String {
        format!("{}\n", self)
    }
}

impl fmt::Display for PageResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}\t{:.2}", self.url, self.depth, self.same_domain_ratio)
    }
}

/// What a finished crawl reports back to its caller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlSummary {
    pub start_url: String,
    pub max_depth: usize,
    pub visited: usize,
    pub records_written: usize,
    pub elapsed: Duration,
}
