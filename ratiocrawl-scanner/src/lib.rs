pub mod config;
pub mod crawler;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod metric;
pub mod normalize;
pub mod result;
pub mod sink;

pub use config::{CrawlConfig, RetryPolicy};
pub use crawler::{Crawler, ResultCallback};
pub use error::ScanError;
pub use extract::fetch_links;
pub use fetch::Fetcher;
pub use metric::same_domain_ratio;
pub use normalize::{add_default_protocol, add_protocol};
pub use result::{CrawlSummary, LinkSet, PageResult};
pub use sink::{FileSink, MemorySink, OutputSink};
