use crate::config::CrawlConfig;
use crate::error::Result;
use crate::extract::fetch_links;
use crate::fetch::Fetcher;
use crate::metric::same_domain_ratio;
use crate::result::{CrawlSummary, PageResult};
use crate::sink::OutputSink;
use futures::future::{BoxFuture, FutureExt, try_join_all};
use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;
use tokio::sync::{Mutex, Semaphore};
use tracing::{debug, info};
use url::Url;

/// Called with every record right after it reaches the sink
pub type ResultCallback = Arc<dyn Fn(&PageResult) + Send + Sync>;

/// Depth-bounded recursive crawler.
///
/// Each page that comes back with content produces one [`PageResult`] in the
/// sink; its links are then crawled concurrently one level deeper. The root
/// sits at depth 1, so a `max_depth` of 1 records the start page only.
pub struct Crawler {
    fetcher: Fetcher,
    in_flight: Semaphore,
    max_depth: usize,
    result_callback: Option<ResultCallback>,
}

/// Per-call traversal state shared by every branch of one crawl
struct Frontier<'a, S> {
    visited: Mutex<HashSet<String>>,
    records_written: AtomicUsize,
    max_depth: usize,
    sink: &'a S,
}

impl<S> Frontier<'_, S> {
    /// Insert-if-absent: true only for the first branch to claim `url`
    async fn claim(&self, url: &str) -> bool {
        self.visited.lock().await.insert(url.to_string())
    }
}

impl Crawler {
    pub fn new(config: CrawlConfig) -> Result<Self> {
        Ok(Self {
            fetcher: Fetcher::new(&config)?,
            in_flight: Semaphore::new(config.max_in_flight.max(1)),
            max_depth: 1,
            result_callback: None,
        })
    }

    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn with_result_callback(mut self, callback: ResultCallback) -> Self {
        self.result_callback = Some(callback);
        self
    }

    /// Crawl from `start_url` until the frontier or the depth budget runs out.
    ///
    /// Per-page failures are logged and skipped. The only error returned is a
    /// failed sink write, which aborts the remaining branches; records written
    /// before it stay in the sink.
    ///
    /// The start URL is serialized the same way extracted links are, so the
    /// root scores and dedups against its own children.
    pub async fn crawl<S: OutputSink>(&self, start_url: &str, sink: &S) -> Result<CrawlSummary> {
        let start_url = Url::parse(start_url)
            .map(String::from)
            .unwrap_or_else(|_| start_url.to_string());
        info!("Starting crawl of {} to depth {}", start_url, self.max_depth);
        let start = Instant::now();

        let frontier = Frontier {
            visited: Mutex::new(HashSet::new()),
            records_written: AtomicUsize::new(0),
            max_depth: self.max_depth,
            sink,
        };

        self.crawl_branch(&frontier, start_url.clone(), 1).await?;

        let visited = frontier.visited.lock().await.len();
        let summary = CrawlSummary {
            start_url,
            max_depth: self.max_depth,
            visited,
            records_written: frontier.records_written.load(Ordering::Relaxed),
            elapsed: start.elapsed(),
        };
        info!(
            "Crawl complete. Visited {} URLs, wrote {} records in {:?}",
            summary.visited, summary.records_written, summary.elapsed
        );
        Ok(summary)
    }

    fn crawl_branch<'a, S: OutputSink>(
        &'a self,
        frontier: &'a Frontier<'a, S>,
        url: String,
        depth: usize,
    ) -> BoxFuture<'a, Result<()>> {
        async move {
            if depth > frontier.max_depth || !frontier.claim(&url).await {
                return Ok(());
            }

            let body = {
                // The semaphore is never closed
                let Ok(_permit) = self.in_flight.acquire().await else {
                    return Ok(());
                };
                self.fetcher.fetch_page(&url).await
            };
            let Some(body) = body.filter(|body| !body.is_empty()) else {
                debug!("No content for {}, ending branch", url);
                return Ok(());
            };

            let links = fetch_links(&body, &url);
            let ratio = same_domain_ratio(&url, &links);
            let record = PageResult::new(url, depth, ratio);

            frontier.sink.write_record(&record).await?;
            frontier.records_written.fetch_add(1, Ordering::Relaxed);
            if let Some(ref callback) = self.result_callback {
                callback(&record);
            }

            debug!("{} links to follow from {}", links.len(), record.url);
            try_join_all(
                links
                    .into_iter()
                    .map(|link| self.crawl_branch(frontier, link, depth + 1)),
            )
            .await?;

            Ok(())
        }
        .boxed()
    }
}
