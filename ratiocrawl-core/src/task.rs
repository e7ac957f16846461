use crate::crawl::{CrawlOptions, start_crawl_worker};
use crate::error::Result;
use crate::storage::{DEFAULT_LINK_EXPIRATION, ObjectStore};
use ratiocrawl_scanner::CrawlConfig;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

/// Body of a crawl submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRequest {
    pub url: String,
    pub max_depth: usize,
}

/// Lifecycle of a submitted job as reported by a status query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskState {
    Pending,
    Started,
    Success,
    Failure,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskResult {
    pub s3_link: String,
}

/// Response of a status query: `result` is only present once the job is done
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobStatus {
    pub status: TaskState,
    pub result: Option<TaskResult>,
}

impl JobStatus {
    pub fn pending() -> Self {
        Self {
            status: TaskState::Pending,
            result: None,
        }
    }

    pub fn finished(result: Result<TaskResult>) -> Self {
        match result {
            Ok(result) => Self {
                status: TaskState::Success,
                result: Some(result),
            },
            Err(e) => {
                error!("Crawl task failed: {}", e);
                Self {
                    status: TaskState::Failure,
                    result: None,
                }
            }
        }
    }
}

/// Run a crawl job end to end: crawl into memory, store the output and hand
/// back a time-limited link to it
pub async fn crawl_task<O: ObjectStore>(
    request: &JobRequest,
    store: &O,
    config: CrawlConfig,
) -> Result<TaskResult> {
    info!("Picked up crawl task for {} (max depth {})", request.url, request.max_depth);

    let options = CrawlOptions::new(request.url.clone(), request.max_depth).with_config(config);
    let output = start_crawl_worker(options).await?;

    store.put(&output.file_name, output.bytes).await?;
    let link = store.presign(&output.file_name, DEFAULT_LINK_EXPIRATION).await?;

    Ok(TaskResult { s3_link: link })
}
