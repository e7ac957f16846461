pub mod crawl;
pub mod error;
pub mod storage;
pub mod task;

pub use crawl::{CrawlOptions, CrawlOutput, output_file_name, start_crawl, start_crawl_worker};
pub use error::CoreError;
pub use storage::{LocalStore, ObjectStore};
pub use task::{JobRequest, JobStatus, TaskResult, TaskState, crawl_task};
