use crate::error::{Result, ScanError};
use crate::result::{PageResult, TSV_HEADER};
use std::future::Future;
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

/// Append-only destination for crawl records.
///
/// Implementations must write each record whole before starting the next,
/// since sibling branches call `write_record` concurrently.
pub trait OutputSink: Send + Sync {
    fn write_record(&self, record: &PageResult) -> impl Future<Output = Result<()>> + Send;
}

/// Records appended to a TSV file on disk
pub struct FileSink {
    path: PathBuf,
    file: Mutex<File>,
}

impl FileSink {
    /// Create (or truncate) `path` and write the header line
    pub async fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut file = File::create(&path).await.map_err(ScanError::Sink)?;
        file.write_all(TSV_HEADER.as_bytes()).await.map_err(ScanError::Sink)?;
        file.flush().await.map_err(ScanError::Sink)?;

        Ok(Self {
            path,
            file: Mutex::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl OutputSink for FileSink {
    async fn write_record(&self, record: &PageResult) -> Result<()> {
        let line = record.to_tsv_line();
        let mut file = self.file.lock().await;
        file.write_all(line.as_bytes()).await.map_err(ScanError::Sink)?;
        file.flush().await.map_err(ScanError::Sink)
    }
}

/// Records collected in an in-memory buffer, header included
pub struct MemorySink {
    buffer: Mutex<Vec<u8>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self {
            buffer: Mutex::new(TSV_HEADER.as_bytes().to_vec()),
        }
    }

    pub async fn contents(&self) -> Vec<u8> {
        self.buffer.lock().await.clone()
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.buffer.into_inner()
    }
}

impl Default for MemorySink {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputSink for MemorySink {
    async fn write_record(&self, record: &PageResult) -> Result<()> {
        let line = record.to_tsv_line();
        self.buffer.lock().await.extend_from_slice(line.as_bytes());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_sink_starts_with_header() {
        let sink = MemorySink::new();
        assert_eq!(sink.contents().await, b"url\tdepth\tratio\n");
    }

    #[tokio::test]
    async fn test_memory_sink_appends() {
        let sink = MemorySink::new();
        sink.write_record(&PageResult::new("http://a.test/".into(), 1, 0.5))
            .await
            .unwrap();
        sink.write_record(&PageResult::new("http://a.test/b".into(), 2, 1.0))
            .await
            .unwrap();

        let text = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(
            text,
            "url\tdepth\tratio\nhttp://a.test/\t1\t0.50\nhttp://a.test/b\t2\t1.00\n"
        );
    }

    #[tokio::test]
    async fn test_file_sink_writes_header_and_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.tsv");

        let sink = FileSink::create(&path).await.unwrap();
        sink.write_record(&PageResult::new("http://a.test/".into(), 1, 0.33))
            .await
            .unwrap();
        drop(sink);

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "url\tdepth\tratio\nhttp://a.test/\t1\t0.33\n");
    }

    #[tokio::test]
    async fn test_file_sink_truncates_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.tsv");
        std::fs::write(&path, "stale data\n").unwrap();

        let sink = FileSink::create(&path).await.unwrap();
        assert_eq!(sink.path(), path.as_path());
        drop(sink);

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "url\tdepth\tratio\n");
    }

    #[tokio::test]
    async fn test_file_sink_missing_directory_is_sink_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.tsv");
        assert!(matches!(FileSink::create(&path).await, Err(ScanError::Sink(_))));
    }
}
