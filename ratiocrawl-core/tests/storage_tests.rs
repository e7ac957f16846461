use ratiocrawl_core::storage::{LocalStore, ObjectStore};
use ratiocrawl_core::task::{JobRequest, JobStatus, TaskState, crawl_task};
use ratiocrawl_scanner::CrawlConfig;
use std::time::Duration;
use url::Url;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

#[tokio::test]
async fn test_crawl_task_stores_output_and_links_to_it() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"<a href="/a">a</a><a href="http://elsewhere.test/">x</a>"#),
        )
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let store = LocalStore::open(dir.path()).await.unwrap();
    let request = JobRequest {
        url: format!("{}/", mock_server.uri()),
        max_depth: 1,
    };

    let result = crawl_task(&request, &store, CrawlConfig::default()).await.unwrap();

    let link = Url::parse(&result.s3_link).unwrap();
    assert_eq!(link.scheme(), "file");
    assert!(link.query_pairs().any(|(k, _)| k == "expires"));

    let stored = std::fs::read_to_string(link.to_file_path().unwrap()).unwrap();
    assert_eq!(
        stored,
        format!("url\tdepth\tratio\n{}\t1\t0.50\n", request.url)
    );

    let status = JobStatus::finished(Ok(result));
    assert_eq!(status.status, TaskState::Success);
}

#[tokio::test]
async fn test_schemeless_request_is_normalized() {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalStore::open(dir.path()).await.unwrap();
    // Port 9 (discard) is expected to refuse connections locally
    let request = JobRequest {
        url: "127.0.0.1:9/".to_string(),
        max_depth: 1,
    };
    let config = CrawlConfig::default()
        .with_connect_timeout(Duration::from_millis(200))
        .with_retry(ratiocrawl_scanner::RetryPolicy::new(
            1,
            Duration::from_millis(1),
            Duration::ZERO,
        ));

    let result = crawl_task(&request, &store, config).await.unwrap();
    let link = Url::parse(&result.s3_link).unwrap();
    let file_name = link.path_segments().unwrap().last().unwrap().to_string();
    assert!(file_name.starts_with("127.0.0.1_"));

    let stored = std::fs::read_to_string(link.to_file_path().unwrap()).unwrap();
    assert_eq!(stored, "url\tdepth\tratio\n");
}

#[tokio::test]
async fn test_store_roundtrip_keeps_bytes() {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalStore::open(dir.path()).await.unwrap();
    let payload = "url\tdepth\tratio\nhttp://a.test/\t1\t0.25\n".as_bytes().to_vec();

    store.put("a.tsv", payload.clone()).await.unwrap();
    let link = store.presign("a.tsv", Duration::from_secs(5)).await.unwrap();
    let path = Url::parse(&link).unwrap().to_file_path().unwrap();
    assert_eq!(std::fs::read(path).unwrap(), payload);
}
