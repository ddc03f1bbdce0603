//! Tests for `RangeReader` against a live HTTP server.
//!
//! This file covers:
//! - Construction and the metadata gathered by the probe request
//! - Positioned reads, including reads at and past the end
//! - Rejection of servers without range support

use splinter::{Error, RangeReader};
use std::time::Duration;

mod common;
use common::helpers::*;

#[tokio::test]
async fn test_reader_metadata_from_probe() {
    init_tracing();
    let content = create_test_content(1000);
    let server = start_range_server(RangeResponder::new(content)).await;

    let reader = RangeReader::from_url(create_transport(), &blob_url(&server))
        .await
        .unwrap();

    assert_eq!(reader.size(), Some(1000));
    assert_eq!(reader.etag(), Some(TEST_ETAG));
    assert_eq!(reader.last_modified(), Some(TEST_LAST_MODIFIED));
    assert_eq!(reader.content_type(), Some("application/octet-stream"));
    assert_eq!(reader.url().path(), TEST_PATH);
}

#[tokio::test]
async fn test_read_at_middle() {
    let content = create_test_content(1000);
    let server = start_range_server(RangeResponder::new(content.clone())).await;
    let reader = RangeReader::from_url(create_transport(), &blob_url(&server))
        .await
        .unwrap();

    let mut buf = vec![0u8; 100];
    let outcome = reader.read_at(&mut buf, 250).await.unwrap();

    assert_eq!(outcome.bytes_read, 100);
    assert!(!outcome.end_of_resource);
    assert_eq!(buf, content[250..350]);
}

#[tokio::test]
async fn test_read_ending_on_last_byte_is_not_end() {
    let content = create_test_content(1000);
    let server = start_range_server(RangeResponder::new(content.clone())).await;
    let reader = RangeReader::from_url(create_transport(), &blob_url(&server))
        .await
        .unwrap();

    let mut buf = vec![0u8; 100];
    let outcome = reader.read_at(&mut buf, 900).await.unwrap();
    assert_eq!(outcome.bytes_read, 100);
    assert!(!outcome.end_of_resource);
    assert_eq!(buf, content[900..]);
}

#[tokio::test]
async fn test_read_straddling_end_is_short() {
    let content = create_test_content(1000);
    let server = start_range_server(RangeResponder::new(content.clone())).await;
    let reader = RangeReader::from_url(create_transport(), &blob_url(&server))
        .await
        .unwrap();

    let mut buf = vec![0u8; 100];
    let outcome = reader.read_at(&mut buf, 950).await.unwrap();
    assert_eq!(outcome.bytes_read, 50);
    assert!(outcome.end_of_resource);
    assert_eq!(buf[..50], content[950..]);
}

#[tokio::test]
async fn test_read_past_end_sends_no_request() {
    let server = start_range_server(RangeResponder::new(create_test_content(1000))).await;
    let reader = RangeReader::from_url(create_transport(), &blob_url(&server))
        .await
        .unwrap();

    let mut buf = vec![0u8; 10];
    let outcome = reader.read_at(&mut buf, 1000).await.unwrap();
    assert_eq!(outcome.bytes_read, 0);
    assert!(outcome.end_of_resource);
    assert_eq!(chunk_requests(&server).await, 0);
}

#[tokio::test]
async fn test_read_near_max_offset_is_end() {
    let server = start_range_server(RangeResponder::new(create_test_content(1000))).await;
    let reader = RangeReader::from_url(create_transport(), &blob_url(&server))
        .await
        .unwrap();

    let mut buf = vec![0u8; 10];
    let outcome = reader.read_at(&mut buf, u64::MAX - 2).await.unwrap();
    assert_eq!(outcome.bytes_read, 0);
    assert!(outcome.end_of_resource);
    assert_eq!(chunk_requests(&server).await, 0);
}

#[tokio::test]
async fn test_empty_buffer_reads_nothing() {
    let server = start_range_server(RangeResponder::new(create_test_content(10))).await;
    let reader = RangeReader::from_url(create_transport(), &blob_url(&server))
        .await
        .unwrap();

    let outcome = reader.read_at(&mut [], 3).await.unwrap();
    assert_eq!(outcome.bytes_read, 0);
    assert!(!outcome.end_of_resource);
}

#[tokio::test]
async fn test_server_without_range_support_is_rejected() {
    let server = start_plain_server(create_test_content(100)).await;

    let err = RangeReader::from_url(create_transport(), &blob_url(&server))
        .await
        .unwrap_err();

    match err {
        Error::RangeNotSupported { status } => assert_eq!(status.as_u16(), 200),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_changed_resource_fails_validation() {
    let responder = RangeResponder::new(create_test_content(1000)).replaced_after(1, "\"blob-v2\"");
    let server = start_range_server(responder).await;
    let reader = RangeReader::from_url(create_transport(), &blob_url(&server))
        .await
        .unwrap();

    let mut buf = vec![0u8; 10];
    let err = reader.read_at(&mut buf, 500).await.unwrap_err();
    assert!(matches!(err, Error::ValidationFailed));
}

#[tokio::test]
async fn test_scoped_reader_times_out() {
    let responder =
        RangeResponder::new(create_test_content(1000)).slow_chunks(Duration::from_secs(5));
    let server = start_range_server(responder).await;
    let reader = RangeReader::from_url(create_transport(), &blob_url(&server))
        .await
        .unwrap();

    let scoped = reader.with_timeout(Duration::from_millis(100));
    let mut buf = vec![0u8; 10];
    let err = scoped.read_at(&mut buf, 100).await.unwrap_err();
    match err {
        Error::Timeout { offset, timeout } => {
            assert_eq!(offset, 100);
            assert_eq!(timeout, Duration::from_millis(100));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_invalid_url() {
    let err = RangeReader::from_url(create_transport(), "not a url")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidUrl(_)));
}

#[tokio::test]
async fn test_concurrent_reads_share_one_reader() {
    let content = create_test_content(4096);
    let server = start_range_server(RangeResponder::new(content.clone())).await;
    let reader = RangeReader::from_url(create_transport(), &blob_url(&server))
        .await
        .unwrap();

    let reader = &reader;
    let reads = (0..8u64).map(move |i| {
        async move {
            let mut buf = vec![0u8; 512];
            reader.read_at(&mut buf, i * 512).await.map(|_| buf)
        }
    });
    let parts = futures::future::try_join_all(reads).await.unwrap();

    assert_eq!(parts.concat(), content);
}
