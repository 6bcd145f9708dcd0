//! Accessor contract tests against a mock server: endpoint paths, query
//! encoding, multipart part naming, envelope checks and record hydration.

use std::time::Duration;

use mockito::Matcher;
use zetsubou::services::NodeFilter;
use zetsubou::types::NodeKind;
use zetsubou::{Error, ExportFormat, FileInput, JobStatus, ZetsubouClient};

fn client(base_url: &str) -> ZetsubouClient {
    ZetsubouClient::builder()
        .api_key("ztb_live_test")
        .base_url(base_url)
        .timeout(Duration::from_secs(5))
        .retry_attempts(0)
        .retry_backoff(Duration::from_millis(10))
        .build()
        .unwrap()
}

#[tokio::test]
async fn tools_list_hydrates_catalog_entries() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/api/v2/tools")
        .with_status(200)
        .with_body(
            r#"{"tools": [{
                "id": "bg-remove",
                "name": "Background Removal",
                "category": "image",
                "input_type": "image",
                "output_type": "image",
                "required_tier": "free",
                "accessible": true
            }]}"#,
        )
        .create_async()
        .await;

    let tools = client(&server.url()).tools().list().await.unwrap();
    assert_eq!(tools.len(), 1);
    assert_eq!(tools[0].id, "bg-remove");
    assert_eq!(tools[0].timeout_seconds, 600);
}

#[tokio::test]
async fn tool_execute_names_parts_positionally() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/v2/tools/bg-remove/execute")
        .match_header(
            "content-type",
            Matcher::Regex("multipart/form-data".to_string()),
        )
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex(r#"name="file_0""#.to_string()),
            Matcher::Regex(r#"name="file_1""#.to_string()),
            Matcher::Regex(r#"name="audio_0""#.to_string()),
            Matcher::Regex(r#"name="options""#.to_string()),
            Matcher::Regex(r#"filename="a.png""#.to_string()),
        ]))
        .with_status(200)
        .with_body(
            r#"{"job": {
                "id": "job-9",
                "tool_id": "bg-remove",
                "status": "pending",
                "created_at": "2025-11-02T10:00:00Z"
            }}"#,
        )
        .expect(1)
        .create_async()
        .await;

    let mut options = serde_json::Map::new();
    options.insert("quality".to_string(), serde_json::json!("high"));

    let job = client(&server.url())
        .tools()
        .execute(
            "bg-remove",
            vec![
                FileInput::bytes("a.png", b"png-a".to_vec()),
                FileInput::bytes("b.png", b"png-b".to_vec()),
            ],
            Some(options),
            vec![FileInput::bytes("track.wav", b"wav".to_vec())],
        )
        .await
        .unwrap();

    assert_eq!(job.id, "job-9");
    assert_eq!(job.status, JobStatus::Pending);
    mock.assert_async().await;
}

#[tokio::test]
async fn jobs_list_encodes_filter_query() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/api/v2/jobs")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("status".into(), "completed".into()),
            Matcher::UrlEncoded("tool_id".into(), "upscale".into()),
            Matcher::UrlEncoded("limit".into(), "5".into()),
            Matcher::UrlEncoded("offset".into(), "0".into()),
        ]))
        .with_status(200)
        .with_body(r#"{"jobs": []}"#)
        .expect(1)
        .create_async()
        .await;

    let jobs = client(&server.url())
        .jobs()
        .list(zetsubou::services::JobFilter {
            status: Some(JobStatus::Completed),
            tool_id: Some("upscale".to_string()),
            limit: 5,
            offset: 0,
        })
        .await
        .unwrap();
    assert!(jobs.is_empty());
    mock.assert_async().await;
}

#[tokio::test]
async fn job_download_returns_raw_bytes() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/api/v2/jobs/job-9/download")
        .with_status(200)
        .with_header("content-type", "application/zip")
        .with_body(b"PK\x03\x04fake-zip".as_slice())
        .create_async()
        .await;

    let bytes = client(&server.url()).jobs().download_results("job-9").await.unwrap();
    assert_eq!(&bytes[..2], b"PK");
}

#[tokio::test]
async fn vfs_listing_filters_by_parent_and_type() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/api/v2/vfs/nodes")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("parent_id".into(), "folder-1".into()),
            Matcher::UrlEncoded("type".into(), "file".into()),
        ]))
        .with_status(200)
        .with_body(
            r#"{"nodes": [{
                "id": "n1",
                "name": "cat.png",
                "type": "file",
                "size_bytes": 512,
                "created_at": "2025-11-02T10:00:00Z",
                "updated_at": "2025-11-02T10:00:00Z",
                "parent_id": "folder-1"
            }]}"#,
        )
        .expect(1)
        .create_async()
        .await;

    let nodes = client(&server.url())
        .vfs()
        .list_nodes(NodeFilter {
            parent_id: Some("folder-1".to_string()),
            kind: Some(NodeKind::File),
            ..NodeFilter::default()
        })
        .await
        .unwrap();
    assert_eq!(nodes.len(), 1);
    assert_eq!(nodes[0].parent_id.as_deref(), Some("folder-1"));
    mock.assert_async().await;
}

#[tokio::test]
async fn vfs_upload_sends_encrypt_flag() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/v2/vfs/upload")
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex(r#"name="file""#.to_string()),
            Matcher::Regex(r#"name="encrypt""#.to_string()),
            Matcher::Regex("true".to_string()),
        ]))
        .with_status(201)
        .with_body(
            r#"{"node": {
                "id": "n2",
                "name": "secret.txt",
                "type": "file",
                "size_bytes": 5,
                "created_at": "2025-11-02T10:00:00Z",
                "updated_at": "2025-11-02T10:00:00Z",
                "is_encrypted": true
            }}"#,
        )
        .expect(1)
        .create_async()
        .await;

    let node = client(&server.url())
        .vfs()
        .upload(FileInput::bytes("secret.txt", b"shh!!".to_vec()), None, true)
        .await
        .unwrap();
    assert!(node.is_encrypted);
    mock.assert_async().await;
}

#[tokio::test]
async fn chat_export_fetch_and_persist_are_separate() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/api/v2/chat/conversations/7/export")
        .match_query(Matcher::UrlEncoded("format".into(), "md".into()))
        .with_status(200)
        .with_body("# Conversation 7\n\nhello\n")
        .create_async()
        .await;

    let c = client(&server.url());
    let export = c.chat().export(7, ExportFormat::Markdown).await.unwrap();
    assert!(export.text().starts_with("# Conversation 7"));

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("conv.md");
    export.save(&path).await.unwrap();
    assert_eq!(std::fs::read(&path).unwrap(), export.bytes.to_vec());
}

#[tokio::test]
async fn chat_json_export_envelope_failure_raises() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/api/v2/chat/conversations/7/export")
        .match_query(Matcher::UrlEncoded("format".into(), "json".into()))
        .with_status(200)
        .with_body(r#"{"success": false, "error": "conversation locked"}"#)
        .create_async()
        .await;

    let err = client(&server.url())
        .chat()
        .export(7, ExportFormat::Json)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("conversation locked"));
}

#[tokio::test]
async fn nft_envelope_failure_raises_despite_http_200() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/api/v2/nft/projects")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"success": false, "error": "nft tier required"}"#)
        .create_async()
        .await;

    let err = client(&server.url()).nft().list_projects(false).await.unwrap_err();
    assert!(matches!(err, Error::Api(_)));
    assert_eq!(err.detail().unwrap().message, "nft tier required");
}

#[tokio::test]
async fn nft_success_envelope_decodes_projects() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/api/v2/nft/projects")
        .match_query(Matcher::UrlEncoded("include_archived".into(), "true".into()))
        .with_status(200)
        .with_body(r#"{"success": true, "projects": [{"id": 3, "name": "Pixel Cats"}]}"#)
        .create_async()
        .await;

    let projects = client(&server.url()).nft().list_projects(true).await.unwrap();
    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0].id, "3");
}

#[tokio::test]
async fn graphql_errors_join_in_response_order() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/api/graphql")
        .with_status(200)
        .with_body(
            r#"{"data": null, "errors": [
                {"message": "field 'viewer' not found"},
                {"message": "syntax error"}
            ]}"#,
        )
        .create_async()
        .await;

    let err = client(&server.url())
        .graphql()
        .query("{ viewer { username } }", None, None)
        .await
        .unwrap_err();
    assert!(err
        .to_string()
        .contains("field 'viewer' not found; syntax error"));
}

#[tokio::test]
async fn graphql_success_returns_full_body() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/graphql")
        .match_body(Matcher::PartialJson(serde_json::json!({
            "query": "{ viewer { username } }",
            "operationName": "Viewer"
        })))
        .with_status(200)
        .with_body(r#"{"data": {"viewer": {"username": "kaori"}}}"#)
        .expect(1)
        .create_async()
        .await;

    let body = client(&server.url())
        .graphql()
        .query("{ viewer { username } }", None, Some("Viewer"))
        .await
        .unwrap();
    assert_eq!(body["data"]["viewer"]["username"], "kaori");
    mock.assert_async().await;
}

#[tokio::test]
async fn webhook_create_round_trips_record() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/api/v2/webhooks")
        .match_body(Matcher::PartialJson(serde_json::json!({
            "url": "https://example.com/hook",
            "events": ["job.completed", "job.failed", "job.cancelled"]
        })))
        .with_status(201)
        .with_body(
            r#"{"webhook": {
                "id": 11,
                "url": "https://example.com/hook",
                "events": ["job.completed", "job.failed", "job.cancelled"],
                "enabled": true,
                "created_at": "2025-11-02T10:00:00Z",
                "updated_at": "2025-11-02T10:00:00Z"
            }}"#,
        )
        .create_async()
        .await;

    let hook = client(&server.url())
        .webhooks()
        .create_job_webhook("https://example.com/hook", None)
        .await
        .unwrap();
    assert_eq!(hook.id, 11);
    assert_eq!(hook.events.len(), 3);
}

#[tokio::test]
async fn account_quota_helpers_are_pure_over_one_fetch() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/api/v2/storage/quota")
        .with_status(200)
        .with_body(
            r#"{
                "tier": "pro",
                "quota_bytes": 1000,
                "used_bytes": 900,
                "available_bytes": 100,
                "usage_percent": 90.0,
                "file_count": 3,
                "folder_count": 1,
                "largest_files": [
                    {"name": "a.mp4", "size_bytes": 500},
                    {"name": "b.mp4", "size_bytes": 300},
                    {"name": "c.png", "size_bytes": 100}
                ]
            }"#,
        )
        .expect(2)
        .create_async()
        .await;

    let c = client(&server.url());
    assert!(c.account().is_storage_quota_warning(80.0).await.unwrap());
    let files = c.account().largest_files(2).await.unwrap();
    assert_eq!(files.len(), 2);
    assert_eq!(files[0]["name"], "a.mp4");
    // Each helper re-fetches; nothing is cached across calls.
    mock.assert_async().await;
}

#[tokio::test]
async fn deleted_job_reports_success_flag() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("DELETE", "/api/v2/jobs/job-9")
        .with_status(200)
        .with_body(r#"{"success": true}"#)
        .create_async()
        .await;

    assert!(client(&server.url()).jobs().delete("job-9").await.unwrap());
}
