//! End-to-end upload tests: a headless page, the reqwest uploader and a mock
//! upload endpoint.

#![cfg(not(target_arch = "wasm32"))]

use std::rc::Rc;

use mediahub_page::native::ReqwestUploadClient;
use mediahub_page::{MemoryPage, NodeId, Page, PageConfig, PageRuntime, UploadFile};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct UploadPage {
    page: Rc<MemoryPage>,
    config: PageConfig,
    zone: NodeId,
    input: NodeId,
}

fn upload_page(upload_url: &str) -> UploadPage {
    let page = Rc::new(MemoryPage::new());
    let zone = page.add("div", "fileDropZone");
    let input = page.add("input", "fileInput");
    page.set_attribute(&input, "type", "file").unwrap();
    page.set_attribute(&input, "data-upload-url", upload_url)
        .unwrap();

    let config = PageConfig::default();
    let runtime = PageRuntime::new(
        Rc::clone(&page),
        Rc::new(ReqwestUploadClient::new()),
        config.clone(),
    );
    let zones = runtime.on_ready(&mut StdRng::seed_from_u64(11)).unwrap();
    assert_eq!(zones.len(), 1);

    UploadPage {
        page,
        config,
        zone,
        input,
    }
}

fn two_files() -> Vec<UploadFile> {
    vec![
        UploadFile::new("a.txt", "alpha").with_content_type("text/plain"),
        UploadFile::new("b.txt", "bravo").with_content_type("text/plain"),
    ]
}

#[tokio::test]
async fn test_drop_posts_every_file_and_reloads() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload/file"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "success": "File 'a.txt' uploaded" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let t = upload_page(&format!("{}/upload/file", server.uri()));

    assert!(t.page.drop_files(t.zone, two_files()));
    t.page.run_pending().await;

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);

    let content_type = requests[0]
        .headers
        .get("content-type")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(content_type.starts_with("multipart/form-data"));

    let body = String::from_utf8_lossy(&requests[0].body);
    assert_eq!(body.matches("name=\"file\"").count(), 2);
    assert!(body.contains("filename=\"a.txt\""));
    assert!(body.contains("filename=\"b.txt\""));
    assert!(body.contains("alpha"));
    assert!(body.contains("bravo"));

    assert_eq!(t.page.reload_count(), 1);
    assert!(t.page.alerts().is_empty());
}

#[tokio::test]
async fn test_dialog_selection_posts_to_zone_url() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload/video"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
        .expect(1)
        .mount(&server)
        .await;

    let t = upload_page(&format!("{}/upload/video", server.uri()));

    t.page
        .choose_files(t.input, vec![UploadFile::new("ep1.mp4", vec![0u8; 64])]);
    t.page.run_pending().await;

    assert_eq!(t.page.reload_count(), 1);
}

#[tokio::test]
async fn test_non_json_response_alerts_once() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload/file"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>Redirecting to login</html>"))
        .mount(&server)
        .await;

    let t = upload_page(&format!("{}/upload/file", server.uri()));

    t.page.drop_files(t.zone, two_files());
    t.page.run_pending().await;

    assert_eq!(t.page.alerts(), vec![t.config.upload_failure_message.clone()]);
    assert_eq!(t.page.reload_count(), 0);
    assert_eq!(t.page.selected_files(&t.input), Some(two_files()));
}

#[tokio::test]
async fn test_error_status_with_json_body_still_reloads() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload/file"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({ "error": "No selected file" })))
        .mount(&server)
        .await;

    let t = upload_page(&format!("{}/upload/file", server.uri()));

    t.page.drop_files(t.zone, two_files());
    t.page.run_pending().await;

    assert_eq!(t.page.reload_count(), 1);
    assert!(t.page.alerts().is_empty());
}

#[tokio::test]
async fn test_unreachable_endpoint_alerts_without_reload() {
    let t = upload_page("http://127.0.0.1:9/upload/file");

    t.page.drop_files(t.zone, two_files());
    t.page.run_pending().await;

    assert_eq!(t.page.alerts().len(), 1);
    assert_eq!(t.page.reload_count(), 0);
}
