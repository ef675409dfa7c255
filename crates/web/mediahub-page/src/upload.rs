//! Drag-and-drop / click-to-browse upload zones
//!
//! A zone is a visible element paired with a hidden `<input type="file">`
//! whose `data-upload-url` attribute names the endpoint. Files picked through
//! the dialog or dropped on the zone are posted as multipart form data, one
//! `file` part per file, and the page reloads once the server answers with
//! JSON. Any failure shows a single alert; there is no retry.

use std::rc::Rc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::config::PageConfig;
use crate::error::{PageError, PageResult, UploadResult};
use crate::page::{EventKind, FileSelection, Page};

/// A file held in memory, ready to be sent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new<N: Into<String>, B: Into<Vec<u8>>>(name: N, bytes: B) -> Self {
        Self {
            name: name.into(),
            content_type: "application/octet-stream".to_string(),
            bytes: bytes.into(),
        }
    }

    pub fn with_content_type<S: Into<String>>(mut self, content_type: S) -> Self {
        self.content_type = content_type.into();
        self
    }
}

impl FileSelection for Vec<UploadFile> {
    fn file_count(&self) -> usize {
        self.len()
    }
}

/// What the server sent back for an upload
#[derive(Debug, Clone, PartialEq)]
pub struct UploadResponse {
    /// HTTP status code
    pub status: u16,
    /// Parsed JSON body
    pub body: Value,
}

impl UploadResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends a file selection to an upload endpoint
#[async_trait(?Send)]
pub trait UploadClient {
    /// The file list type this client can send
    type Files: FileSelection;

    /// POST every file as a `field` part of one multipart body.
    ///
    /// Succeeds whenever the response body parses as JSON, whatever the status.
    async fn upload(&self, url: &str, field: &str, files: &Self::Files)
    -> UploadResult<UploadResponse>;
}

/// How an upload ended
#[derive(Debug, Clone, PartialEq)]
pub enum UploadOutcome {
    /// The server answered with JSON and the page was reloaded
    Reloaded(UploadResponse),
    /// The upload failed and the user was alerted
    Alerted(String),
}

/// A configured drop zone
#[derive(Debug, Clone, PartialEq)]
pub struct DropZone<E> {
    pub zone: E,
    pub input: E,
    pub upload_url: String,
}

/// Upload `files` to `url`, then reload on success or alert on failure.
pub async fn submit_files<P, C>(
    page: &P,
    client: &C,
    config: &PageConfig,
    url: &str,
    files: &C::Files,
) -> UploadOutcome
where
    P: Page + ?Sized,
    C: UploadClient + ?Sized,
{
    debug!(url, count = files.file_count(), "Uploading files");

    match client.upload(url, &config.upload_field, files).await {
        Ok(response) => {
            if !response.is_success() {
                warn!(
                    url,
                    status = response.status,
                    "Upload endpoint answered with an error status; reloading anyway"
                );
            }
            info!(url, status = response.status, body = %response.body, "Upload finished");
            page.reload();
            UploadOutcome::Reloaded(response)
        }
        Err(e) => {
            error!(url, "Upload failed: {}", e);
            page.alert(&config.upload_failure_message);
            UploadOutcome::Alerted(e.to_string())
        }
    }
}

/// Queue an upload on the page's event loop.
pub fn start_upload<P, C>(
    page: &Rc<P>,
    client: &Rc<C>,
    config: &Rc<PageConfig>,
    url: &str,
    files: P::Files,
) where
    P: Page + 'static,
    C: UploadClient<Files = P::Files> + 'static,
{
    let task_page = Rc::clone(page);
    let client = Rc::clone(client);
    let config = Rc::clone(config);
    let url = url.to_string();

    page.spawn_local(Box::pin(async move {
        submit_files(task_page.as_ref(), client.as_ref(), &config, &url, &files).await;
    }));
}

/// Wire a drop zone and its file input.
///
/// Fails without registering anything when either element is missing or the
/// input carries no upload URL, leaving that zone inert.
pub fn setup_drop_zone<P, C>(
    page: &Rc<P>,
    client: &Rc<C>,
    config: &Rc<PageConfig>,
    zone_id: &str,
    input_id: &str,
) -> PageResult<DropZone<P::Element>>
where
    P: Page + 'static,
    C: UploadClient<Files = P::Files> + 'static,
{
    let zone = page
        .element_by_id(zone_id)
        .ok_or_else(|| PageError::element_missing(format!("drop zone '{}'", zone_id)))?;
    let input = page
        .element_by_id(input_id)
        .ok_or_else(|| PageError::element_missing(format!("file input '{}'", input_id)))?;
    let upload_url = page
        .attribute(&input, &config.upload_url_attribute)
        .filter(|url| !url.trim().is_empty())
        .ok_or_else(|| PageError::missing_upload_url(input_id))?;

    // Click on the zone opens the file picker
    {
        let handler_page = Rc::clone(page);
        let input = input.clone();
        page.listen(
            &zone,
            EventKind::Click,
            Box::new(move |_event| {
                if let Err(e) = handler_page.open_file_dialog(&input) {
                    error!("Failed to open file dialog: {}", e);
                }
            }),
        )?;
    }

    // Drag feedback
    {
        let handler_page = Rc::clone(page);
        let zone_el = zone.clone();
        let class = config.dragover_class.clone();
        page.listen(
            &zone,
            EventKind::DragOver,
            Box::new(move |event| {
                event.prevent_default();
                if let Err(e) = handler_page.add_class(&zone_el, &class) {
                    error!("Failed to mark drop zone: {}", e);
                }
            }),
        )?;
    }
    {
        let handler_page = Rc::clone(page);
        let zone_el = zone.clone();
        let class = config.dragover_class.clone();
        page.listen(
            &zone,
            EventKind::DragLeave,
            Box::new(move |_event| {
                if let Err(e) = handler_page.remove_class(&zone_el, &class) {
                    error!("Failed to unmark drop zone: {}", e);
                }
            }),
        )?;
    }

    // Drop assigns the files to the input and uploads them
    {
        let handler_page = Rc::clone(page);
        let client = Rc::clone(client);
        let config = Rc::clone(config);
        let zone_el = zone.clone();
        let input = input.clone();
        let url = upload_url.clone();
        page.listen(
            &zone,
            EventKind::Drop,
            Box::new(move |event| {
                event.prevent_default();
                if let Err(e) = handler_page.remove_class(&zone_el, &config.dragover_class) {
                    error!("Failed to unmark drop zone: {}", e);
                }

                let Some(files) = event.files().filter(|files| !files.is_empty()) else {
                    return;
                };
                if let Err(e) = handler_page.assign_files(&input, files) {
                    warn!("Could not attach dropped files to the input: {}", e);
                }
                start_upload(&handler_page, &client, &config, &url, files.clone());
            }),
        )?;
    }

    // Picking files in the dialog uploads them
    {
        let handler_page = Rc::clone(page);
        let client = Rc::clone(client);
        let config = Rc::clone(config);
        let input_el = input.clone();
        let url = upload_url.clone();
        page.listen(
            &input,
            EventKind::Change,
            Box::new(move |_event| {
                let Some(files) = handler_page
                    .selected_files(&input_el)
                    .filter(|files| !files.is_empty())
                else {
                    return;
                };
                start_upload(&handler_page, &client, &config, &url, files);
            }),
        )?;
    }

    debug!(zone = zone_id, input = input_id, url = %upload_url, "Drop zone ready");
    Ok(DropZone {
        zone,
        input,
        upload_url,
    })
}
