//! Browser upload client using `FormData` and `gloo-net`

use async_trait::async_trait;
use gloo_net::http::Request;
use serde_json::Value;
use web_sys::{FileList, FormData};

use crate::error::{UploadError, UploadResult};
use crate::upload::{UploadClient, UploadResponse};

/// Posts a `FileList` as multipart form data with `fetch`.
///
/// Cookies of the current origin ride along, which is how the upload
/// endpoints authenticate the request.
#[derive(Debug, Clone, Default)]
pub struct FetchUploadClient;

impl FetchUploadClient {
    pub fn new() -> Self {
        Self
    }

    fn build_form(field: &str, files: &FileList) -> UploadResult<FormData> {
        let form = FormData::new().map_err(|e| UploadError::request(format!("{:?}", e)))?;
        for index in 0..files.length() {
            let Some(file) = files.get(index) else {
                continue;
            };
            form.append_with_blob_and_filename(field, &file, &file.name())
                .map_err(|e| UploadError::request(format!("{}: {:?}", file.name(), e)))?;
        }
        Ok(form)
    }
}

#[async_trait(?Send)]
impl UploadClient for FetchUploadClient {
    type Files = FileList;

    async fn upload(
        &self,
        url: &str,
        field: &str,
        files: &FileList,
    ) -> UploadResult<UploadResponse> {
        let form = Self::build_form(field, files)?;

        let response = Request::post(url)
            .body(form)
            .map_err(|e| UploadError::request(e.to_string()))?
            .send()
            .await
            .map_err(|e| UploadError::transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .json::<Value>()
            .await
            .map_err(|e| UploadError::invalid_response(e.to_string()))?;

        Ok(UploadResponse { status, body })
    }
}
