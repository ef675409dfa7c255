//! Native upload client using `reqwest`

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde_json::Value;

use crate::error::{UploadError, UploadResult};
use crate::upload::{UploadClient, UploadFile, UploadResponse};

/// Multipart uploader backed by a `reqwest::Client`
#[derive(Debug, Clone, Default)]
pub struct ReqwestUploadClient {
    client: reqwest::Client,
}

impl ReqwestUploadClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reuse an existing client, e.g. one carrying a cookie store
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    fn build_form(field: &str, files: &[UploadFile]) -> UploadResult<Form> {
        let mut form = Form::new();
        for file in files {
            let part = Part::bytes(file.bytes.clone())
                .file_name(file.name.clone())
                .mime_str(&file.content_type)
                .map_err(|e| UploadError::request(format!("{}: {}", file.name, e)))?;
            form = form.part(field.to_string(), part);
        }
        Ok(form)
    }
}

#[async_trait(?Send)]
impl UploadClient for ReqwestUploadClient {
    type Files = Vec<UploadFile>;

    async fn upload(
        &self,
        url: &str,
        field: &str,
        files: &Vec<UploadFile>,
    ) -> UploadResult<UploadResponse> {
        let form = Self::build_form(field, files)?;

        let response = self
            .client
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| UploadError::transport(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .json::<Value>()
            .await
            .map_err(|e| UploadError::invalid_response(e.to_string()))?;

        Ok(UploadResponse { status, body })
    }
}
