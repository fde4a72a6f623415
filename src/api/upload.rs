use super::dto::ImageUpload;
use super::{decode, ApiClient, ApiError, ApiErrorKind, ApiResult};
use crate::models::Id;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Method;
use wasm_bindgen_futures::JsFuture;

#[async_trait(?Send)]
pub(crate) trait UploadApi {
    /// Upload an image and return its public URL.
    async fn upload_image(&self, upload: ImageUpload) -> ApiResult<String>;
}

#[async_trait(?Send)]
impl UploadApi for ApiClient {
    async fn upload_image(&self, upload: ImageUpload) -> ApiResult<String> {
        log::debug!(
            "POST /upload ({}, {} bytes, section {})",
            upload.file_name,
            upload.bytes.len(),
            upload.section_id
        );

        let mut part = Part::bytes(upload.bytes).file_name(upload.file_name);
        if !upload.mime.is_empty() {
            part = part.mime_str(&upload.mime).map_err(ApiError::decode)?;
        }
        let form = Form::new()
            .part("file", part)
            .text("sectionId", upload.section_id.to_string());

        // No explicit Content-Type: the multipart boundary is set by the client.
        let req = reqwest::Client::new()
            .post(self.url("/upload"))
            .multipart(form);
        let req = Self::with_auth_headers(req, self.get_auth_header());
        let res = req.send().await.map_err(ApiError::network)?;
        let body = Self::read_response(res, &Method::POST, "/upload").await?;

        decode::upload_url(&body).ok_or_else(|| {
            ApiError::new(ApiErrorKind::Decode, "Upload succeeded but no image URL was returned")
        })
    }
}

/// Read a browser `File` into an upload payload.
pub(crate) async fn read_file(file: &web_sys::File, section_id: &Id) -> ApiResult<ImageUpload> {
    let buffer = JsFuture::from(file.array_buffer())
        .await
        .map_err(|e| ApiError::decode(format!("could not read file: {e:?}")))?;
    let bytes = js_sys::Uint8Array::new(&buffer).to_vec();

    Ok(ImageUpload {
        file_name: file.name(),
        mime: file.type_(),
        bytes,
        section_id: section_id.clone(),
    })
}
