//! Product Image Upload Handlers

use std::sync::Arc;

use salvo::{http::form::FilePart, oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};
use tracing::error;

use aroma_app::storage::StorageError;

use crate::{extensions::*, state::State};

/// Uploaded Image Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UploadResponse {
    /// Public URL of the stored image
    pub url: String,
}

/// Uploaded Images Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UploadsResponse {
    /// Public URLs of the stored images, in upload order
    pub urls: Vec<String>,
}

/// Upload Product Image Handler
///
/// Accepts one multipart file under the `image` field.
#[endpoint(
    tags("products"),
    summary = "Upload Product Image",
    security(("bearer_auth" = [])),
)]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
) -> Result<Json<UploadResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let Some(file) = req.file("image").await else {
        return Err(StatusError::bad_request().brief("Missing image file"));
    };

    let url = store_file(state, file).await?;

    Ok(Json(UploadResponse { url }))
}

/// Upload Product Gallery Handler
///
/// Accepts multiple multipart files under the `images` field.
#[endpoint(
    tags("products"),
    summary = "Upload Product Images",
    security(("bearer_auth" = [])),
)]
pub(crate) async fn multiple_handler(
    req: &mut Request,
    depot: &mut Depot,
) -> Result<Json<UploadsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let Some(files) = req.files("images").await else {
        return Err(StatusError::bad_request().brief("Missing image files"));
    };

    let mut urls = Vec::with_capacity(files.len());

    for file in files {
        urls.push(store_file(state, file).await?);
    }

    Ok(Json(UploadsResponse { urls }))
}

async fn store_file(state: &Arc<State>, file: &FilePart) -> Result<String, StatusError> {
    let filename = file.name().unwrap_or("image");

    let content_type = file
        .headers()
        .get(salvo::http::header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string();

    let bytes = tokio::fs::read(file.path())
        .await
        .or_500("failed to read uploaded file")?;

    state
        .app
        .images
        .store(filename, &content_type, &bytes)
        .await
        .map_err(|storage_error| match storage_error {
            StorageError::InvalidImageType { content_type } => {
                StatusError::bad_request().brief(format!("Unsupported image type: {content_type}"))
            }
            StorageError::Io(source) => {
                error!("failed to store uploaded image: {source}");

                StatusError::internal_server_error()
            }
        })
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use aroma_app::storage::MockImageStore;

    use crate::test_helpers::{TestApp, admin_service};

    use super::*;

    const BOUNDARY: &str = "test-boundary";

    fn make_service(images: MockImageStore) -> Service {
        admin_service(
            TestApp {
                images,
                ..TestApp::default()
            },
            Router::with_path("products/upload").post(handler),
        )
    }

    fn multipart_body(field: &str, filename: &str, content_type: &str, data: &str) -> String {
        format!(
            "--{BOUNDARY}\r\n\
             Content-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\n\
             Content-Type: {content_type}\r\n\r\n\
             {data}\r\n\
             --{BOUNDARY}--\r\n"
        )
    }

    #[tokio::test]
    async fn test_upload_stores_the_file() -> TestResult {
        let mut images = MockImageStore::new();

        images
            .expect_store()
            .once()
            .withf(|name, content_type, bytes| {
                name == "bottle.png" && content_type == "image/png" && bytes == b"png bytes"
            })
            .return_once(|_, _, _| Ok("http://example.com/public/uploads/bottle-1.png".to_string()));

        let response: UploadResponse = TestClient::post("http://example.com/products/upload")
            .add_header(
                salvo::http::header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
                true,
            )
            .body(multipart_body("image", "bottle.png", "image/png", "png bytes"))
            .send(&make_service(images))
            .await
            .take_json()
            .await?;

        assert_eq!(response.url, "http://example.com/public/uploads/bottle-1.png");

        Ok(())
    }

    #[tokio::test]
    async fn test_upload_without_file_returns_400() -> TestResult {
        let images = MockImageStore::new();

        let res = TestClient::post("http://example.com/products/upload")
            .send(&make_service(images))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_upload_unsupported_type_returns_400() -> TestResult {
        let mut images = MockImageStore::new();

        images.expect_store().once().return_once(|_, content_type, _| {
            Err(StorageError::InvalidImageType {
                content_type: content_type.to_string(),
            })
        });

        let res = TestClient::post("http://example.com/products/upload")
            .add_header(
                salvo::http::header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
                true,
            )
            .body(multipart_body("image", "clip.gif", "image/gif", "gif bytes"))
            .send(&make_service(images))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
