//! Image upload receiver
//!
//! Streams one multipart file field into an image slot under the images
//! directory. The slot file is opened in place, so a reader can observe a
//! partially written image while an upload is in flight.

use axum::extract::Multipart;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

use crate::error::{Result, WikiError};
use crate::helpers;

/// Form field carrying the file for image slot `index`
pub fn field_name(index: u8) -> String {
    format!("uploadfile{}", index)
}

/// Write the `uploadfile<index>` field of `multipart` to the slot file of
/// `title`, creating or truncating it. Returns the written path.
pub async fn receive(
    mut multipart: Multipart,
    images_dir: &Path,
    title: &str,
    index: u8,
) -> Result<PathBuf> {
    let wanted = field_name(index);

    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| WikiError::multipart("ParseMultipartForm", e))?
    {
        if field.name() != Some(wanted.as_str()) {
            continue;
        }

        let path = images_dir.join(helpers::image_file_name(title, index));
        let mut file = tokio::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)
            .await
            .map_err(|e| WikiError::multipart("OpenFile", e))?;

        let mut written = 0usize;
        while let Some(chunk) = field
            .chunk()
            .await
            .map_err(|e| WikiError::multipart("Copy", e))?
        {
            file.write_all(&chunk)
                .await
                .map_err(|e| WikiError::multipart("Copy", e))?;
            written += chunk.len();
        }
        file.flush()
            .await
            .map_err(|e| WikiError::multipart("Copy", e))?;

        tracing::info!("Stored {} bytes in {:?}", written, path);
        return Ok(path);
    }

    Err(WikiError::multipart(
        format!("FormFile for {}", wanted),
        "no such file",
    ))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use axum::{
        body::Body,
        extract::FromRequest,
        http::{header, Request},
    };
    use tempfile::TempDir;

    const BOUNDARY: &str = "flatwikiboundary";

    /// Build a multipart request carrying a single file field
    pub(crate) fn multipart_request(uri: &str, field: &str, payload: &[u8]) -> Request<Body> {
        multipart_fields_request(uri, &[(field, Some("photo.jpg"), payload)])
    }

    /// Build a multipart request from `(name, filename, value)` parts
    pub(crate) fn multipart_fields_request(
        uri: &str,
        parts: &[(&str, Option<&str>, &[u8])],
    ) -> Request<Body> {
        let mut body = Vec::new();
        for (name, filename, value) in parts {
            let disposition = match filename {
                Some(file) => format!(
                    "form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: image/jpeg",
                    name, file
                ),
                None => format!("form-data; name=\"{}\"", name),
            };
            body.extend_from_slice(
                format!(
                    "--{}\r\nContent-Disposition: {}\r\n\r\n",
                    BOUNDARY, disposition
                )
                .as_bytes(),
            );
            body.extend_from_slice(value);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

        Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn multipart(field: &str, payload: &[u8]) -> Multipart {
        let request = multipart_request("/upload/TestPage/3", field, payload);
        Multipart::from_request(request, &()).await.unwrap()
    }

    #[tokio::test]
    async fn test_receive_writes_slot() {
        let dir = TempDir::new().unwrap();
        let payload = [0xffu8, 0xd8, 0xff, 0xe0, 0x00, 0x10, b'J', b'F', b'I', b'F'];

        let path = receive(multipart("uploadfile3", &payload).await, dir.path(), "TestPage", 3)
            .await
            .unwrap();

        assert_eq!(path, dir.path().join("TestPageImage3.jpg"));
        assert_eq!(std::fs::read(&path).unwrap(), payload);
    }

    #[tokio::test]
    async fn test_receive_truncates_existing() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("TestPageImage3.jpg"), vec![7u8; 64]).unwrap();

        receive(multipart("uploadfile3", b"tiny").await, dir.path(), "TestPage", 3)
            .await
            .unwrap();

        assert_eq!(
            std::fs::read(dir.path().join("TestPageImage3.jpg")).unwrap(),
            b"tiny"
        );
    }

    #[tokio::test]
    async fn test_missing_field() {
        let dir = TempDir::new().unwrap();
        let err = receive(multipart("uploadfile2", b"x").await, dir.path(), "TestPage", 3)
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "FormFile for uploadfile3: no such file");
        assert!(!dir.path().join("TestPageImage3.jpg").exists());
    }

    #[tokio::test]
    async fn test_missing_images_dir() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("images");
        let err = receive(multipart("uploadfile3", b"x").await, &missing, "TestPage", 3)
            .await
            .unwrap_err();

        assert!(err.to_string().starts_with("OpenFile: "));
    }
}
