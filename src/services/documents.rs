// src/services/documents.rs

//! Supporting document listing and upload.

use std::path::Path;

use reqwest::{Method, RequestBuilder};
use reqwest::multipart::{Form, Part};

use crate::error::{AppError, Result};
use crate::models::{Document, DocumentType};
use crate::services::ApiClient;

#[derive(Clone)]
pub struct DocumentService {
    api: ApiClient,
}

impl DocumentService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn documents_for_case(&self, case_id: &str) -> Result<Vec<Document>> {
        self.api.send_json(self.list_request(case_id)?).await
    }

    pub async fn get_document(&self, id: &str) -> Result<Document> {
        self.api.send_json(self.get_request(id)?).await
    }

    fn list_request(&self, case_id: &str) -> Result<RequestBuilder> {
        self.api.request(Method::GET, &format!("/documents/case/{case_id}"))
    }

    fn get_request(&self, id: &str) -> Result<RequestBuilder> {
        self.api.request(Method::GET, &format!("/documents/{id}"))
    }

    /// Upload a file as multipart fields `file`, `name` and `type`.
    pub async fn upload(
        &self,
        case_id: &str,
        file: &Path,
        name: Option<&str>,
        document_type: DocumentType,
    ) -> Result<Document> {
        let file_name = file
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| AppError::validation(format!("not a file path: {}", file.display())))?
            .to_string();
        let bytes = tokio::fs::read(file).await?;
        let name = name.unwrap_or(&file_name).to_string();

        log::info!("Uploading {} to case {}", file_name, case_id);
        let request = self.upload_request(case_id, &file_name, bytes, &name, document_type)?;
        self.api.send_json(request).await
    }

    fn upload_request(
        &self,
        case_id: &str,
        file_name: &str,
        bytes: Vec<u8>,
        name: &str,
        document_type: DocumentType,
    ) -> Result<RequestBuilder> {
        let part = Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(mime_for(file_name))?;
        let form = upload_fields(name, document_type)
            .into_iter()
            .fold(Form::new().part(FILE_FIELD, part), |form, (field, value)| {
                form.text(field, value)
            });

        Ok(self
            .api
            .request(Method::POST, &format!("/documents/case/{case_id}/upload"))?
            .multipart(form))
    }
}

const FILE_FIELD: &str = "file";

/// Text parts sent next to the file.
fn upload_fields(name: &str, document_type: DocumentType) -> [(&'static str, String); 2] {
    [
        ("name", name.to_string()),
        ("type", document_type.as_str().to_string()),
    ]
}

fn mime_for(file_name: &str) -> &'static str {
    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "pdf" => "application/pdf",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::services::client::tests::client;

    #[test]
    fn test_upload_request() {
        let documents = DocumentService::new(client());
        let request = documents
            .upload_request(
                "12",
                "pass.pdf",
                b"%PDF".to_vec(),
                "Boarding pass",
                DocumentType::BoardingPass,
            )
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(request.method(), &Method::POST);
        assert_eq!(request.url().path(), "/api/documents/case/12/upload");
        let content_type = request.headers()["content-type"].to_str().unwrap();
        assert!(content_type.starts_with("multipart/form-data; boundary="));
    }

    #[test]
    fn test_upload_fields() {
        let fields = upload_fields("Boarding pass", DocumentType::BoardingPass);
        assert_eq!(FILE_FIELD, "file");
        assert_eq!(fields[0], ("name", "Boarding pass".to_string()));
        assert_eq!(fields[1], ("type", "BOARDING_PASS".to_string()));
    }

    #[test]
    fn test_document_paths() {
        let documents = DocumentService::new(client());
        let list = documents.list_request("12").unwrap().build().unwrap();
        assert_eq!(list.url().path(), "/api/documents/case/12");

        let one = documents.get_request("3").unwrap().build().unwrap();
        assert_eq!(one.method(), &Method::GET);
        assert_eq!(one.url().path(), "/api/documents/3");
    }

    #[test]
    fn test_mime_for() {
        assert_eq!(mime_for("pass.PDF"), "application/pdf");
        assert_eq!(mime_for("scan.jpeg"), "image/jpeg");
        assert_eq!(mime_for("notes"), "application/octet-stream");
    }
}
