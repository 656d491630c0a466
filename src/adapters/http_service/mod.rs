//! REST client for the remote processing service.
//!
//! Wraps the three endpoints (`/upload`, `/check/{filename}`,
//! `/download/{filename}`) using [`reqwest`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Url;

use crate::domain::model::{CheckResponse, UploadRequest, UploadResponse, UploadStatus};
use crate::error::ServiceError;
use crate::ports::ProcessingServicePort;

/// HTTP client for a single processing service instance.
pub struct HttpProcessingAdapter {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpProcessingAdapter {
    /// Create a client for `base_url`, e.g. `http://localhost:9000`.
    ///
    /// `timeout` bounds every individual request, uploads included.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ServiceError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Self::with_client(client, base_url)
    }

    /// Create an adapter reusing an existing [`reqwest::Client`]
    pub fn with_client(client: reqwest::Client, base_url: &str) -> Result<Self, ServiceError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ServiceError::Network(format!("invalid service URL '{}': {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ServiceError::Network(format!(
                "service URL cannot carry a path: {}",
                base_url
            )));
        }
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Append path segments, percent-encoding each one
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ServiceError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ServiceError::Network(format!("service URL cannot carry a path: {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn build_form(request: &UploadRequest) -> Form {
        let video = Part::bytes(request.file.bytes.clone()).file_name(request.file.file_name.clone());
        request
            .form_fields()
            .into_iter()
            .fold(Form::new().part("video", video), |form, (name, value)| {
                form.text(name, value)
            })
    }

    // ---- private helpers ----

    /// Ensure the response has a success status code, returning a
    /// [`ServiceError::Status`] with the body text otherwise.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ServiceError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(ServiceError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ServiceError> {
        let response = Self::ensure_success(response).await?;
        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| ServiceError::Decode(e.to_string()))
    }
}

#[async_trait]
impl ProcessingServicePort for HttpProcessingAdapter {
    async fn upload(&self, request: &UploadRequest) -> Result<UploadResponse, ServiceError> {
        let url = self.endpoint(&["upload"])?;
        tracing::debug!(%url, file = %request.file.file_name, bytes = request.file.len(), "Uploading video");

        let response = self
            .client
            .post(url)
            .multipart(Self::build_form(request))
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Self::parse_response(response).await;
        }

        // Rejections often arrive with a 4xx and an error body; keep the message
        let body = response.bytes().await?;
        match serde_json::from_slice::<UploadResponse>(&body) {
            Ok(rejection) if rejection.status == UploadStatus::Error => Ok(rejection),
            _ => Err(ServiceError::Status {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).into_owned(),
            }),
        }
    }

    async fn check(&self, filename: &str) -> Result<CheckResponse, ServiceError> {
        let url = self.endpoint(&["check", filename])?;
        let response = self.client.get(url).send().await?;
        Self::parse_response(response).await
    }

    async fn download(&self, filename: &str) -> Result<Vec<u8>, ServiceError> {
        let url = self.endpoint(&["download", filename])?;
        tracing::debug!(%url, "Downloading processed video");

        let response = self.client.get(url).send().await?;
        let response = Self::ensure_success(response).await?;
        Ok(response.bytes().await?.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn adapter(base: &str) -> HttpProcessingAdapter {
        HttpProcessingAdapter::with_client(reqwest::Client::new(), base).unwrap()
    }

    #[test]
    fn test_endpoints_join_segments() {
        let service = adapter("http://localhost:9000");
        assert_eq!(
            service.endpoint(&["upload"]).unwrap().as_str(),
            "http://localhost:9000/upload"
        );
        assert_eq!(
            service.endpoint(&["check", "out.mp4"]).unwrap().as_str(),
            "http://localhost:9000/check/out.mp4"
        );
    }

    #[test]
    fn test_endpoints_respect_base_path_and_encode_filenames() {
        let service = adapter("http://example.com/api/");
        assert_eq!(
            service.endpoint(&["download", "my clip.mp4"]).unwrap().as_str(),
            "http://example.com/api/download/my%20clip.mp4"
        );
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        assert!(HttpProcessingAdapter::with_client(reqwest::Client::new(), "not a url").is_err());
        assert!(HttpProcessingAdapter::with_client(reqwest::Client::new(), "mailto:a@b.c").is_err());
    }
}
