use async_trait::async_trait;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use reqwest::multipart::{Form, Part};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::client::{
    client_model::{AnalysisOutcome, PriceInfo, ResponseBody},
    error::ClientError,
};
use crate::source::source_model::AnalysisRequest;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

// ============================================================================
// AnalysisBackend trait: the remote service seam
// ============================================================================

/// Raw access to the analysis service. Implementations report transport
/// failures as `ClientError`; `AnalysisClient` decides what the user sees.
#[async_trait]
pub trait AnalysisBackend: Send + Sync {
    async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisOutcome, ClientError>;

    async fn price(&self, product_name: &str) -> Result<PriceInfo, ClientError>;
}

// ============================================================================
// HTTP backend
// ============================================================================

pub struct HttpBackend {
    base_url: String,
    http: reqwest::Client,
}

#[derive(Serialize)]
struct UrlRequest<'a> {
    image_url: &'a str,
}

impl Default for HttpBackend {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl HttpBackend {
    pub fn new(base_url: &str) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send, check the status, then decode. Each step maps to its own error.
    async fn fetch<T: DeserializeOwned>(
        &self,
        endpoint: String,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ClientError> {
        let response = request.send().await.map_err(|source| ClientError::Transport {
            endpoint: endpoint.clone(),
            source,
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status {
                endpoint,
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|source| ClientError::Transport {
            endpoint: endpoint.clone(),
            source,
        })?;

        serde_json::from_slice(&body).map_err(|e| ClientError::Decode {
            endpoint,
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl AnalysisBackend for HttpBackend {
    async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisOutcome, ClientError> {
        let body: ResponseBody = match request {
            AnalysisRequest::File(file) => {
                let endpoint = self.endpoint("/analyze/upload");
                debug!(%endpoint, bytes = file.bytes.len(), "uploading image");

                let part = Part::bytes(file.bytes.clone())
                    .file_name(file.name.clone())
                    .mime_str(&file.media_type)
                    .map_err(|e| ClientError::Request {
                        endpoint: endpoint.clone(),
                        message: e.to_string(),
                    })?;
                let form = Form::new().part("file", part);

                self.fetch(endpoint.clone(), self.http.post(&endpoint).multipart(form))
                    .await?
            }
            AnalysisRequest::Url(url) => {
                let endpoint = self.endpoint("/analyze/url");
                debug!(%endpoint, %url, "submitting image url");

                let payload = UrlRequest { image_url: url };
                self.fetch(endpoint.clone(), self.http.post(&endpoint).json(&payload))
                    .await?
            }
        };

        Ok(body.into())
    }

    async fn price(&self, product_name: &str) -> Result<PriceInfo, ClientError> {
        let endpoint = self.endpoint(&format!("/price/{}", urlencoding::encode(product_name)));
        debug!(%endpoint, "looking up price");

        self.fetch(endpoint.clone(), self.http.get(&endpoint)).await
    }
}
