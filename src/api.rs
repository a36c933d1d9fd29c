//! HTTP client for the DLP assistant endpoints.
//!
//! All calls are plain JSON over `reqwest`. `DlpBackend` is the seam the
//! messaging and form flows depend on, so they can run against a fake.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("endpoint returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("unreadable response: {0}")]
    Decode(#[from] serde_json::Error),
}

pub type ApiResult<T> = Result<T, ApiError>;

// ============================================
// Wire types
// ============================================

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    message: &'a str,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct ChatReply {
    #[serde(default)]
    pub response: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ReferenceEntry {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct GuidelinesResponse {
    #[serde(default)]
    guidelines: Vec<ReferenceEntry>,
}

#[derive(Debug, Default, Deserialize)]
struct ReferencesResponse {
    #[serde(default)]
    references: Vec<ReferenceEntry>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct AssessmentRequest {
    pub defect_type: String,
    pub reported_within: String,
    pub severity: String,
    pub repair_cost: String,
    pub details: String,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct AssessmentReply {
    #[serde(default)]
    pub defect_type: Option<String>,
    #[serde(default)]
    pub liability_status: Option<String>,
    #[serde(default)]
    pub recommendation: Option<String>,
    #[serde(default)]
    pub severity: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct FeedbackRequest {
    #[serde(rename = "type")]
    pub kind: String,
    pub rating: u8,
    pub message: String,
    pub email: String,
}

// ============================================
// Backend seam
// ============================================

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
pub trait DlpBackend {
    async fn chat(&self, message: &str) -> ApiResult<ChatReply>;
    async fn guidelines(&self) -> ApiResult<Vec<ReferenceEntry>>;
    async fn legal_references(&self) -> ApiResult<Vec<ReferenceEntry>>;
    async fn assess(&self, request: &AssessmentRequest) -> ApiResult<AssessmentReply>;
    async fn submit_feedback(&self, request: &FeedbackRequest) -> ApiResult<()>;
}

#[derive(Clone, Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn read_json<T: for<'de> Deserialize<'de>>(res: reqwest::Response) -> ApiResult<T> {
        let status = res.status();
        let body_text = res.text().await?;
        if !status.is_success() {
            return Err(ApiError::Status {
                status,
                body: body_text,
            });
        }
        Ok(serde_json::from_str(&body_text)?)
    }
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl DlpBackend for ApiClient {
    async fn chat(&self, message: &str) -> ApiResult<ChatReply> {
        debug!("POST chat ({} chars)", message.len());
        let res = self
            .http
            .post(self.endpoint("chat"))
            .json(&ChatRequest { message })
            .send()
            .await?;
        Self::read_json(res).await
    }

    async fn guidelines(&self) -> ApiResult<Vec<ReferenceEntry>> {
        let res = self.http.get(self.endpoint("guidelines")).send().await?;
        let data: GuidelinesResponse = Self::read_json(res).await?;
        Ok(data.guidelines)
    }

    async fn legal_references(&self) -> ApiResult<Vec<ReferenceEntry>> {
        let res = self
            .http
            .get(self.endpoint("legal-references"))
            .send()
            .await?;
        let data: ReferencesResponse = Self::read_json(res).await?;
        Ok(data.references)
    }

    async fn assess(&self, request: &AssessmentRequest) -> ApiResult<AssessmentReply> {
        // The assessment endpoint is read regardless of status; only the body matters.
        let res = self
            .http
            .post(self.endpoint("assess"))
            .json(request)
            .send()
            .await?;
        let body_text = res.text().await?;
        Ok(serde_json::from_str(&body_text)?)
    }

    async fn submit_feedback(&self, request: &FeedbackRequest) -> ApiResult<()> {
        let res = self
            .http
            .post(self.endpoint("feedback"))
            .json(request)
            .send()
            .await?;
        let status = res.status();
        if status.is_success() {
            Ok(())
        } else {
            let body = res.text().await.unwrap_or_default();
            Err(ApiError::Status { status, body })
        }
    }
}
