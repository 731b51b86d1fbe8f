use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use tracing::{debug, warn};

use super::types::*;
use crate::error::{GeminiError, Result};
use crate::util::body_preview;

const GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const ERROR_PREVIEW_BYTES: usize = 512;

#[derive(Clone)]
pub(crate) struct GeminiClient {
    api_key: String,
    http: reqwest::Client,
    base_url: String,
}

impl GeminiClient {
    pub fn new(api_key: &str, http: reqwest::Client) -> Self {
        Self {
            api_key: api_key.to_string(),
            http,
            base_url: GEMINI_API_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-goog-api-key",
            HeaderValue::from_str(&self.api_key)
                .map_err(|e| GeminiError::InvalidKey(e.to_string()))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }

    pub async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse> {
        let url = format!("{}/models/{}:generateContent", self.base_url, model);

        let parts: usize = request.contents.iter().map(|c| c.parts.len()).sum();
        debug!(model, parts, "Gemini generateContent request");

        let response = self
            .http
            .post(&url)
            .headers(self.headers()?)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            let message = body_preview(&error_text, ERROR_PREVIEW_BYTES);
            warn!(status = status.as_u16(), %message, "Gemini API error");
            return Err(GeminiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            GeminiError::MalformedResponse(format!(
                "{e}: {}",
                body_preview(&body, ERROR_PREVIEW_BYTES)
            ))
        })
    }
}
