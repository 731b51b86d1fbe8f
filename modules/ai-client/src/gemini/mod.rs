mod client;
pub(crate) mod types;

pub use types::InlineData;

use tracing::debug;

use crate::error::{GeminiError, Result};
use client::GeminiClient;
use types::*;

// =============================================================================
// Gemini Agent
// =============================================================================

#[derive(Clone)]
pub struct Gemini {
    model: String,
    client: GeminiClient,
}

impl Gemini {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self::with_http_client(api_key, model, reqwest::Client::new())
    }

    /// Build on a preconfigured HTTP client (timeouts, proxies).
    pub fn with_http_client(
        api_key: impl Into<String>,
        model: impl Into<String>,
        http: reqwest::Client,
    ) -> Self {
        Self {
            model: model.into(),
            client: GeminiClient::new(&api_key.into(), http),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.client = self.client.with_base_url(&url.into());
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send a prompt plus one inline image and return the generated text.
    ///
    /// The prompt goes first, the image second, both in a single content unit.
    /// A 2xx response without `candidates[0].content.parts[0].text` is
    /// reported as [`GeminiError::MalformedResponse`].
    pub async fn describe_image(&self, image: InlineData, prompt: &str) -> Result<String> {
        let request = GenerateContentRequest::single(
            Content::default()
                .part(Part::text(prompt))
                .part(Part::inline_data(image)),
        );

        let response = self.client.generate_content(&self.model, &request).await?;

        debug!(
            finish_reason = response.finish_reason().unwrap_or("unknown"),
            candidates = response.candidates.len(),
            "Gemini response received"
        );

        response.text().map(str::to_string).ok_or_else(|| {
            GeminiError::MalformedResponse("no candidates[0].content.parts[0].text".to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gemini_new() {
        let ai = Gemini::new("test-key", "gemini-1.5-flash-latest");
        assert_eq!(ai.model(), "gemini-1.5-flash-latest");
    }

    #[test]
    fn unreachable_endpoint_is_a_network_error() {
        let ai = Gemini::new("test-key", "gemini-1.5-flash-latest")
            .with_base_url("http://127.0.0.1:9/v1beta/");

        let result = tokio_test::block_on(
            ai.describe_image(InlineData::new("image/jpeg", "QUJD"), "describe"),
        );

        assert!(matches!(result, Err(GeminiError::Network(_))), "got {result:?}");
    }

    const ENDPOINT: &str = "/v1beta/models/gemini-test:generateContent";

    fn client_for(server: &mockito::Server) -> Gemini {
        Gemini::new("test-key", "gemini-test").with_base_url(format!("{}/v1beta", server.url()))
    }

    fn jpeg() -> InlineData {
        InlineData::new("image/jpeg", "QUJD")
    }

    #[tokio::test]
    async fn candidate_text_is_returned() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", ENDPOINT)
            .match_header("x-goog-api-key", "test-key")
            .match_body(mockito::Matcher::Json(serde_json::json!({
                "contents": [{
                    "parts": [
                        { "text": "describe" },
                        { "inlineData": { "mimeType": "image/jpeg", "data": "QUJD" } }
                    ]
                }]
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"candidates":[{"content":{"parts":[{"text":"이름: 몬스테라\n온도:"}]}}]}"#)
            .create_async()
            .await;

        let text = client_for(&server).describe_image(jpeg(), "describe").await.unwrap();

        assert_eq!(text, "이름: 몬스테라\n온도:");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn server_error_status_is_an_api_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", ENDPOINT)
            .with_status(500)
            .with_body(r#"{"error":{"code":500,"message":"internal"}}"#)
            .create_async()
            .await;

        let result = client_for(&server).describe_image(jpeg(), "describe").await;

        match result {
            Err(GeminiError::Api { status, message }) => {
                assert_eq!(status, 500);
                assert!(message.contains("internal"));
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn empty_object_is_malformed() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", ENDPOINT)
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        let result = client_for(&server).describe_image(jpeg(), "describe").await;

        assert!(matches!(result, Err(GeminiError::MalformedResponse(_))), "got {result:?}");
    }

    #[tokio::test]
    async fn non_json_body_is_malformed() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", ENDPOINT)
            .with_status(200)
            .with_body("hello")
            .create_async()
            .await;

        let result = client_for(&server).describe_image(jpeg(), "describe").await;

        assert!(matches!(result, Err(GeminiError::MalformedResponse(_))), "got {result:?}");
    }
}
