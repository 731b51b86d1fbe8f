// Trait seams for the workflow's two external collaborators.
//
// ImageFile stands in for the picker's file handle; PlantAnalyzer for the
// generation service. Tests swap both for the in-memory mocks in `testing`.

use ai_client::{Gemini, GeminiError, InlineData};
use async_trait::async_trait;
use plantscan_common::AnalysisError;
use tracing::warn;

// ---------------------------------------------------------------------------
// ImageFile
// ---------------------------------------------------------------------------

#[async_trait]
pub trait ImageFile: Send + Sync {
    /// Declared size in bytes, known before any read.
    fn size(&self) -> u64;

    /// Declared MIME type, e.g. `image/png`.
    fn mime_type(&self) -> &str;

    async fn read(&self) -> std::io::Result<Vec<u8>>;
}

// ---------------------------------------------------------------------------
// PlantAnalyzer
// ---------------------------------------------------------------------------

#[async_trait]
pub trait PlantAnalyzer: Send + Sync {
    /// Send one encoded image with the instruction text; return the service's
    /// free-text answer.
    async fn analyze(&self, image: InlineData, prompt: &str) -> Result<String, AnalysisError>;
}

#[async_trait]
impl PlantAnalyzer for Gemini {
    async fn analyze(&self, image: InlineData, prompt: &str) -> Result<String, AnalysisError> {
        self.describe_image(image, prompt)
            .await
            .map_err(analysis_error)
    }
}

fn analysis_error(err: GeminiError) -> AnalysisError {
    match err {
        GeminiError::Api { status, .. } => AnalysisError::ServerError { status },
        GeminiError::MalformedResponse(detail) => {
            warn!(%detail, "Response lacked generated content");
            AnalysisError::MalformedResponse
        }
        GeminiError::Network(e) => AnalysisError::Transport(e),
        GeminiError::InvalidKey(e) => AnalysisError::Transport(format!("invalid API key: {e}")),
    }
}
