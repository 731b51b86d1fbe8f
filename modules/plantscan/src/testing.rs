// Test mocks for the analysis workflow.
//
// Two mocks matching the two trait boundaries:
// - InMemoryImage (ImageFile): bytes in memory, optional declared size, optional read failure
// - MockAnalyzer (PlantAnalyzer): HashMap-based image bytes → scripted reply, optionally gated

use std::collections::HashMap;
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use ai_client::InlineData;
use async_trait::async_trait;
use base64::Engine;
use plantscan_common::AnalysisError;
use tokio::sync::Notify;

use crate::traits::{ImageFile, PlantAnalyzer};

// ---------------------------------------------------------------------------
// InMemoryImage
// ---------------------------------------------------------------------------

pub struct InMemoryImage {
    bytes: Vec<u8>,
    mime_type: String,
    declared_size: Option<u64>,
    unreadable: bool,
}

impl InMemoryImage {
    pub fn new(bytes: Vec<u8>, mime_type: &str) -> Self {
        Self {
            bytes,
            mime_type: mime_type.to_string(),
            declared_size: None,
            unreadable: false,
        }
    }

    pub fn jpeg(bytes: Vec<u8>) -> Self {
        Self::new(bytes, "image/jpeg")
    }

    /// Report `size` from `size()` regardless of the actual bytes.
    pub fn with_declared_size(mut self, size: u64) -> Self {
        self.declared_size = Some(size);
        self
    }

    /// Make every `read()` fail.
    pub fn unreadable(mut self) -> Self {
        self.unreadable = true;
        self
    }
}

#[async_trait]
impl ImageFile for InMemoryImage {
    fn size(&self) -> u64 {
        self.declared_size.unwrap_or(self.bytes.len() as u64)
    }

    fn mime_type(&self) -> &str {
        &self.mime_type
    }

    async fn read(&self) -> io::Result<Vec<u8>> {
        if self.unreadable {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "permission denied"));
        }
        Ok(self.bytes.clone())
    }
}

// ---------------------------------------------------------------------------
// MockAnalyzer
// ---------------------------------------------------------------------------

struct Scripted {
    reply: Result<String, AnalysisError>,
    gate: Option<Arc<Notify>>,
}

/// Analyzer keyed by the image bytes it receives. Unregistered images get a
/// `Transport` error. A gated reply waits for `gate.notify_one()` first.
pub struct MockAnalyzer {
    replies: HashMap<String, Scripted>,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
    mime_types: Mutex<Vec<String>>,
}

impl MockAnalyzer {
    pub fn new() -> Self {
        Self {
            replies: HashMap::new(),
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
            mime_types: Mutex::new(Vec::new()),
        }
    }

    pub fn on_image(mut self, bytes: &[u8], reply: Result<String, AnalysisError>) -> Self {
        self.replies.insert(key(bytes), Scripted { reply, gate: None });
        self
    }

    pub fn on_image_gated(
        mut self,
        bytes: &[u8],
        gate: Arc<Notify>,
        reply: Result<String, AnalysisError>,
    ) -> Self {
        self.replies.insert(
            key(bytes),
            Scripted {
                reply,
                gate: Some(gate),
            },
        );
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn mime_types(&self) -> Vec<String> {
        self.mime_types.lock().unwrap().clone()
    }
}

impl Default for MockAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

fn key(bytes: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(bytes)
}

#[async_trait]
impl PlantAnalyzer for MockAnalyzer {
    async fn analyze(&self, image: InlineData, prompt: &str) -> Result<String, AnalysisError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.mime_types.lock().unwrap().push(image.mime_type.clone());

        let Some(scripted) = self.replies.get(&image.data) else {
            return Err(AnalysisError::Transport(format!(
                "no reply registered for {} base64 bytes",
                image.data.len()
            )));
        };

        if let Some(gate) = &scripted.gate {
            gate.notified().await;
        }
        scripted.reply.clone()
    }
}
