//! Single-cycle analysis workflow.
//!
//! One controller owns one [`WorkflowState`]. Each `select_file` call starts a
//! new cycle with a fresh id; a cycle only ever writes state while its id is
//! still the current one, so results from a superseded cycle are dropped when
//! they arrive. Nothing is cancelled at the transport.

use std::sync::Arc;

use ai_client::InlineData;
use base64::Engine;
use chrono::{DateTime, Utc};
use plantscan_common::config::DEFAULT_MAX_FILE_BYTES;
use plantscan_common::{parse, AnalysisError, PlantRecord};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::prompt::PLANT_DESCRIPTION_PROMPT;
use crate::traits::{ImageFile, PlantAnalyzer};

/// Sent when the declared type is not an image type.
const FALLBACK_MIME_TYPE: &str = "image/jpeg";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowState {
    Idle,
    Validating,
    Encoding,
    AwaitingResponse,
    Parsing,
    Succeeded(PlantRecord),
    Failed(AnalysisError),
}

impl WorkflowState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded(_) | Self::Failed(_))
    }

    pub fn is_in_flight(&self) -> bool {
        !self.is_terminal() && *self != Self::Idle
    }

    pub fn phase(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Validating => "validating",
            Self::Encoding => "encoding",
            Self::AwaitingResponse => "awaiting_response",
            Self::Parsing => "parsing",
            Self::Succeeded(_) => "succeeded",
            Self::Failed(_) => "failed",
        }
    }

    pub fn record(&self) -> Option<&PlantRecord> {
        match self {
            Self::Succeeded(record) => Some(record),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&AnalysisError> {
        match self {
            Self::Failed(err) => Some(err),
            _ => None,
        }
    }
}

/// What observers of the controller see.
#[derive(Debug, Clone)]
pub struct CycleSnapshot {
    /// 0 until the first selection; increments once per selection.
    pub cycle: u64,
    pub state: WorkflowState,
    pub changed_at: DateTime<Utc>,
}

pub struct WorkflowController {
    analyzer: Arc<dyn PlantAnalyzer>,
    prompt: String,
    max_file_bytes: u64,
    state: watch::Sender<CycleSnapshot>,
}

impl WorkflowController {
    pub fn new(analyzer: Arc<dyn PlantAnalyzer>) -> Self {
        let (state, _) = watch::channel(CycleSnapshot {
            cycle: 0,
            state: WorkflowState::Idle,
            changed_at: Utc::now(),
        });

        Self {
            analyzer,
            prompt: PLANT_DESCRIPTION_PROMPT.to_string(),
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
            state,
        }
    }

    pub fn with_max_file_bytes(mut self, max_file_bytes: u64) -> Self {
        self.max_file_bytes = max_file_bytes;
        self
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    pub fn state(&self) -> WorkflowState {
        self.state.borrow().state.clone()
    }

    pub fn snapshot(&self) -> CycleSnapshot {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<CycleSnapshot> {
        self.state.subscribe()
    }

    /// Start a new cycle for `file`, superseding any cycle in flight.
    ///
    /// Returns the terminal state this cycle reached, or `None` if a later
    /// selection took over before it finished.
    pub async fn select_file(&self, file: Option<Arc<dyn ImageFile>>) -> Option<WorkflowState> {
        let cycle = self.begin();
        self.run_cycle(cycle, file).await
    }

    async fn run_cycle(
        &self,
        cycle: u64,
        file: Option<Arc<dyn ImageFile>>,
    ) -> Option<WorkflowState> {
        let file = match self.validate(file) {
            Ok(file) => file,
            Err(err) => return self.finish(cycle, WorkflowState::Failed(err)),
        };

        if !self.advance(cycle, WorkflowState::Encoding) {
            return None;
        }
        let image = match encode(file.as_ref()).await {
            Ok(image) => image,
            Err(err) => return self.finish(cycle, WorkflowState::Failed(err)),
        };

        if !self.advance(cycle, WorkflowState::AwaitingResponse) {
            return None;
        }
        let text = match self.analyzer.analyze(image, &self.prompt).await {
            Ok(text) => text,
            Err(err) => return self.finish(cycle, WorkflowState::Failed(err)),
        };

        if !self.advance(cycle, WorkflowState::Parsing) {
            return None;
        }
        let record = parse(&text);

        self.finish(cycle, WorkflowState::Succeeded(record))
    }

    fn validate(
        &self,
        file: Option<Arc<dyn ImageFile>>,
    ) -> Result<Arc<dyn ImageFile>, AnalysisError> {
        let file = file.ok_or(AnalysisError::MissingInput)?;

        let size = file.size();
        if size > self.max_file_bytes {
            return Err(AnalysisError::FileTooLarge {
                size,
                limit: self.max_file_bytes,
            });
        }

        Ok(file)
    }

    /// Open a new cycle at `Validating`, replacing whatever was shown before.
    fn begin(&self) -> u64 {
        let mut cycle = 0;
        self.state.send_modify(|snapshot| {
            if snapshot.state.is_in_flight() {
                info!(
                    superseded = snapshot.cycle,
                    "New selection supersedes cycle in flight"
                );
            }
            snapshot.cycle += 1;
            snapshot.state = WorkflowState::Validating;
            snapshot.changed_at = Utc::now();
            cycle = snapshot.cycle;
        });
        info!(cycle, phase = "validating", "Analysis cycle started");
        cycle
    }

    /// Move `cycle` to `next` if it is still current. The check and the write
    /// happen under the channel's lock.
    fn advance(&self, cycle: u64, next: WorkflowState) -> bool {
        let phase = next.phase();
        let applied = self.state.send_if_modified(|snapshot| {
            if snapshot.cycle != cycle {
                return false;
            }
            snapshot.state = next;
            snapshot.changed_at = Utc::now();
            true
        });

        if applied {
            info!(cycle, phase, "Workflow transition");
        } else {
            debug!(cycle, phase, "Dropping transition from superseded cycle");
        }
        applied
    }

    fn finish(&self, cycle: u64, terminal: WorkflowState) -> Option<WorkflowState> {
        if let WorkflowState::Failed(ref err) = terminal {
            warn!(cycle, error = %err, "Analysis cycle failed");
        }
        self.advance(cycle, terminal.clone()).then_some(terminal)
    }
}

/// Read the whole file and base64 it for inline transport.
async fn encode(file: &dyn ImageFile) -> Result<InlineData, AnalysisError> {
    let bytes = file
        .read()
        .await
        .map_err(|e| AnalysisError::ReadError(e.to_string()))?;

    let mime_type = if file.mime_type().starts_with("image/") {
        file.mime_type()
    } else {
        FALLBACK_MIME_TYPE
    };

    debug!(bytes = bytes.len(), mime_type, "Encoding image");
    let data = base64::engine::general_purpose::STANDARD.encode(&bytes);
    Ok(InlineData::new(mime_type, data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{InMemoryImage, MockAnalyzer};

    #[test]
    fn in_flight_excludes_idle_and_terminal_states() {
        assert!(!WorkflowState::Idle.is_in_flight());
        assert!(WorkflowState::Validating.is_in_flight());
        assert!(WorkflowState::AwaitingResponse.is_in_flight());
        assert!(!WorkflowState::Succeeded(PlantRecord::default()).is_in_flight());
        assert!(!WorkflowState::Failed(AnalysisError::MissingInput).is_in_flight());
    }

    #[test]
    fn new_controller_is_idle_at_cycle_zero() {
        let controller = WorkflowController::new(Arc::new(MockAnalyzer::new()));
        let snapshot = controller.snapshot();
        assert_eq!(snapshot.cycle, 0);
        assert_eq!(snapshot.state, WorkflowState::Idle);
    }

    #[tokio::test]
    async fn encode_base64s_bytes_and_keeps_image_mime() {
        let image = InMemoryImage::new(b"ABC".to_vec(), "image/png");
        let encoded = encode(&image).await.unwrap();
        assert_eq!(encoded, InlineData::new("image/png", "QUJD"));
    }

    #[tokio::test]
    async fn encode_falls_back_to_jpeg_for_untyped_files() {
        let image = InMemoryImage::new(b"ABC".to_vec(), "application/octet-stream");
        let encoded = encode(&image).await.unwrap();
        assert_eq!(encoded.mime_type, "image/jpeg");
    }

    #[tokio::test]
    async fn size_at_the_limit_is_accepted() {
        let analyzer = Arc::new(MockAnalyzer::new().on_image(b"ok", Ok("이름: 선인장".into())));
        let controller = WorkflowController::new(analyzer).with_max_file_bytes(2);

        let end = controller
            .select_file(Some(Arc::new(InMemoryImage::jpeg(b"ok".to_vec()))))
            .await
            .unwrap();
        assert_eq!(end.record().unwrap().name, "선인장");
    }

    #[tokio::test]
    async fn custom_prompt_is_sent() {
        let analyzer = Arc::new(MockAnalyzer::new().on_image(b"img", Ok(String::new())));
        let controller = WorkflowController::new(analyzer.clone()).with_prompt("describe");

        controller
            .select_file(Some(Arc::new(InMemoryImage::jpeg(b"img".to_vec()))))
            .await;
        assert_eq!(analyzer.prompts(), vec!["describe".to_string()]);
    }
}
