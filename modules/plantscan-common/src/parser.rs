//! Line-oriented parser for the service's plant description.
//!
//! The service is asked for `label: value` lines followed by two bulleted
//! sections. Nothing guarantees it complies, so the parser is total: any text
//! yields a record, with defaults for whatever could not be found.
//!
//! Labels are matched with `contains`, not `starts_with`, so `식물 이름: ...`
//! or `**이름:** ...` still count. Rules are tried in a fixed order and the
//! first match wins.

use crate::record::PlantRecord;

const NAME_LABELS: &[&str] = &["이름:", "식물명:", "식물:"];
const SCIENTIFIC_NAME_LABEL: &str = "학명:";
/// Matched against the lowercased line.
const WATERING_LABEL: &str = "물주기:";
const TEMPERATURE_LABEL: &str = "온도:";
const HUMIDITY_LABEL: &str = "습도:";
const FEATURES_HEADER: &str = "특징:";
const PRECAUTIONS_HEADER: &str = "주의사항:";

const BULLETS: &[char] = &['-', '•'];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Section {
    #[default]
    None,
    Features,
    Precautions,
}

#[derive(Debug, Default)]
struct ParseState {
    record: PlantRecord,
    section: Section,
}

impl ParseState {
    fn step(mut self, raw: &str) -> Self {
        let line = raw.trim();

        if NAME_LABELS.iter().any(|label| line.contains(label)) {
            self.record.name = value_after_colon(line);
        } else if line.contains(SCIENTIFIC_NAME_LABEL) {
            self.record.scientific_name = value_after_colon(line);
        } else if line.to_lowercase().contains(WATERING_LABEL) {
            self.record.water_frequency = value_after_colon(line);
        } else if line.contains(TEMPERATURE_LABEL) {
            self.record.temperature = value_after_colon(line);
        } else if line.contains(HUMIDITY_LABEL) {
            self.record.humidity = value_after_colon(line);
        } else if line.contains(FEATURES_HEADER) {
            self.section = Section::Features;
        } else if line.contains(PRECAUTIONS_HEADER) {
            self.section = Section::Precautions;
        } else if !line.is_empty() {
            self.push_item(line);
        }

        self
    }

    fn push_item(&mut self, line: &str) {
        let list = match self.section {
            Section::None => return,
            Section::Features => &mut self.record.features,
            Section::Precautions => &mut self.record.precautions,
        };

        let item = line.strip_prefix(BULLETS).unwrap_or(line).trim();
        if !item.is_empty() {
            list.push(item.to_string());
        }
    }
}

/// Everything after the first colon, trimmed. Empty when nothing follows.
fn value_after_colon(line: &str) -> String {
    line.split_once(':')
        .map(|(_, value)| value.trim().to_string())
        .unwrap_or_default()
}

/// Parse free-text service output into a [`PlantRecord`].
///
/// Later occurrences of a label overwrite earlier ones. Bullet lines before
/// any section header are dropped; blank lines never reset the section.
pub fn parse(text: &str) -> PlantRecord {
    text.lines()
        .fold(ParseState::default(), ParseState::step)
        .record
}
