//! Terminal presentation of workflow progress and results.

use std::fmt::Write;

use plantscan_common::{AnalysisError, PlantRecord};

use crate::workflow::WorkflowState;

/// Progress line for in-flight phases; `None` for idle and terminal states.
pub fn progress_message(state: &WorkflowState) -> Option<&'static str> {
    match state {
        WorkflowState::Validating => Some("이미지 확인 중..."),
        WorkflowState::Encoding => Some("이미지 읽는 중..."),
        WorkflowState::AwaitingResponse => Some("이미지 분석 중..."),
        WorkflowState::Parsing => Some("결과 정리 중..."),
        _ => None,
    }
}

pub fn error_message(err: &AnalysisError) -> String {
    format!("이미지 처리 중 오류가 발생했습니다: {err}")
}

pub fn render_record(record: &PlantRecord) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "이름: {}", record.name);
    let _ = writeln!(out, "학명: {}", record.scientific_name);
    let _ = writeln!(out, "난이도: {}", record.difficulty);
    let _ = writeln!(out, "물주기: {}", record.water_frequency);
    let _ = writeln!(out, "온도: {}", record.temperature);
    let _ = writeln!(out, "습도: {}", record.humidity);
    render_list(&mut out, "특징", &record.features);
    render_list(&mut out, "주의사항", &record.precautions);
    out
}

fn render_list(out: &mut String, title: &str, items: &[String]) {
    let _ = writeln!(out, "{title}:");
    if items.is_empty() {
        let _ = writeln!(out, "  (없음)");
    }
    for item in items {
        let _ = writeln!(out, "  • {item}");
    }
}
