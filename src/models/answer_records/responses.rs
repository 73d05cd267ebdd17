use super::entities::GradedAnswer;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/answer-record.ts")]
pub struct SaveMarksResponse {
    pub assignment_id: i64,
    pub student_id: i64,
    pub records_saved: usize,
    pub total_awarded: f64,
    pub total_available: f64,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/answer-record.ts")]
pub struct MarkListResponse {
    pub assignment_id: i64,
    pub items: Vec<GradedAnswer>,
}
