use serde::Deserialize;
use ts_rs::TS;

// 单题得分
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/answer-record.ts")]
pub struct MarkEntry {
    pub question_id: i64,
    pub marks_awarded: f64,
}

// 为一名学生保存（或覆盖）作业得分
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/answer-record.ts")]
pub struct SaveMarksRequest {
    pub student_id: i64,
    pub marks: Vec<MarkEntry>,
}
