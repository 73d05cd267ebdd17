use serde::Deserialize;
use ts_rs::TS;

use super::entities::SubmittedAnswer;

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct SubmitAssignmentRequest {
    pub answers: Vec<SubmittedAnswer>,
}

// 存储层创建提交
#[derive(Debug, Clone)]
pub struct CreateSubmissionRequest {
    pub assignment_id: i64,
    pub student_id: i64,
    pub answers: Vec<SubmittedAnswer>,
}
