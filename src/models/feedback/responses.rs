use serde::Serialize;
use ts_rs::TS;

use super::entities::{AssignmentFeedbackSummary, RevisionItem, StudentFeedbackSummary};

// 学生姓名，方便前端展示
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/feedback.ts")]
pub struct StudentRef {
    pub student_id: i64,
    pub full_name: Option<String>,
    pub email: Option<String>,
}

// 教师查看的作业反馈
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/feedback.ts")]
pub struct AssignmentFeedbackResponse {
    pub assignment_id: i64,
    pub assignment_title: String,
    pub feedback_released: bool,
    pub students: Vec<StudentRef>,
    pub summary: AssignmentFeedbackSummary,
}

// 单个学生的反馈与复习包
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/feedback.ts")]
pub struct StudentFeedbackResponse {
    pub assignment_id: i64,
    pub assignment_title: String,
    pub student: StudentRef,
    pub summary: StudentFeedbackSummary,
    pub revision_pack: Vec<RevisionItem>,
}

// 反馈发布状态
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/feedback.ts")]
pub struct FeedbackReleaseResponse {
    pub assignment_id: i64,
    pub feedback_released: bool,
}
