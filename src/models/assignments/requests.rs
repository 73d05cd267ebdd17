use serde::Deserialize;
use ts_rs::TS;

use super::entities::AssignmentStatus;
use crate::models::common::PaginationQuery;

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct CreateAssignmentRequest {
    pub class_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(default)]
    pub question_ids: Vec<i64>,
    #[serde(skip)]
    #[ts(skip)]
    pub created_by: i64,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct UpdateAssignmentRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<chrono::DateTime<chrono::Utc>>,
    pub status: Option<AssignmentStatus>,
}

// 替换作业题目（按给定顺序）
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct SetAssignmentQuestionsRequest {
    pub question_ids: Vec<i64>,
}

// 发布/撤回学生反馈
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct ReleaseFeedbackRequest {
    pub released: bool,
}

// 作业列表查询参数（来自HTTP请求）
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct AssignmentQueryParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    #[serde(deserialize_with = "crate::models::common::pagination::deserialize_string_to_i64")]
    pub class_id: i64,
    pub search: Option<String>,
}

// 作业列表查询（用于存储层）
#[derive(Debug, Clone)]
pub struct AssignmentListQuery {
    pub pagination: PaginationQuery,
    pub class_id: i64,
    pub published_only: bool,
    pub search: Option<String>,
}
