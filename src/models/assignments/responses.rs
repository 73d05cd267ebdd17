use super::entities::{Assignment, AssignmentQuestion};
use crate::models::common::PaginationInfo;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct AssignmentListResponse {
    pub pagination: PaginationInfo,
    pub items: Vec<Assignment>,
}

// 作业详情，题目按 position 排序
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct AssignmentDetailResponse {
    #[serde(flatten)]
    #[ts(flatten)]
    pub assignment: Assignment,
    pub questions: Vec<AssignmentQuestion>,
    pub total_marks: f64,
}
