use serde::Serialize;
use ts_rs::TS;

use super::entities::{RevisionAllocation, RevisionList, RevisionListQuestion, RevisionStatus};

// 创建结果
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/revision-list.ts")]
pub struct RevisionListCreatedResponse {
    pub revision_list: RevisionList,
    pub question_count: usize,
    pub students_allocated: usize,
}

// 学生清单列表中的一项
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/revision-list.ts")]
pub struct StudentRevisionListItem {
    pub revision_list: RevisionList,
    pub assignment_title: String,
    pub question_count: usize,
    pub allocation: RevisionAllocation,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/revision-list.ts")]
pub struct StudentRevisionListsResponse {
    pub items: Vec<StudentRevisionListItem>,
}

// 学生打开一份清单
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/revision-list.ts")]
pub struct RevisionListDetailResponse {
    pub revision_list: RevisionList,
    pub allocation: RevisionAllocation,
    pub questions: Vec<RevisionListQuestion>,
}

// 教师视角：每名学生的完成情况
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/revision-list.ts")]
pub struct StudentRevisionProgress {
    pub student_id: i64,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub status: RevisionStatus,
    pub completed: usize,
    pub total: usize,
    pub started_at: Option<chrono::DateTime<chrono::Utc>>,
    pub completed_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/revision-list.ts")]
pub struct AssignmentRevisionListResponse {
    pub revision_list: RevisionList,
    pub question_count: usize,
    pub students: Vec<StudentRevisionProgress>,
}
