use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/revision-list.ts")]
pub struct CreateRevisionListBody {
    pub title: String,
    pub description: Option<String>,
    // 按顺序排列的题库题目
    pub question_ids: Vec<i64>,
}

// 存储层创建清单，分配对象为班级全部学生
#[derive(Debug, Clone)]
pub struct CreateRevisionListRequest {
    pub assignment_id: i64,
    pub class_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub question_ids: Vec<i64>,
    pub created_by: i64,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/revision-list.ts")]
pub struct UpdateRevisionProgressRequest {
    pub question_id: i64,
    pub completed: bool,
}
