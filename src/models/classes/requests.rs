use crate::models::common::PaginationQuery;
use serde::Deserialize;
use ts_rs::TS;

// 班级查询参数（来自HTTP请求）
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct ClassQueryParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub search: Option<String>,
}

// 创建班级请求
//
// 教师创建时 teacher_id 可省略，默认为自己；管理员创建时必须指定教师。
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct CreateClassRequest {
    pub teacher_id: Option<i64>,
    pub name: String,
    pub description: Option<String>,
}

// 更新班级请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct UpdateClassRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    // 重新生成邀请码
    #[serde(default)]
    pub regenerate_invite_code: bool,
}

// 加入班级请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct JoinClassRequest {
    pub invite_code: String,
}

// 班级列表查询（用于存储层）
#[derive(Debug, Clone, Default)]
pub struct ClassListQuery {
    pub pagination: PaginationQuery,
    // 只看该教师的班级
    pub teacher_id: Option<i64>,
    // 只看该学生加入的班级
    pub student_id: Option<i64>,
    pub search: Option<String>,
}
