use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 班级成员（学生）
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class-member.ts")]
pub struct ClassMember {
    pub id: i64,
    pub class_id: i64,
    pub student_id: i64,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub joined_at: chrono::DateTime<chrono::Utc>,
}
