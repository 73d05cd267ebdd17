use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct Class {
    // 班级ID
    pub id: i64,
    // 任课教师的资料ID
    pub teacher_id: i64,
    pub name: String,
    pub description: Option<String>,
    // 学生加入用的邀请码
    pub invite_code: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

// 当前用户在班级中的身份
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub enum ClassRole {
    Owner,   // 班级所属教师
    Student, // 已加入的学生
}

impl ClassRole {
    pub fn owner_roles() -> &'static [&'static ClassRole] {
        &[&Self::Owner]
    }
    pub fn all_roles() -> &'static [&'static ClassRole] {
        &[&Self::Owner, &Self::Student]
    }
}

impl std::fmt::Display for ClassRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClassRole::Owner => write!(f, "owner"),
            ClassRole::Student => write!(f, "student"),
        }
    }
}
