use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::questions::entities::Question;

/// 学生在一份复习清单上的进度
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/revision-list.ts")]
pub enum RevisionStatus {
    Pending,
    InProgress,
    Completed,
}

impl RevisionStatus {
    /// 按已完成题数推导状态
    pub fn from_progress(completed: usize, total: usize) -> Self {
        if completed == 0 {
            RevisionStatus::Pending
        } else if completed >= total {
            RevisionStatus::Completed
        } else {
            RevisionStatus::InProgress
        }
    }
}

impl std::fmt::Display for RevisionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RevisionStatus::Pending => write!(f, "pending"),
            RevisionStatus::InProgress => write!(f, "in_progress"),
            RevisionStatus::Completed => write!(f, "completed"),
        }
    }
}

impl std::str::FromStr for RevisionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(RevisionStatus::Pending),
            "in_progress" => Ok(RevisionStatus::InProgress),
            "completed" => Ok(RevisionStatus::Completed),
            _ => Err(format!("Invalid revision status: {s}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/revision-list.ts")]
pub struct RevisionList {
    pub id: i64,
    pub assignment_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub created_by: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

// 清单中的一道题，附带当前学生是否完成
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/revision-list.ts")]
pub struct RevisionListQuestion {
    pub position: i32,
    pub question: Question,
    pub completed: bool,
}

/// 分配给某名学生的清单及其进度
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/revision-list.ts")]
pub struct RevisionAllocation {
    pub id: i64,
    pub revision_list_id: i64,
    pub student_id: i64,
    pub status: RevisionStatus,
    pub started_at: Option<chrono::DateTime<chrono::Utc>>,
    pub completed_at: Option<chrono::DateTime<chrono::Utc>>,
    pub completed_question_ids: Vec<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_from_progress() {
        assert_eq!(RevisionStatus::from_progress(0, 3), RevisionStatus::Pending);
        assert_eq!(RevisionStatus::from_progress(1, 3), RevisionStatus::InProgress);
        assert_eq!(RevisionStatus::from_progress(3, 3), RevisionStatus::Completed);
        // 空清单没有可完成的题
        assert_eq!(RevisionStatus::from_progress(0, 0), RevisionStatus::Pending);
    }

    #[test]
    fn test_status_round_trips_through_storage_text() {
        for status in [
            RevisionStatus::Pending,
            RevisionStatus::InProgress,
            RevisionStatus::Completed,
        ] {
            assert_eq!(status.to_string().parse::<RevisionStatus>(), Ok(status));
        }
        assert!("done".parse::<RevisionStatus>().is_err());
    }
}
