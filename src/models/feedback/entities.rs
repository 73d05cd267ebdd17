use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::questions::entities::Question;

/// 掌握程度三档（红/黄/绿）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "../frontend/src/types/generated/feedback.ts")]
pub enum RagStatus {
    Green,
    Amber,
    Red,
}

impl std::fmt::Display for RagStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RagStatus::Green => write!(f, "green"),
            RagStatus::Amber => write!(f, "amber"),
            RagStatus::Red => write!(f, "red"),
        }
    }
}

/// 单个主题的得分汇总
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/feedback.ts")]
pub struct TopicSummary {
    pub topic: String,
    pub total_awarded: f64,
    pub total_available: f64,
    pub question_count: usize,
    pub percentage: u8,
    pub status: RagStatus,
}

/// 子主题得分汇总，没有子主题的题目归到同名子主题下
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/feedback.ts")]
pub struct SubTopicSummary {
    pub topic: String,
    pub sub_topic: String,
    pub total_awarded: f64,
    pub total_available: f64,
    pub question_ids: Vec<i64>,
    pub percentage: u8,
    pub status: RagStatus,
}

/// 一名学生在一份作业上的反馈
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/feedback.ts")]
pub struct StudentFeedbackSummary {
    pub student_id: i64,
    pub overall_score: f64,
    pub max_marks: f64,
    pub overall_percentage: u8,
    pub overall_status: RagStatus,
    pub topic_breakdown: Vec<TopicSummary>,
    pub sub_topic_breakdown: Vec<SubTopicSummary>,
    pub weak_topics: Vec<TopicSummary>,
    pub best_topic: Option<String>,
    pub weakest_topic: Option<String>,
}

/// 学生在一份作业上的总得分率
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/feedback.ts")]
pub struct AssignmentScore {
    pub assignment_id: i64,
    pub percentage: u8,
    pub status: RagStatus,
}

/// 学生跨作业的掌握情况
///
/// `topic_mastery` 把所有作业的记录合在一起按主题汇总，
/// `average_score` 是各作业得分率的平均值。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/feedback.ts")]
pub struct StudentMasterySummary {
    pub student_id: i64,
    pub assignments_graded: usize,
    pub average_score: u8,
    pub average_status: RagStatus,
    pub assignment_scores: Vec<AssignmentScore>,
    pub topic_mastery: StudentFeedbackSummary,
}

/// 全班在某个主题上的表现
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/feedback.ts")]
pub struct ClassTopicSummary {
    pub topic: String,
    pub average_percentage: u8,
    pub status: RagStatus,
    // 有该主题记录的学生数
    pub students_attempted: usize,
    // 该主题为红色的学生数
    pub students_struggling: usize,
}

/// 一份作业的全班汇总
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/feedback.ts")]
pub struct AssignmentFeedbackSummary {
    pub graded_students: usize,
    pub average_score: u8,
    pub average_status: RagStatus,
    pub topic_breakdown: Vec<ClassTopicSummary>,
    pub student_feedback: Vec<StudentFeedbackSummary>,
}

/// 复习包中的一道题及其针对的薄弱点
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/feedback.ts")]
pub struct RevisionItem {
    pub target_topic: String,
    pub target_sub_topic: String,
    pub target_status: RagStatus,
    pub question: Question,
}
