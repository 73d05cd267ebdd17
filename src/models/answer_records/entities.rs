use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 一道题的评分结果，反馈汇总的输入单元
///
/// `topic`/`sub_topic`/`marks_available` 在评分时从题目快照下来，
/// 题目之后被修改不影响已有的评分。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/answer-record.ts")]
pub struct AnswerRecord {
    pub student_id: i64,
    pub assignment_id: i64,
    pub question_id: i64,
    pub topic: String,
    pub sub_topic: Option<String>,
    pub marks_awarded: f64,
    pub marks_available: f64,
}

impl AnswerRecord {
    /// 空字符串视为没有子主题
    pub fn sub_topic_label(&self) -> Option<&str> {
        self.sub_topic
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

// 带评分信息的记录
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/answer-record.ts")]
pub struct GradedAnswer {
    pub id: i64,
    #[serde(flatten)]
    #[ts(flatten)]
    pub record: AnswerRecord,
    pub graded_by: i64,
    pub graded_at: chrono::DateTime<chrono::Utc>,
}
