use serde::Deserialize;
use ts_rs::TS;

use super::entities::{AnswerKey, Difficulty, QuestionContentType};
use crate::models::common::PaginationQuery;

// 创建题目请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/question.ts")]
pub struct CreateQuestionRequest {
    #[serde(default = "default_content_type")]
    pub content_type: QuestionContentType,
    pub question_latex: String,
    pub image_url: Option<String>,
    pub topic: String,
    pub sub_topic: Option<String>,
    #[serde(default = "default_difficulty")]
    pub difficulty: Difficulty,
    pub marks: f64,
    pub answer_key: Option<AnswerKey>,
    #[serde(default)]
    pub is_verified: bool,
    // 由服务层填入
    #[serde(skip)]
    #[ts(skip)]
    pub created_by: Option<i64>,
}

fn default_content_type() -> QuestionContentType {
    QuestionContentType::Manual
}

fn default_difficulty() -> Difficulty {
    Difficulty::Foundation
}

// 更新题目请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/question.ts")]
pub struct UpdateQuestionRequest {
    pub question_latex: Option<String>,
    pub image_url: Option<String>,
    pub topic: Option<String>,
    pub sub_topic: Option<String>,
    pub difficulty: Option<Difficulty>,
    pub marks: Option<f64>,
    pub answer_key: Option<AnswerKey>,
    pub is_verified: Option<bool>,
}

// 题库列表查询参数
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/question.ts")]
pub struct QuestionListQuery {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub topic: Option<String>,
    pub sub_topic: Option<String>,
    pub difficulty: Option<Difficulty>,
    pub content_type: Option<QuestionContentType>,
    pub search: Option<String>,
}
