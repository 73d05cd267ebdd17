use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::questions::entities::Difficulty;

// 生成的题目草稿，不入库，由教师确认后通过题库接口保存
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/ai.ts")]
pub struct QuestionDraft {
    pub question_latex: String,
    pub answer: String,
    pub explanation: String,
    pub marks: u32,
    pub topic: String,
    pub sub_topic: Option<String>,
    pub difficulty: Difficulty,
    // 实际使用的模型
    pub model: String,
}

// 图片识别结果
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/ai.ts")]
pub struct OcrResult {
    pub question_latex: String,
    pub suggested_topic: String,
    pub suggested_difficulty: Difficulty,
    pub model: String,
}
