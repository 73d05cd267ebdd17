use serde::Deserialize;
use ts_rs::TS;

use crate::models::questions::entities::Difficulty;

// 题目类型
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/ai.ts")]
pub enum QuestionType {
    Fluency,        // 基础运算
    ProblemSolving, // 解决问题
    ReasoningProof, // 推理与证明
}

impl std::fmt::Display for QuestionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QuestionType::Fluency => write!(f, "Fluency"),
            QuestionType::ProblemSolving => write!(f, "Problem Solving"),
            QuestionType::ReasoningProof => write!(f, "Reasoning/Proof"),
        }
    }
}

// 生成题目请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/ai.ts")]
pub struct GenerateQuestionRequest {
    // 学段，例如 "GCSE Higher"、"KS3"
    pub level: String,
    pub topic: String,
    pub sub_topic: Option<String>,
    #[serde(default = "default_question_type")]
    pub question_type: QuestionType,
    #[serde(default = "default_marks")]
    pub marks: u32,
    #[serde(default = "default_calculator_allowed")]
    pub calculator_allowed: bool,
    // 可选的情境描述
    pub context: Option<String>,
    // 未指定时按学段推断
    pub difficulty: Option<Difficulty>,
}

fn default_question_type() -> QuestionType {
    QuestionType::Fluency
}

fn default_marks() -> u32 {
    3
}

fn default_calculator_allowed() -> bool {
    true
}

// 图片识别请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/ai.ts")]
pub struct OcrRequest {
    pub image_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_request_defaults() {
        let req: GenerateQuestionRequest =
            serde_json::from_str(r#"{"level":"GCSE Foundation","topic":"Algebra"}"#).unwrap();
        assert_eq!(req.question_type, QuestionType::Fluency);
        assert_eq!(req.marks, 3);
        assert!(req.calculator_allowed);
        assert!(req.sub_topic.is_none());
    }

    #[test]
    fn test_question_type_names() {
        let ty: QuestionType = serde_json::from_str("\"reasoning_proof\"").unwrap();
        assert_eq!(ty.to_string(), "Reasoning/Proof");
    }
}
