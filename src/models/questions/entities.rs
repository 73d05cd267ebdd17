use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 题目来源
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/question.ts")]
pub enum QuestionContentType {
    Manual,            // 教师手工录入
    GeneratedText,     // AI 生成
    ImageOcr,          // 图片识别
    OfficialPastPaper, // 真题
}

impl std::fmt::Display for QuestionContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QuestionContentType::Manual => write!(f, "manual"),
            QuestionContentType::GeneratedText => write!(f, "generated_text"),
            QuestionContentType::ImageOcr => write!(f, "image_ocr"),
            QuestionContentType::OfficialPastPaper => write!(f, "official_past_paper"),
        }
    }
}

impl std::str::FromStr for QuestionContentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "manual" => Ok(QuestionContentType::Manual),
            "generated_text" => Ok(QuestionContentType::GeneratedText),
            "image_ocr" => Ok(QuestionContentType::ImageOcr),
            "official_past_paper" => Ok(QuestionContentType::OfficialPastPaper),
            _ => Err(format!("Invalid question content type: {s}")),
        }
    }
}

// GCSE 难度分层
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/question.ts")]
pub enum Difficulty {
    Foundation,
    Higher,
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Difficulty::Foundation => write!(f, "foundation"),
            Difficulty::Higher => write!(f, "higher"),
        }
    }
}

impl std::str::FromStr for Difficulty {
    type Err = String;

    /// 大小写不敏感，模型返回 "Foundation"/"Higher" 也能解析
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "foundation" => Ok(Difficulty::Foundation),
            "higher" => Ok(Difficulty::Higher),
            _ => Err(format!("Invalid difficulty: {s}")),
        }
    }
}

// 参考答案
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/question.ts")]
pub struct AnswerKey {
    pub answer: String,
    #[serde(default)]
    pub explanation: String,
}

// 题库中的题目
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/question.ts")]
pub struct Question {
    pub id: i64,
    pub created_by: Option<i64>,
    pub content_type: QuestionContentType,
    // LaTeX 题干
    pub question_latex: String,
    pub image_url: Option<String>,
    pub topic: String,
    pub sub_topic: Option<String>,
    pub difficulty: Difficulty,
    pub marks: f64,
    pub answer_key: Option<AnswerKey>,
    pub is_verified: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_difficulty_parse_is_case_insensitive() {
        assert_eq!("Higher".parse::<Difficulty>(), Ok(Difficulty::Higher));
        assert_eq!(" foundation ".parse::<Difficulty>(), Ok(Difficulty::Foundation));
        assert!("expert".parse::<Difficulty>().is_err());
    }

    #[test]
    fn test_content_type_round_trip_names() {
        for ty in [
            QuestionContentType::Manual,
            QuestionContentType::GeneratedText,
            QuestionContentType::ImageOcr,
            QuestionContentType::OfficialPastPaper,
        ] {
            assert_eq!(ty.to_string().parse::<QuestionContentType>(), Ok(ty));
            assert_eq!(
                serde_json::to_string(&ty).unwrap(),
                format!("\"{ty}\"")
            );
        }
    }
}
