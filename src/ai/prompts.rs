//! 出题与识别的提示词构造、模型回复解析

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

use crate::errors::{Result, TutorError};
use crate::models::ai::{
    requests::{GenerateQuestionRequest, QuestionType},
    responses::{OcrResult, QuestionDraft},
};
use crate::models::questions::entities::Difficulty;

/// 出题温度高一些，题目更多样
pub const GENERATE_TEMPERATURE: f32 = 0.8;
/// 识别要求准确
pub const OCR_TEMPERATURE: f32 = 0.2;
pub const MAX_TOKENS: u32 = 1500;

/// 识别不出主题时的默认值
pub const DEFAULT_OCR_TOPIC: &str = "General";

static CODE_FENCE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"```(?:json|JSON)?[ \t]*\n?").expect("Invalid code fence regex"));

const GENERATE_SYSTEM_PROMPT: &str = "You are an expert UK mathematics exam question writer with deep knowledge of:
- UK National Curriculum (KS3, GCSE Foundation, GCSE Higher)
- A-Level Mathematics specifications (Pure, Statistics, Mechanics)
- Exam board requirements (AQA, Edexcel, OCR)
- Assessment objectives and mark schemes

Your questions must be pedagogically sound, curriculum-aligned, written in clear exam language and use precise LaTeX notation.

Always respond with valid JSON only, no additional text or formatting.";

const OCR_SYSTEM_PROMPT: &str = "You are a specialized OCR engine for mathematics. Your task is to:
1. Extract ALL text and mathematical notation from the image
2. Convert equations and mathematical symbols to standard LaTeX format
3. Use $...$ for inline math and $$...$$ for display math
4. Preserve the structure and formatting of the original question
5. Suggest the most appropriate topic and difficulty level

Return ONLY valid JSON in this exact format:
{
  \"question_latex\": \"The extracted question with LaTeX notation\",
  \"suggested_topic\": \"The most relevant topic (e.g., Algebra, Geometry, Statistics, Number, Ratio, Probability)\",
  \"suggested_difficulty\": \"Foundation or Higher\"
}";

pub const OCR_USER_PROMPT: &str =
    "Extract the mathematical question from this image and convert it to LaTeX format. Return only JSON.";

pub fn generate_system_prompt() -> &'static str {
    GENERATE_SYSTEM_PROMPT
}

pub fn ocr_system_prompt() -> &'static str {
    OCR_SYSTEM_PROMPT
}

fn question_type_guidance(question_type: QuestionType) -> &'static str {
    match question_type {
        QuestionType::Fluency => {
            "- Focus on fundamental skills and standard procedures\n- Test direct application of knowledge\n- Include 1-2 straightforward steps"
        }
        QuestionType::ProblemSolving => {
            "- Require multi-step reasoning\n- Include real-world or unfamiliar contexts\n- Test ability to select and apply appropriate methods"
        }
        QuestionType::ReasoningProof => {
            "- Require mathematical reasoning or formal proof\n- Include \"show that\", \"prove\", or \"explain why\" language\n- Test understanding of mathematical structure"
        }
    }
}

fn calculator_guidance(calculator_allowed: bool) -> &'static str {
    if calculator_allowed {
        "- Decimal calculations are acceptable\n- Focus can be on mathematical reasoning rather than arithmetic"
    } else {
        "- Avoid calculations requiring a calculator\n- Use integer values or simple fractions\n- Students must show all working"
    }
}

fn mark_guidance(marks: u32) -> &'static str {
    match marks {
        0 | 1 => "- Single-step question\n- One method or one answer",
        2 => "- Two clear steps or 1 method + 1 answer mark",
        3 | 4 => "- Multi-step question with clear progression\n- Award marks for method and accuracy",
        _ => "- Extended response question\n- Include communication marks or proof elements",
    }
}

/// 未指定难度时按学段推断
pub fn resolve_difficulty(req: &GenerateQuestionRequest) -> Difficulty {
    req.difficulty.unwrap_or_else(|| {
        if req.level.to_ascii_lowercase().contains("higher") {
            Difficulty::Higher
        } else {
            Difficulty::Foundation
        }
    })
}

/// 出题的用户提示词
pub fn build_generate_prompt(req: &GenerateQuestionRequest) -> String {
    let sub_topic = req
        .sub_topic
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());

    let mut curriculum = format!("- Level: {}\n- Topic: {}", req.level.trim(), req.topic.trim());
    if let Some(sub_topic) = sub_topic {
        curriculum.push_str(&format!("\n- Sub-Topic: {sub_topic}"));
    }

    let calculator = if req.calculator_allowed {
        "Calculator allowed"
    } else {
        "Non-calculator (students must show working)"
    };
    let mut requirements = format!(
        "- Type: {}\n- Marks: {}\n- Calculator: {}",
        req.question_type, req.marks, calculator
    );
    if let Some(context) = req.context.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
        requirements.push_str(&format!("\n- Context: {context}"));
    }

    format!(
        "Create a unique {level} mathematics question with the following specifications:

CURRICULUM CONTEXT:
{curriculum}

QUESTION REQUIREMENTS:
{requirements}

QUESTION TYPE GUIDELINES:
{type_guidance}

CALCULATOR GUIDANCE:
{calculator_guidance}

MARK ALLOCATION:
{mark_guidance}

LATEX REQUIREMENTS:
- Use proper LaTeX notation: \\frac{{}}{{}}, \\sqrt{{}}, \\times, \\div
- Inline math: $...$, display math: $$...$$

OUTPUT FORMAT (JSON only):
{{
  \"question_latex\": \"The complete question text with LaTeX notation\",
  \"answer\": \"The final answer (concise)\",
  \"explanation\": \"Full step-by-step solution with working and mark scheme breakdown\",
  \"marks\": {marks}
}}

Generate ONE high-quality question now. Return ONLY the JSON object.",
        level = req.level.trim(),
        type_guidance = question_type_guidance(req.question_type),
        calculator_guidance = calculator_guidance(req.calculator_allowed),
        mark_guidance = mark_guidance(req.marks),
        marks = req.marks,
    )
}

/// 去掉模型喜欢包在外面的 markdown 代码块
pub fn strip_code_fences(content: &str) -> String {
    CODE_FENCE_RE.replace_all(content, "").trim().to_string()
}

#[derive(Debug, Deserialize)]
struct RawGenerated {
    #[serde(default)]
    question_latex: String,
    #[serde(default)]
    answer: String,
    #[serde(default)]
    explanation: String,
    marks: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawOcr {
    #[serde(default)]
    question_latex: String,
    suggested_topic: Option<String>,
    suggested_difficulty: Option<String>,
}

/// 解析出题回复
pub fn parse_generated(
    content: &str,
    req: &GenerateQuestionRequest,
    model: &str,
) -> Result<QuestionDraft> {
    let cleaned = strip_code_fences(content);
    let raw: RawGenerated = serde_json::from_str(&cleaned)
        .map_err(|e| TutorError::llm_response(format!("Invalid JSON from model: {e}")))?;

    if raw.question_latex.trim().is_empty() || raw.answer.trim().is_empty() {
        return Err(TutorError::llm_response(
            "Model reply is missing question_latex or answer",
        ));
    }

    // 模型给的分值不可靠时用请求中的分值
    let marks = raw
        .marks
        .filter(|m| m.is_finite() && *m >= 1.0 && *m <= 100.0)
        .map(|m| m.round() as u32)
        .unwrap_or(req.marks);

    Ok(QuestionDraft {
        question_latex: raw.question_latex.trim().to_string(),
        answer: raw.answer.trim().to_string(),
        explanation: raw.explanation.trim().to_string(),
        marks,
        topic: req.topic.trim().to_string(),
        sub_topic: req
            .sub_topic
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string),
        difficulty: resolve_difficulty(req),
        model: model.to_string(),
    })
}

/// 解析识别回复，缺失的建议字段用默认值补齐
pub fn parse_ocr(content: &str, model: &str) -> Result<OcrResult> {
    let cleaned = strip_code_fences(content);
    let raw: RawOcr = serde_json::from_str(&cleaned)
        .map_err(|e| TutorError::llm_response(format!("Invalid JSON from model: {e}")))?;

    if raw.question_latex.trim().is_empty() {
        return Err(TutorError::llm_response("Model reply is missing question_latex"));
    }

    let suggested_topic = raw
        .suggested_topic
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| DEFAULT_OCR_TOPIC.to_string());
    let suggested_difficulty = raw
        .suggested_difficulty
        .and_then(|d| d.parse::<Difficulty>().ok())
        .unwrap_or(Difficulty::Foundation);

    Ok(OcrResult {
        question_latex: raw.question_latex.trim().to_string(),
        suggested_topic,
        suggested_difficulty,
        model: model.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> GenerateQuestionRequest {
        GenerateQuestionRequest {
            level: "GCSE Higher".to_string(),
            topic: "Algebra".to_string(),
            sub_topic: Some("Quadratics".to_string()),
            question_type: QuestionType::ProblemSolving,
            marks: 4,
            calculator_allowed: false,
            context: Some("A garden plot".to_string()),
            difficulty: None,
        }
    }

    #[test]
    fn test_prompt_mentions_requirements() {
        let prompt = build_generate_prompt(&request());
        assert!(prompt.contains("- Level: GCSE Higher"));
        assert!(prompt.contains("- Sub-Topic: Quadratics"));
        assert!(prompt.contains("- Type: Problem Solving"));
        assert!(prompt.contains("Non-calculator"));
        assert!(prompt.contains("- Context: A garden plot"));
        assert!(prompt.contains("\"marks\": 4"));
        assert!(prompt.contains("\\frac{}{}"));
    }

    #[test]
    fn test_strip_code_fences() {
        let raw = "```json\n{\"a\": 1}\n```";
        assert_eq!(strip_code_fences(raw), "{\"a\": 1}");
        assert_eq!(strip_code_fences("  {\"a\": 1} "), "{\"a\": 1}");
    }

    #[test]
    fn test_parse_generated_reply() {
        let reply = "```json\n{\"question_latex\": \"Solve $x^2 - 5x + 6 = 0$\", \"answer\": \"x = 2 or x = 3\", \"explanation\": \"Factorise\", \"marks\": 3}\n```";
        let draft = parse_generated(reply, &request(), "openai/gpt-4o-mini").unwrap();
        assert_eq!(draft.marks, 3);
        assert_eq!(draft.topic, "Algebra");
        assert_eq!(draft.sub_topic.as_deref(), Some("Quadratics"));
        assert_eq!(draft.difficulty, Difficulty::Higher);
        assert_eq!(draft.model, "openai/gpt-4o-mini");
    }

    #[test]
    fn test_parse_generated_rejects_incomplete_reply() {
        let err = parse_generated("{\"question_latex\": \"x\"}", &request(), "m").unwrap_err();
        assert!(matches!(err, TutorError::LlmResponse(_)));
        let err = parse_generated("not json", &request(), "m").unwrap_err();
        assert!(matches!(err, TutorError::LlmResponse(_)));
    }

    #[test]
    fn test_parse_generated_falls_back_to_requested_marks() {
        let reply = "{\"question_latex\": \"q\", \"answer\": \"a\", \"marks\": 0}";
        let draft = parse_generated(reply, &request(), "m").unwrap();
        assert_eq!(draft.marks, 4);
        assert_eq!(draft.explanation, "");
    }

    #[test]
    fn test_parse_ocr_defaults() {
        let result = parse_ocr("{\"question_latex\": \"Find $x$\"}", "vision").unwrap();
        assert_eq!(result.suggested_topic, DEFAULT_OCR_TOPIC);
        assert_eq!(result.suggested_difficulty, Difficulty::Foundation);

        let result = parse_ocr(
            "```\n{\"question_latex\": \"q\", \"suggested_topic\": \"Geometry\", \"suggested_difficulty\": \"Higher\"}\n```",
            "vision",
        )
        .unwrap();
        assert_eq!(result.suggested_topic, "Geometry");
        assert_eq!(result.suggested_difficulty, Difficulty::Higher);
    }

    #[test]
    fn test_resolve_difficulty() {
        let mut req = request();
        assert_eq!(resolve_difficulty(&req), Difficulty::Higher);
        req.level = "KS3".to_string();
        assert_eq!(resolve_difficulty(&req), Difficulty::Foundation);
        req.difficulty = Some(Difficulty::Higher);
        assert_eq!(resolve_difficulty(&req), Difficulty::Higher);
    }
}
