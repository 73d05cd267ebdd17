//! AI 出题与题目图片识别

pub mod client;
pub mod prompts;

pub use client::{ChatCompletion, ChatMessage, ChatRequest, LlmClient};
