//! 题库实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "questions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub created_by: Option<i64>,
    pub content_type: String,
    #[sea_orm(column_type = "Text")]
    pub question_latex: String,
    pub image_url: Option<String>,
    pub topic: String,
    pub sub_topic: Option<String>,
    pub difficulty: String,
    pub marks: f64,
    // JSON: {"answer": "...", "explanation": "..."}
    #[sea_orm(column_type = "Text", nullable)]
    pub answer_key: Option<String>,
    pub is_verified: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::assignment_questions::Entity")]
    AssignmentQuestions,
}

impl Related<super::assignment_questions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AssignmentQuestions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_question(self) -> crate::models::questions::entities::Question {
        use crate::models::questions::entities::{
            AnswerKey, Difficulty, Question, QuestionContentType,
        };

        // 答案格式损坏时不影响题目本身的读取
        let answer_key = self.answer_key.as_deref().and_then(|raw| {
            serde_json::from_str::<AnswerKey>(raw)
                .map_err(|e| tracing::warn!("题目 {} 的答案解析失败: {}", self.id, e))
                .ok()
        });

        Question {
            id: self.id,
            created_by: self.created_by,
            content_type: self
                .content_type
                .parse::<QuestionContentType>()
                .unwrap_or(QuestionContentType::Manual),
            question_latex: self.question_latex,
            image_url: self.image_url,
            topic: self.topic,
            sub_topic: self.sub_topic,
            difficulty: self
                .difficulty
                .parse::<Difficulty>()
                .unwrap_or(Difficulty::Foundation),
            marks: self.marks,
            answer_key,
            is_verified: self.is_verified,
            created_at: super::timestamp_to_datetime(self.created_at),
            updated_at: super::timestamp_to_datetime(self.updated_at),
        }
    }
}
