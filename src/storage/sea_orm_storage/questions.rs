//! 题库存储操作

use super::SeaOrmStorage;
use crate::entity::questions::{ActiveModel, Column, Entity as Questions};
use crate::errors::{Result, TutorError};
use crate::models::{
    PaginationInfo,
    questions::{
        entities::{AnswerKey, Question},
        requests::{CreateQuestionRequest, QuestionListQuery, UpdateQuestionRequest},
        responses::QuestionListResponse,
    },
};
use crate::utils::escape_like_pattern;
use crate::utils::validate::normalize_optional;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    Set,
};

fn encode_answer_key(answer_key: Option<&AnswerKey>) -> Result<Option<String>> {
    answer_key
        .map(serde_json::to_string)
        .transpose()
        .map_err(|e| TutorError::serialization(format!("答案序列化失败: {e}")))
}

impl SeaOrmStorage {
    /// 创建题目
    pub async fn create_question_impl(&self, req: CreateQuestionRequest) -> Result<Question> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            created_by: Set(req.created_by),
            content_type: Set(req.content_type.to_string()),
            question_latex: Set(req.question_latex),
            image_url: Set(normalize_optional(req.image_url)),
            topic: Set(req.topic.trim().to_string()),
            sub_topic: Set(normalize_optional(req.sub_topic)),
            difficulty: Set(req.difficulty.to_string()),
            marks: Set(req.marks),
            answer_key: Set(encode_answer_key(req.answer_key.as_ref())?),
            is_verified: Set(req.is_verified),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| TutorError::database_operation(format!("创建题目失败: {e}")))?;

        Ok(result.into_question())
    }

    /// 通过 ID 获取题目
    pub async fn get_question_by_id_impl(&self, question_id: i64) -> Result<Option<Question>> {
        let result = Questions::find_by_id(question_id)
            .one(&self.db)
            .await
            .map_err(|e| TutorError::database_operation(format!("查询题目失败: {e}")))?;

        Ok(result.map(|m| m.into_question()))
    }

    /// 批量获取题目
    pub async fn get_questions_by_ids_impl(&self, question_ids: &[i64]) -> Result<Vec<Question>> {
        if question_ids.is_empty() {
            return Ok(Vec::new());
        }

        let result = Questions::find()
            .filter(Column::Id.is_in(question_ids.iter().copied()))
            .all(&self.db)
            .await
            .map_err(|e| TutorError::database_operation(format!("批量查询题目失败: {e}")))?;

        Ok(result.into_iter().map(|m| m.into_question()).collect())
    }

    /// 分页列出题目
    pub async fn list_questions_with_pagination_impl(
        &self,
        query: QuestionListQuery,
    ) -> Result<QuestionListResponse> {
        let (page, size) = query.pagination.clamped();

        let mut select = Questions::find();

        if let Some(ref topic) = query.topic
            && !topic.trim().is_empty()
        {
            select = select.filter(Column::Topic.eq(topic.trim()));
        }

        if let Some(ref sub_topic) = query.sub_topic
            && !sub_topic.trim().is_empty()
        {
            select = select.filter(Column::SubTopic.eq(sub_topic.trim()));
        }

        if let Some(difficulty) = query.difficulty {
            select = select.filter(Column::Difficulty.eq(difficulty.to_string()));
        }

        if let Some(content_type) = query.content_type {
            select = select.filter(Column::ContentType.eq(content_type.to_string()));
        }

        // 搜索题干或主题
        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let escaped = escape_like_pattern(search.trim());
            select = select.filter(
                Condition::any()
                    .add(Column::QuestionLatex.contains(&escaped))
                    .add(Column::Topic.contains(&escaped))
                    .add(Column::SubTopic.contains(&escaped)),
            );
        }

        select = select
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id);

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| TutorError::database_operation(format!("查询题目总数失败: {e}")))?;

        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| TutorError::database_operation(format!("查询题目页数失败: {e}")))?;

        let questions = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| TutorError::database_operation(format!("查询题目列表失败: {e}")))?;

        Ok(QuestionListResponse {
            items: questions.into_iter().map(|m| m.into_question()).collect(),
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    /// 列出若干主题下的全部题目，ID 升序
    pub async fn list_questions_by_topics_impl(&self, topics: &[String]) -> Result<Vec<Question>> {
        if topics.is_empty() {
            return Ok(Vec::new());
        }

        let result = Questions::find()
            .filter(Column::Topic.is_in(topics.iter().map(|t| t.trim().to_string())))
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| TutorError::database_operation(format!("按主题查询题目失败: {e}")))?;

        Ok(result.into_iter().map(|m| m.into_question()).collect())
    }

    /// 更新题目
    pub async fn update_question_impl(
        &self,
        question_id: i64,
        update: UpdateQuestionRequest,
    ) -> Result<Option<Question>> {
        if self.get_question_by_id_impl(question_id).await?.is_none() {
            return Ok(None);
        }

        let now = chrono::Utc::now().timestamp();
        let mut model = ActiveModel {
            id: Set(question_id),
            updated_at: Set(now),
            ..Default::default()
        };

        if let Some(question_latex) = update.question_latex {
            model.question_latex = Set(question_latex);
        }
        if let Some(image_url) = update.image_url {
            model.image_url = Set(normalize_optional(Some(image_url)));
        }
        if let Some(topic) = update.topic {
            model.topic = Set(topic.trim().to_string());
        }
        if let Some(sub_topic) = update.sub_topic {
            model.sub_topic = Set(normalize_optional(Some(sub_topic)));
        }
        if let Some(difficulty) = update.difficulty {
            model.difficulty = Set(difficulty.to_string());
        }
        if let Some(marks) = update.marks {
            model.marks = Set(marks);
        }
        if let Some(ref answer_key) = update.answer_key {
            model.answer_key = Set(encode_answer_key(Some(answer_key))?);
        }
        if let Some(is_verified) = update.is_verified {
            model.is_verified = Set(is_verified);
        }

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| TutorError::database_operation(format!("更新题目失败: {e}")))?;

        Ok(Some(result.into_question()))
    }

    /// 删除题目
    ///
    /// 已保存的评分记录带有主题与分值快照，不受影响。
    pub async fn delete_question_impl(&self, question_id: i64) -> Result<bool> {
        let result = Questions::delete_by_id(question_id)
            .exec(&self.db)
            .await
            .map_err(|e| TutorError::database_operation(format!("删除题目失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::memory_storage;
    use crate::models::questions::{
        entities::{AnswerKey, Difficulty, QuestionContentType},
        requests::{CreateQuestionRequest, QuestionListQuery, UpdateQuestionRequest},
    };

    fn new_question(topic: &str, sub_topic: Option<&str>, marks: f64) -> CreateQuestionRequest {
        CreateQuestionRequest {
            content_type: QuestionContentType::Manual,
            question_latex: format!("Solve a {topic} problem: $x + 2 = 5$"),
            image_url: None,
            topic: topic.to_string(),
            sub_topic: sub_topic.map(str::to_string),
            difficulty: Difficulty::Foundation,
            marks,
            answer_key: Some(AnswerKey {
                answer: "x = 3".to_string(),
                explanation: "Subtract 2 from both sides".to_string(),
            }),
            is_verified: false,
            created_by: None,
        }
    }

    #[tokio::test]
    async fn test_create_question_keeps_answer_key() {
        let storage = memory_storage().await;
        let created = storage
            .create_question_impl(new_question("Algebra", Some(""), 3.0))
            .await
            .unwrap();
        assert_eq!(created.sub_topic, None);
        assert_eq!(
            created.answer_key.as_ref().map(|k| k.answer.as_str()),
            Some("x = 3")
        );

        let fetched = storage
            .get_question_by_id_impl(created.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(fetched.answer_key, created.answer_key);
        assert_eq!(fetched.marks, 3.0);
    }

    #[tokio::test]
    async fn test_filter_and_topic_lookup() {
        let storage = memory_storage().await;
        storage
            .create_question_impl(new_question("Algebra", Some("Linear equations"), 2.0))
            .await
            .unwrap();
        storage
            .create_question_impl(new_question("Algebra", Some("Quadratics"), 4.0))
            .await
            .unwrap();
        storage
            .create_question_impl(new_question("Geometry", Some("Angles"), 3.0))
            .await
            .unwrap();

        let algebra = storage
            .list_questions_with_pagination_impl(QuestionListQuery {
                topic: Some("Algebra".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(algebra.pagination.total, 2);

        let quad = storage
            .list_questions_with_pagination_impl(QuestionListQuery {
                search: Some("Quadratic".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(quad.items.len(), 1);

        let by_topics = storage
            .list_questions_by_topics_impl(&["Geometry".to_string(), "Number".to_string()])
            .await
            .unwrap();
        assert_eq!(by_topics.len(), 1);
        assert_eq!(by_topics[0].topic, "Geometry");
    }

    #[tokio::test]
    async fn test_update_and_delete_question() {
        let storage = memory_storage().await;
        let created = storage
            .create_question_impl(new_question("Number", None, 1.0))
            .await
            .unwrap();

        let updated = storage
            .update_question_impl(
                created.id,
                UpdateQuestionRequest {
                    question_latex: None,
                    image_url: None,
                    topic: None,
                    sub_topic: Some("Fractions".to_string()),
                    difficulty: Some(Difficulty::Higher),
                    marks: Some(5.0),
                    answer_key: None,
                    is_verified: Some(true),
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.sub_topic.as_deref(), Some("Fractions"));
        assert_eq!(updated.difficulty, Difficulty::Higher);
        assert!(updated.is_verified);
        assert!(updated.answer_key.is_some());

        assert!(storage.delete_question_impl(created.id).await.unwrap());
        assert!(
            storage
                .get_question_by_id_impl(created.id)
                .await
                .unwrap()
                .is_none()
        );
    }
}
