//! 作业存储操作

use super::SeaOrmStorage;
use crate::entity::assignment_questions::{
    ActiveModel as LinkActiveModel, Column as LinkColumn, Entity as AssignmentQuestions,
};
use crate::entity::assignments::{ActiveModel, Column, Entity as Assignments};
use crate::entity::questions::Entity as Questions;
use crate::errors::{Result, TutorError};
use crate::models::{
    PaginationInfo,
    assignments::{
        entities::{Assignment, AssignmentQuestion, AssignmentStatus},
        requests::{AssignmentListQuery, CreateAssignmentRequest, UpdateAssignmentRequest},
        responses::AssignmentListResponse,
    },
};
use crate::utils::escape_like_pattern;
use crate::utils::validate::normalize_optional;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};

/// 用给定顺序替换作业题目，position 从 1 开始
async fn replace_question_links<C: ConnectionTrait>(
    conn: &C,
    assignment_id: i64,
    question_ids: &[i64],
) -> Result<()> {
    AssignmentQuestions::delete_many()
        .filter(LinkColumn::AssignmentId.eq(assignment_id))
        .exec(conn)
        .await
        .map_err(|e| TutorError::database_operation(format!("清除作业题目失败: {e}")))?;

    if question_ids.is_empty() {
        return Ok(());
    }

    let links = question_ids
        .iter()
        .enumerate()
        .map(|(index, question_id)| LinkActiveModel {
            assignment_id: Set(assignment_id),
            question_id: Set(*question_id),
            position: Set(index as i32 + 1),
            ..Default::default()
        });

    AssignmentQuestions::insert_many(links)
        .exec(conn)
        .await
        .map_err(|e| TutorError::database_operation(format!("关联作业题目失败: {e}")))?;

    Ok(())
}

impl SeaOrmStorage {
    /// 创建作业，题目关联在同一事务中写入
    pub async fn create_assignment_impl(&self, req: CreateAssignmentRequest) -> Result<Assignment> {
        let now = chrono::Utc::now().timestamp();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| TutorError::database_operation(format!("开启事务失败: {e}")))?;

        let model = ActiveModel {
            class_id: Set(req.class_id),
            created_by: Set(req.created_by),
            title: Set(req.title.trim().to_string()),
            description: Set(normalize_optional(req.description)),
            due_date: Set(req.due_date.map(|d| d.timestamp())),
            status: Set(AssignmentStatus::Draft.to_string()),
            feedback_released: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&txn)
            .await
            .map_err(|e| TutorError::database_operation(format!("创建作业失败: {e}")))?;

        replace_question_links(&txn, result.id, &req.question_ids).await?;

        txn.commit()
            .await
            .map_err(|e| TutorError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(result.into_assignment())
    }

    /// 通过 ID 获取作业
    pub async fn get_assignment_by_id_impl(&self, assignment_id: i64) -> Result<Option<Assignment>> {
        let result = Assignments::find_by_id(assignment_id)
            .one(&self.db)
            .await
            .map_err(|e| TutorError::database_operation(format!("查询作业失败: {e}")))?;

        Ok(result.map(|m| m.into_assignment()))
    }

    /// 分页列出班级作业
    pub async fn list_assignments_with_pagination_impl(
        &self,
        query: AssignmentListQuery,
    ) -> Result<AssignmentListResponse> {
        let (page, size) = query.pagination.clamped();

        let mut select = Assignments::find().filter(Column::ClassId.eq(query.class_id));

        // 学生只能看到已发布的作业
        if query.published_only {
            select = select.filter(Column::Status.eq(AssignmentStatus::Published.to_string()));
        }

        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let escaped = escape_like_pattern(search.trim());
            select = select.filter(Column::Title.contains(&escaped));
        }

        select = select
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id);

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| TutorError::database_operation(format!("查询作业总数失败: {e}")))?;

        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| TutorError::database_operation(format!("查询作业页数失败: {e}")))?;

        let assignments = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| TutorError::database_operation(format!("查询作业列表失败: {e}")))?;

        Ok(AssignmentListResponse {
            items: assignments
                .into_iter()
                .map(|m| m.into_assignment())
                .collect(),
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    /// 更新作业
    pub async fn update_assignment_impl(
        &self,
        assignment_id: i64,
        update: UpdateAssignmentRequest,
    ) -> Result<Option<Assignment>> {
        if self.get_assignment_by_id_impl(assignment_id).await?.is_none() {
            return Ok(None);
        }

        let now = chrono::Utc::now().timestamp();
        let mut model = ActiveModel {
            id: Set(assignment_id),
            updated_at: Set(now),
            ..Default::default()
        };

        if let Some(title) = update.title {
            model.title = Set(title.trim().to_string());
        }
        if let Some(description) = update.description {
            model.description = Set(normalize_optional(Some(description)));
        }
        if let Some(due_date) = update.due_date {
            model.due_date = Set(Some(due_date.timestamp()));
        }
        if let Some(status) = update.status {
            model.status = Set(status.to_string());
        }

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| TutorError::database_operation(format!("更新作业失败: {e}")))?;

        Ok(Some(result.into_assignment()))
    }

    /// 删除作业，题目关联与评分记录级联删除
    pub async fn delete_assignment_impl(&self, assignment_id: i64) -> Result<bool> {
        let result = Assignments::delete_by_id(assignment_id)
            .exec(&self.db)
            .await
            .map_err(|e| TutorError::database_operation(format!("删除作业失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 整体替换作业题目
    pub async fn set_assignment_questions_impl(
        &self,
        assignment_id: i64,
        question_ids: &[i64],
    ) -> Result<Vec<AssignmentQuestion>> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| TutorError::database_operation(format!("开启事务失败: {e}")))?;

        replace_question_links(&txn, assignment_id, question_ids).await?;

        Assignments::update(ActiveModel {
            id: Set(assignment_id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        })
        .exec(&txn)
        .await
        .map_err(|e| TutorError::database_operation(format!("更新作业失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| TutorError::database_operation(format!("提交事务失败: {e}")))?;

        self.list_assignment_questions_impl(assignment_id).await
    }

    /// 作业题目，按 position 排序
    pub async fn list_assignment_questions_impl(
        &self,
        assignment_id: i64,
    ) -> Result<Vec<AssignmentQuestion>> {
        let rows = AssignmentQuestions::find()
            .filter(LinkColumn::AssignmentId.eq(assignment_id))
            .order_by_asc(LinkColumn::Position)
            .find_also_related(Questions)
            .all(&self.db)
            .await
            .map_err(|e| TutorError::database_operation(format!("查询作业题目失败: {e}")))?;

        Ok(rows
            .into_iter()
            .filter_map(|(link, question)| {
                question.map(|q| AssignmentQuestion {
                    position: link.position,
                    question: q.into_question(),
                })
            })
            .collect())
    }

    /// 设置反馈是否对学生可见
    pub async fn set_feedback_released_impl(
        &self,
        assignment_id: i64,
        released: bool,
    ) -> Result<Option<Assignment>> {
        if self.get_assignment_by_id_impl(assignment_id).await?.is_none() {
            return Ok(None);
        }

        let model = ActiveModel {
            id: Set(assignment_id),
            feedback_released: Set(released),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| TutorError::database_operation(format!("更新反馈发布状态失败: {e}")))?;

        Ok(Some(result.into_assignment()))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::super::test_support::memory_storage;
    use super::super::SeaOrmStorage;
    use crate::models::{
        assignments::{
            entities::AssignmentStatus,
            requests::{AssignmentListQuery, CreateAssignmentRequest, UpdateAssignmentRequest},
        },
        classes::requests::CreateClassRequest,
        profiles::{entities::ProfileRole, requests::CreateProfileRequest},
        questions::{
            entities::{Difficulty, QuestionContentType},
            requests::CreateQuestionRequest,
        },
    };

    /// 建一位教师、一个班级和若干道题
    pub(crate) async fn seed(storage: &SeaOrmStorage, topics: &[(&str, f64)]) -> (i64, i64, Vec<i64>) {
        let teacher = storage
            .create_profile_impl(CreateProfileRequest {
                auth_uid: "teacher-uid".to_string(),
                email: "teacher@example.com".to_string(),
                full_name: Some("Ms Khan".to_string()),
                role: ProfileRole::Teacher,
            })
            .await
            .unwrap()
            .id;
        let class_id = storage
            .create_class_impl(CreateClassRequest {
                teacher_id: Some(teacher),
                name: "11X".to_string(),
                description: None,
            })
            .await
            .unwrap()
            .id;

        let mut question_ids = Vec::new();
        for (topic, marks) in topics {
            let question = storage
                .create_question_impl(CreateQuestionRequest {
                    content_type: QuestionContentType::Manual,
                    question_latex: format!("{topic} question"),
                    image_url: None,
                    topic: topic.to_string(),
                    sub_topic: None,
                    difficulty: Difficulty::Foundation,
                    marks: *marks,
                    answer_key: None,
                    is_verified: true,
                    created_by: Some(teacher),
                })
                .await
                .unwrap();
            question_ids.push(question.id);
        }

        (teacher, class_id, question_ids)
    }

    fn new_assignment(class_id: i64, teacher: i64, question_ids: Vec<i64>) -> CreateAssignmentRequest {
        CreateAssignmentRequest {
            class_id,
            title: "Mock paper 1".to_string(),
            description: None,
            due_date: None,
            question_ids,
            created_by: teacher,
        }
    }

    #[tokio::test]
    async fn test_create_assignment_with_ordered_questions() {
        let storage = memory_storage().await;
        let (teacher, class_id, ids) =
            seed(&storage, &[("Algebra", 2.0), ("Geometry", 3.0), ("Number", 1.0)]).await;

        let ordered = vec![ids[2], ids[0], ids[1]];
        let assignment = storage
            .create_assignment_impl(new_assignment(class_id, teacher, ordered.clone()))
            .await
            .unwrap();
        assert_eq!(assignment.status, AssignmentStatus::Draft);
        assert!(!assignment.feedback_released);

        let questions = storage
            .list_assignment_questions_impl(assignment.id)
            .await
            .unwrap();
        let got: Vec<i64> = questions.iter().map(|q| q.question.id).collect();
        assert_eq!(got, ordered);
        assert_eq!(questions[0].position, 1);
        assert_eq!(questions[2].position, 3);
    }

    #[tokio::test]
    async fn test_replace_questions() {
        let storage = memory_storage().await;
        let (teacher, class_id, ids) = seed(&storage, &[("Algebra", 2.0), ("Geometry", 3.0)]).await;
        let assignment = storage
            .create_assignment_impl(new_assignment(class_id, teacher, ids.clone()))
            .await
            .unwrap();

        let replaced = storage
            .set_assignment_questions_impl(assignment.id, &[ids[1]])
            .await
            .unwrap();
        assert_eq!(replaced.len(), 1);
        assert_eq!(replaced[0].question.id, ids[1]);

        let cleared = storage
            .set_assignment_questions_impl(assignment.id, &[])
            .await
            .unwrap();
        assert!(cleared.is_empty());
    }

    #[tokio::test]
    async fn test_publish_filter_and_release() {
        let storage = memory_storage().await;
        let (teacher, class_id, ids) = seed(&storage, &[("Algebra", 2.0)]).await;
        let draft = storage
            .create_assignment_impl(new_assignment(class_id, teacher, ids.clone()))
            .await
            .unwrap();
        let published = storage
            .create_assignment_impl(new_assignment(class_id, teacher, ids))
            .await
            .unwrap();
        storage
            .update_assignment_impl(
                published.id,
                UpdateAssignmentRequest {
                    title: None,
                    description: None,
                    due_date: None,
                    status: Some(AssignmentStatus::Published),
                },
            )
            .await
            .unwrap();

        let visible = storage
            .list_assignments_with_pagination_impl(AssignmentListQuery {
                pagination: Default::default(),
                class_id,
                published_only: true,
                search: None,
            })
            .await
            .unwrap();
        assert_eq!(visible.items.len(), 1);
        assert_eq!(visible.items[0].id, published.id);

        let all = storage
            .list_assignments_with_pagination_impl(AssignmentListQuery {
                pagination: Default::default(),
                class_id,
                published_only: false,
                search: None,
            })
            .await
            .unwrap();
        assert_eq!(all.pagination.total, 2);

        let released = storage
            .set_feedback_released_impl(draft.id, true)
            .await
            .unwrap()
            .unwrap();
        assert!(released.feedback_released);
        assert!(
            storage
                .set_feedback_released_impl(9999, true)
                .await
                .unwrap()
                .is_none()
        );
    }
}
