//! 学生提交存储操作

use super::SeaOrmStorage;
use crate::entity::submissions::{ActiveModel, Column, Entity as Submissions};
use crate::errors::{Result, TutorError};
use crate::models::submissions::{
    entities::{Submission, SubmissionStatus},
    requests::CreateSubmissionRequest,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, QueryFilter,
    QueryOrder, Set,
};

/// 评分后把学生的提交标记为已评分，没有提交时不做任何事
pub(super) async fn mark_submission_graded<C: ConnectionTrait>(
    conn: &C,
    assignment_id: i64,
    student_id: i64,
    graded_at: i64,
) -> Result<()> {
    let Some(existing) = Submissions::find()
        .filter(
            Condition::all()
                .add(Column::AssignmentId.eq(assignment_id))
                .add(Column::StudentId.eq(student_id)),
        )
        .one(conn)
        .await
        .map_err(|e| TutorError::database_operation(format!("查询提交失败: {e}")))?
    else {
        return Ok(());
    };

    let mut model: ActiveModel = existing.into();
    model.status = Set(SubmissionStatus::Graded.to_string());
    model.graded_at = Set(Some(graded_at));
    model
        .update(conn)
        .await
        .map_err(|e| TutorError::database_operation(format!("更新提交状态失败: {e}")))?;

    Ok(())
}

impl SeaOrmStorage {
    /// 创建提交
    ///
    /// 每名学生每份作业只能提交一次，重复提交返回 Conflict。
    pub async fn create_submission_impl(&self, req: CreateSubmissionRequest) -> Result<Submission> {
        if self
            .get_submission_impl(req.assignment_id, req.student_id)
            .await?
            .is_some()
        {
            return Err(TutorError::conflict(format!(
                "学生 {} 已提交作业 {}",
                req.student_id, req.assignment_id
            )));
        }

        let now = chrono::Utc::now().timestamp();
        let model = ActiveModel {
            assignment_id: Set(req.assignment_id),
            student_id: Set(req.student_id),
            answers: Set(serde_json::to_string(&req.answers)?),
            status: Set(SubmissionStatus::Submitted.to_string()),
            submitted_at: Set(now),
            graded_at: Set(None),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| TutorError::database_operation(format!("创建提交失败: {e}")))?;

        result.into_submission()
    }

    /// 学生在作业下的提交
    pub async fn get_submission_impl(
        &self,
        assignment_id: i64,
        student_id: i64,
    ) -> Result<Option<Submission>> {
        let result = Submissions::find()
            .filter(
                Condition::all()
                    .add(Column::AssignmentId.eq(assignment_id))
                    .add(Column::StudentId.eq(student_id)),
            )
            .one(&self.db)
            .await
            .map_err(|e| TutorError::database_operation(format!("查询提交失败: {e}")))?;

        result.map(|m| m.into_submission()).transpose()
    }

    /// 作业下的全部提交，按提交先后排序
    pub async fn list_submissions_impl(&self, assignment_id: i64) -> Result<Vec<Submission>> {
        let result = Submissions::find()
            .filter(Column::AssignmentId.eq(assignment_id))
            .order_by_asc(Column::SubmittedAt)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| TutorError::database_operation(format!("查询提交列表失败: {e}")))?;

        result.into_iter().map(|m| m.into_submission()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::super::assignments::tests::seed;
    use super::super::test_support::memory_storage;
    use crate::models::{
        answer_records::entities::AnswerRecord,
        assignments::requests::CreateAssignmentRequest,
        profiles::{entities::ProfileRole, requests::CreateProfileRequest},
        submissions::{
            entities::{SubmissionStatus, SubmittedAnswer},
            requests::CreateSubmissionRequest,
        },
    };

    #[tokio::test]
    async fn test_submission_lifecycle() {
        let storage = memory_storage().await;
        let (teacher, class_id, ids) = seed(&storage, &[("Algebra", 4.0), ("Ratio", 2.0)]).await;
        let student = storage
            .create_profile_impl(CreateProfileRequest {
                auth_uid: "student-uid".to_string(),
                email: "sam@example.com".to_string(),
                full_name: None,
                role: ProfileRole::Student,
            })
            .await
            .unwrap()
            .id;
        let assignment = storage
            .create_assignment_impl(CreateAssignmentRequest {
                class_id,
                title: "Homework 3".to_string(),
                description: None,
                due_date: None,
                question_ids: ids.clone(),
                created_by: teacher,
            })
            .await
            .unwrap();

        let answers = vec![
            SubmittedAnswer {
                question_id: ids[0],
                answer: "x = 4".to_string(),
            },
            SubmittedAnswer {
                question_id: ids[1],
                answer: "3:2".to_string(),
            },
        ];
        let submission = storage
            .create_submission_impl(CreateSubmissionRequest {
                assignment_id: assignment.id,
                student_id: student,
                answers: answers.clone(),
            })
            .await
            .unwrap();
        assert_eq!(submission.status, SubmissionStatus::Submitted);
        assert_eq!(submission.answers, answers);
        assert!(submission.graded_at.is_none());

        // 不允许重复提交
        let again = storage
            .create_submission_impl(CreateSubmissionRequest {
                assignment_id: assignment.id,
                student_id: student,
                answers: Vec::new(),
            })
            .await;
        assert!(matches!(again, Err(crate::errors::TutorError::Conflict(_))));

        // 录入得分后提交变为已评分
        storage
            .save_answer_records_impl(
                assignment.id,
                student,
                teacher,
                vec![AnswerRecord {
                    student_id: student,
                    assignment_id: assignment.id,
                    question_id: ids[0],
                    topic: "Algebra".to_string(),
                    sub_topic: None,
                    marks_awarded: 3.0,
                    marks_available: 4.0,
                }],
            )
            .await
            .unwrap();

        let graded = storage
            .get_submission_impl(assignment.id, student)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(graded.status, SubmissionStatus::Graded);
        assert!(graded.graded_at.is_some());
        assert_eq!(graded.answers, answers);

        let all = storage.list_submissions_impl(assignment.id).await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].student_id, student);
    }

    #[tokio::test]
    async fn test_grading_without_submission_leaves_no_row() {
        let storage = memory_storage().await;
        let (teacher, class_id, ids) = seed(&storage, &[("Number", 2.0)]).await;
        let assignment = storage
            .create_assignment_impl(CreateAssignmentRequest {
                class_id,
                title: "Paper marking".to_string(),
                description: None,
                due_date: None,
                question_ids: ids.clone(),
                created_by: teacher,
            })
            .await
            .unwrap();

        storage
            .save_answer_records_impl(
                assignment.id,
                teacher,
                teacher,
                vec![AnswerRecord {
                    student_id: teacher,
                    assignment_id: assignment.id,
                    question_id: ids[0],
                    topic: "Number".to_string(),
                    sub_topic: None,
                    marks_awarded: 2.0,
                    marks_available: 2.0,
                }],
            )
            .await
            .unwrap();

        assert!(
            storage
                .get_submission_impl(assignment.id, teacher)
                .await
                .unwrap()
                .is_none()
        );
    }
}
