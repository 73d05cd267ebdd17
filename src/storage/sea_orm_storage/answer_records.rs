//! 评分记录存储操作

use std::collections::HashMap;

use super::SeaOrmStorage;
use crate::entity::answer_records::{ActiveModel, Column, Entity as AnswerRecords, Relation};
use crate::entity::assignments::Column as AssignmentColumn;
use crate::errors::{Result, TutorError};
use crate::models::answer_records::entities::{AnswerRecord, GradedAnswer};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, JoinType, QueryFilter, QueryOrder,
    QuerySelect, RelationTrait, Set, TransactionTrait,
};

impl SeaOrmStorage {
    /// 保存一名学生的评分
    ///
    /// 同一 (作业, 学生, 题目) 只保留一条记录，已存在时原地覆盖。
    /// 学生有提交时，同一事务中把提交标记为已评分。
    pub async fn save_answer_records_impl(
        &self,
        assignment_id: i64,
        student_id: i64,
        graded_by: i64,
        records: Vec<AnswerRecord>,
    ) -> Result<usize> {
        let now = chrono::Utc::now().timestamp();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| TutorError::database_operation(format!("开启事务失败: {e}")))?;

        let existing: HashMap<i64, i64> = AnswerRecords::find()
            .filter(
                Condition::all()
                    .add(Column::AssignmentId.eq(assignment_id))
                    .add(Column::StudentId.eq(student_id)),
            )
            .all(&txn)
            .await
            .map_err(|e| TutorError::database_operation(format!("查询评分记录失败: {e}")))?
            .into_iter()
            .map(|m| (m.question_id, m.id))
            .collect();

        let mut saved = 0;
        for record in records {
            let mut model = ActiveModel {
                assignment_id: Set(assignment_id),
                student_id: Set(student_id),
                question_id: Set(record.question_id),
                topic: Set(record.topic.trim().to_string()),
                sub_topic: Set(record.sub_topic_label().map(str::to_string)),
                marks_awarded: Set(record.marks_awarded),
                marks_available: Set(record.marks_available),
                graded_by: Set(graded_by),
                graded_at: Set(now),
                ..Default::default()
            };

            match existing.get(&record.question_id) {
                Some(id) => {
                    model.id = Set(*id);
                    model.update(&txn).await.map_err(|e| {
                        TutorError::database_operation(format!("更新评分记录失败: {e}"))
                    })?;
                }
                None => {
                    model.insert(&txn).await.map_err(|e| {
                        TutorError::database_operation(format!("写入评分记录失败: {e}"))
                    })?;
                }
            }
            saved += 1;
        }

        super::submissions::mark_submission_graded(&txn, assignment_id, student_id, now).await?;

        txn.commit()
            .await
            .map_err(|e| TutorError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(saved)
    }

    /// 作业下的全部评分记录，按学生、题目排序
    pub async fn list_answer_records_impl(&self, assignment_id: i64) -> Result<Vec<GradedAnswer>> {
        let result = AnswerRecords::find()
            .filter(Column::AssignmentId.eq(assignment_id))
            .order_by_asc(Column::StudentId)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| TutorError::database_operation(format!("查询评分记录失败: {e}")))?;

        Ok(result.into_iter().map(|m| m.into_graded_answer()).collect())
    }

    /// 一名学生在作业下的评分记录
    pub async fn list_student_answer_records_impl(
        &self,
        assignment_id: i64,
        student_id: i64,
    ) -> Result<Vec<AnswerRecord>> {
        let result = AnswerRecords::find()
            .filter(
                Condition::all()
                    .add(Column::AssignmentId.eq(assignment_id))
                    .add(Column::StudentId.eq(student_id)),
            )
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| TutorError::database_operation(format!("查询学生评分记录失败: {e}")))?;

        Ok(result.into_iter().map(|m| m.into_answer_record()).collect())
    }

    /// 一名学生在所有已发布反馈的作业下的评分记录，按作业、记录顺序排列
    pub async fn list_released_answer_records_for_student_impl(
        &self,
        student_id: i64,
    ) -> Result<Vec<AnswerRecord>> {
        let result = AnswerRecords::find()
            .join(JoinType::InnerJoin, Relation::Assignment.def())
            .filter(
                Condition::all()
                    .add(Column::StudentId.eq(student_id))
                    .add(AssignmentColumn::FeedbackReleased.eq(true)),
            )
            .order_by_asc(Column::AssignmentId)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| TutorError::database_operation(format!("查询学生评分记录失败: {e}")))?;

        Ok(result.into_iter().map(|m| m.into_answer_record()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::super::assignments::tests::seed;
    use super::super::test_support::memory_storage;
    use crate::feedback::{summarize_mastery, summarize_student};
    use crate::models::{
        answer_records::entities::AnswerRecord,
        assignments::requests::CreateAssignmentRequest,
        feedback::entities::RagStatus,
        profiles::{entities::ProfileRole, requests::CreateProfileRequest},
    };

    fn record(
        assignment_id: i64,
        student_id: i64,
        question_id: i64,
        topic: &str,
        awarded: f64,
        available: f64,
    ) -> AnswerRecord {
        AnswerRecord {
            student_id,
            assignment_id,
            question_id,
            topic: topic.to_string(),
            sub_topic: Some(" ".to_string()),
            marks_awarded: awarded,
            marks_available: available,
        }
    }

    #[tokio::test]
    async fn test_save_overwrites_existing_marks() {
        let storage = memory_storage().await;
        let (teacher, class_id, ids) = seed(&storage, &[("Algebra", 10.0), ("Geometry", 10.0)]).await;
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
                title: "Mock".to_string(),
                description: None,
                due_date: None,
                question_ids: ids.clone(),
                created_by: teacher,
            })
            .await
            .unwrap();

        let first = vec![
            record(assignment.id, student, ids[0], "Algebra", 3.0, 10.0),
            record(assignment.id, student, ids[1], "Geometry", 2.0, 10.0),
        ];
        let saved = storage
            .save_answer_records_impl(assignment.id, student, teacher, first)
            .await
            .unwrap();
        assert_eq!(saved, 2);

        // 重新评分只覆盖，不新增
        let second = vec![record(assignment.id, student, ids[0], "Algebra", 8.0, 10.0)];
        storage
            .save_answer_records_impl(assignment.id, student, teacher, second)
            .await
            .unwrap();

        let records = storage
            .list_student_answer_records_impl(assignment.id, student)
            .await
            .unwrap();
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.sub_topic.is_none()));

        let summary = summarize_student(&records).unwrap();
        assert_eq!(summary.overall_percentage, 50);
        assert_eq!(summary.overall_status, RagStatus::Amber);
        assert_eq!(summary.best_topic.as_deref(), Some("Algebra"));
        assert_eq!(summary.weakest_topic.as_deref(), Some("Geometry"));

        let all = storage.list_answer_records_impl(assignment.id).await.unwrap();
        assert_eq!(all.len(), 2);
        assert!(all.iter().all(|g| g.graded_by == teacher));
    }

    #[tokio::test]
    async fn test_records_removed_with_assignment() {
        let storage = memory_storage().await;
        let (teacher, class_id, ids) = seed(&storage, &[("Number", 4.0)]).await;
        let assignment = storage
            .create_assignment_impl(CreateAssignmentRequest {
                class_id,
                title: "Quiz".to_string(),
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
                vec![record(assignment.id, teacher, ids[0], "Number", 4.0, 4.0)],
            )
            .await
            .unwrap();

        assert!(storage.delete_assignment_impl(assignment.id).await.unwrap());
        assert!(
            storage
                .list_answer_records_impl(assignment.id)
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn test_mastery_reads_only_released_assignments() {
        let storage = memory_storage().await;
        let (teacher, class_id, ids) = seed(&storage, &[("Algebra", 10.0), ("Ratio", 10.0)]).await;
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

        let mut assignments = Vec::new();
        for title in ["Week 1", "Week 2", "Week 3"] {
            let assignment = storage
                .create_assignment_impl(CreateAssignmentRequest {
                    class_id,
                    title: title.to_string(),
                    description: None,
                    due_date: None,
                    question_ids: ids.clone(),
                    created_by: teacher,
                })
                .await
                .unwrap();
            assignments.push(assignment.id);
        }

        let marks = [(9.0, 7.0), (2.0, 3.0), (0.0, 0.0)];
        for (assignment_id, (algebra, ratio)) in assignments.iter().zip(marks) {
            storage
                .save_answer_records_impl(
                    *assignment_id,
                    student,
                    teacher,
                    vec![
                        record(*assignment_id, student, ids[0], "Algebra", algebra, 10.0),
                        record(*assignment_id, student, ids[1], "Ratio", ratio, 10.0),
                    ],
                )
                .await
                .unwrap();
        }

        // 第三份作业反馈未发布
        storage.set_feedback_released_impl(assignments[0], true).await.unwrap();
        storage.set_feedback_released_impl(assignments[1], true).await.unwrap();

        let records = storage
            .list_released_answer_records_for_student_impl(student)
            .await
            .unwrap();
        assert_eq!(records.len(), 4);
        assert!(records.iter().all(|r| r.assignment_id != assignments[2]));
        assert_eq!(records[0].assignment_id, assignments[0]);

        let mastery = summarize_mastery(&records).unwrap();
        assert_eq!(mastery.assignments_graded, 2);
        // 作业一 80%，作业二 25%
        assert_eq!(mastery.average_score, 53);
        assert_eq!(mastery.average_status, RagStatus::Amber);
        assert_eq!(mastery.topic_mastery.best_topic.as_deref(), Some("Algebra"));
        assert_eq!(mastery.topic_mastery.weakest_topic.as_deref(), Some("Ratio"));

        // 其他学生看不到这些记录
        assert!(
            storage
                .list_released_answer_records_for_student_impl(teacher)
                .await
                .unwrap()
                .is_empty()
        );
    }
}
