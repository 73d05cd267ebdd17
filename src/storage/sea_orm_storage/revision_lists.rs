//! 复习清单存储操作

use std::collections::{HashMap, HashSet};

use super::SeaOrmStorage;
use crate::entity::assignments::Entity as Assignments;
use crate::entity::class_members::{Column as MemberColumn, Entity as ClassMembers};
use crate::entity::questions::Entity as Questions;
use crate::entity::revision_allocations::{
    ActiveModel as AllocationActiveModel, Column as AllocationColumn,
    Entity as RevisionAllocations, Model as AllocationModel,
};
use crate::entity::revision_list_questions::{
    ActiveModel as ListQuestionActiveModel, Column as ListQuestionColumn,
    Entity as RevisionListQuestions,
};
use crate::entity::revision_lists::{ActiveModel, Column, Entity as RevisionLists};
use crate::entity::revision_progress::{
    ActiveModel as ProgressActiveModel, Column as ProgressColumn, Entity as RevisionProgress,
};
use crate::errors::{Result, TutorError};
use crate::models::revision_lists::{
    entities::{RevisionAllocation, RevisionList, RevisionListQuestion, RevisionStatus},
    requests::CreateRevisionListRequest,
    responses::{RevisionListCreatedResponse, StudentRevisionListItem},
};
use crate::utils::validate::normalize_optional;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, ModelTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};

/// 清单中的题目 ID，按 position 排序
async fn list_question_ids<C: ConnectionTrait>(conn: &C, revision_list_id: i64) -> Result<Vec<i64>> {
    let rows = RevisionListQuestions::find()
        .filter(ListQuestionColumn::RevisionListId.eq(revision_list_id))
        .order_by_asc(ListQuestionColumn::Position)
        .all(conn)
        .await
        .map_err(|e| TutorError::database_operation(format!("查询清单题目失败: {e}")))?;

    Ok(rows.into_iter().map(|r| r.question_id).collect())
}

/// 各分配已完成的题目，只保留仍在清单中的题
async fn completed_by_allocation<C: ConnectionTrait>(
    conn: &C,
    allocation_ids: &[i64],
    question_ids: &[i64],
) -> Result<HashMap<i64, Vec<i64>>> {
    if allocation_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let in_list: HashSet<i64> = question_ids.iter().copied().collect();
    let rows = RevisionProgress::find()
        .filter(ProgressColumn::AllocationId.is_in(allocation_ids.iter().copied()))
        .order_by_asc(ProgressColumn::Id)
        .all(conn)
        .await
        .map_err(|e| TutorError::database_operation(format!("查询复习进度失败: {e}")))?;

    let mut completed: HashMap<i64, Vec<i64>> = HashMap::new();
    for row in rows {
        if in_list.contains(&row.question_id) {
            completed
                .entry(row.allocation_id)
                .or_default()
                .push(row.question_id);
        }
    }
    Ok(completed)
}

async fn attach_progress<C: ConnectionTrait>(
    conn: &C,
    allocations: Vec<AllocationModel>,
    question_ids: &[i64],
) -> Result<Vec<RevisionAllocation>> {
    let ids: Vec<i64> = allocations.iter().map(|a| a.id).collect();
    let mut completed = completed_by_allocation(conn, &ids, question_ids).await?;

    Ok(allocations
        .into_iter()
        .map(|a| {
            let done = completed.remove(&a.id).unwrap_or_default();
            a.into_revision_allocation(done)
        })
        .collect())
}

impl SeaOrmStorage {
    /// 创建复习清单并分配给班级全部学生
    ///
    /// 每份作业最多一份清单，已存在时返回 Conflict。清单、题目和分配在同一事务中写入。
    pub async fn create_revision_list_impl(
        &self,
        req: CreateRevisionListRequest,
    ) -> Result<RevisionListCreatedResponse> {
        if self
            .get_revision_list_by_assignment_impl(req.assignment_id)
            .await?
            .is_some()
        {
            return Err(TutorError::conflict(format!(
                "作业 {} 已有复习清单",
                req.assignment_id
            )));
        }

        let now = chrono::Utc::now().timestamp();
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| TutorError::database_operation(format!("开启事务失败: {e}")))?;

        let list = ActiveModel {
            assignment_id: Set(req.assignment_id),
            title: Set(req.title.trim().to_string()),
            description: Set(normalize_optional(req.description)),
            created_by: Set(req.created_by),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| TutorError::database_operation(format!("创建复习清单失败: {e}")))?;

        if !req.question_ids.is_empty() {
            let links = req
                .question_ids
                .iter()
                .enumerate()
                .map(|(index, question_id)| ListQuestionActiveModel {
                    revision_list_id: Set(list.id),
                    question_id: Set(*question_id),
                    position: Set(index as i32 + 1),
                    ..Default::default()
                });
            RevisionListQuestions::insert_many(links)
                .exec(&txn)
                .await
                .map_err(|e| TutorError::database_operation(format!("关联清单题目失败: {e}")))?;
        }

        let student_ids: Vec<i64> = ClassMembers::find()
            .filter(MemberColumn::ClassId.eq(req.class_id))
            .order_by_asc(MemberColumn::Id)
            .all(&txn)
            .await
            .map_err(|e| TutorError::database_operation(format!("查询班级成员失败: {e}")))?
            .into_iter()
            .map(|m| m.student_id)
            .collect();

        if !student_ids.is_empty() {
            let allocations = student_ids.iter().map(|student_id| AllocationActiveModel {
                revision_list_id: Set(list.id),
                student_id: Set(*student_id),
                status: Set(RevisionStatus::Pending.to_string()),
                started_at: Set(None),
                completed_at: Set(None),
                ..Default::default()
            });
            RevisionAllocations::insert_many(allocations)
                .exec(&txn)
                .await
                .map_err(|e| TutorError::database_operation(format!("分配复习清单失败: {e}")))?;
        }

        txn.commit()
            .await
            .map_err(|e| TutorError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(RevisionListCreatedResponse {
            revision_list: list.into_revision_list(),
            question_count: req.question_ids.len(),
            students_allocated: student_ids.len(),
        })
    }

    pub async fn get_revision_list_by_id_impl(
        &self,
        revision_list_id: i64,
    ) -> Result<Option<RevisionList>> {
        let result = RevisionLists::find_by_id(revision_list_id)
            .one(&self.db)
            .await
            .map_err(|e| TutorError::database_operation(format!("查询复习清单失败: {e}")))?;

        Ok(result.map(|m| m.into_revision_list()))
    }

    pub async fn get_revision_list_by_assignment_impl(
        &self,
        assignment_id: i64,
    ) -> Result<Option<RevisionList>> {
        let result = RevisionLists::find()
            .filter(Column::AssignmentId.eq(assignment_id))
            .one(&self.db)
            .await
            .map_err(|e| TutorError::database_operation(format!("查询复习清单失败: {e}")))?;

        Ok(result.map(|m| m.into_revision_list()))
    }

    /// 删除清单，题目关联、分配和进度随外键级联删除
    pub async fn delete_revision_list_impl(&self, revision_list_id: i64) -> Result<bool> {
        let result = RevisionLists::delete_by_id(revision_list_id)
            .exec(&self.db)
            .await
            .map_err(|e| TutorError::database_operation(format!("删除复习清单失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 清单题目，按 position 排序，`completed` 统一为 false
    pub async fn list_revision_list_questions_impl(
        &self,
        revision_list_id: i64,
    ) -> Result<Vec<RevisionListQuestion>> {
        let rows = RevisionListQuestions::find()
            .filter(ListQuestionColumn::RevisionListId.eq(revision_list_id))
            .order_by_asc(ListQuestionColumn::Position)
            .find_also_related(Questions)
            .all(&self.db)
            .await
            .map_err(|e| TutorError::database_operation(format!("查询清单题目失败: {e}")))?;

        Ok(rows
            .into_iter()
            .filter_map(|(link, question)| {
                question.map(|q| RevisionListQuestion {
                    position: link.position,
                    question: q.into_question(),
                    completed: false,
                })
            })
            .collect())
    }

    /// 学生在清单上的分配及进度
    pub async fn get_revision_allocation_impl(
        &self,
        revision_list_id: i64,
        student_id: i64,
    ) -> Result<Option<RevisionAllocation>> {
        let Some(allocation) = RevisionAllocations::find()
            .filter(
                Condition::all()
                    .add(AllocationColumn::RevisionListId.eq(revision_list_id))
                    .add(AllocationColumn::StudentId.eq(student_id)),
            )
            .one(&self.db)
            .await
            .map_err(|e| TutorError::database_operation(format!("查询清单分配失败: {e}")))?
        else {
            return Ok(None);
        };

        let question_ids = list_question_ids(&self.db, revision_list_id).await?;
        Ok(attach_progress(&self.db, vec![allocation], &question_ids)
            .await?
            .pop())
    }

    /// 清单的全部分配，按分配顺序
    pub async fn list_revision_allocations_impl(
        &self,
        revision_list_id: i64,
    ) -> Result<Vec<RevisionAllocation>> {
        let allocations = RevisionAllocations::find()
            .filter(AllocationColumn::RevisionListId.eq(revision_list_id))
            .order_by_asc(AllocationColumn::Id)
            .all(&self.db)
            .await
            .map_err(|e| TutorError::database_operation(format!("查询清单分配失败: {e}")))?;

        let question_ids = list_question_ids(&self.db, revision_list_id).await?;
        attach_progress(&self.db, allocations, &question_ids).await
    }

    /// 分配给学生的全部清单，新建的在前
    pub async fn list_student_revision_lists_impl(
        &self,
        student_id: i64,
    ) -> Result<Vec<StudentRevisionListItem>> {
        let rows = RevisionAllocations::find()
            .filter(AllocationColumn::StudentId.eq(student_id))
            .order_by_desc(AllocationColumn::RevisionListId)
            .find_also_related(RevisionLists)
            .all(&self.db)
            .await
            .map_err(|e| TutorError::database_operation(format!("查询学生复习清单失败: {e}")))?;

        let mut items = Vec::with_capacity(rows.len());
        for (allocation, list) in rows {
            let Some(list) = list else {
                continue;
            };
            let assignment_title = list
                .find_related(Assignments)
                .one(&self.db)
                .await
                .map_err(|e| TutorError::database_operation(format!("查询作业失败: {e}")))?
                .map(|a| a.title)
                .unwrap_or_default();
            let question_ids = list_question_ids(&self.db, list.id).await?;
            let Some(allocation) = attach_progress(&self.db, vec![allocation], &question_ids)
                .await?
                .pop()
            else {
                continue;
            };

            items.push(StudentRevisionListItem {
                revision_list: list.into_revision_list(),
                assignment_title,
                question_count: question_ids.len(),
                allocation,
            });
        }
        Ok(items)
    }

    /// 标记学生完成或取消完成一道题，并重新计算分配状态
    ///
    /// 学生没有该清单的分配时返回 None。首次有进度时记录 `started_at`，
    /// 全部完成时记录 `completed_at`，取消完成会清掉 `completed_at`。
    pub async fn update_revision_progress_impl(
        &self,
        revision_list_id: i64,
        student_id: i64,
        question_id: i64,
        completed: bool,
    ) -> Result<Option<RevisionAllocation>> {
        let now = chrono::Utc::now().timestamp();
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| TutorError::database_operation(format!("开启事务失败: {e}")))?;

        let Some(allocation) = RevisionAllocations::find()
            .filter(
                Condition::all()
                    .add(AllocationColumn::RevisionListId.eq(revision_list_id))
                    .add(AllocationColumn::StudentId.eq(student_id)),
            )
            .one(&txn)
            .await
            .map_err(|e| TutorError::database_operation(format!("查询清单分配失败: {e}")))?
        else {
            return Ok(None);
        };

        let existing = RevisionProgress::find()
            .filter(
                Condition::all()
                    .add(ProgressColumn::AllocationId.eq(allocation.id))
                    .add(ProgressColumn::QuestionId.eq(question_id)),
            )
            .one(&txn)
            .await
            .map_err(|e| TutorError::database_operation(format!("查询复习进度失败: {e}")))?;

        match (completed, existing) {
            (true, None) => {
                ProgressActiveModel {
                    allocation_id: Set(allocation.id),
                    question_id: Set(question_id),
                    completed_at: Set(now),
                    ..Default::default()
                }
                .insert(&txn)
                .await
                .map_err(|e| TutorError::database_operation(format!("写入复习进度失败: {e}")))?;
            }
            (false, Some(row)) => {
                row.delete(&txn)
                    .await
                    .map_err(|e| TutorError::database_operation(format!("删除复习进度失败: {e}")))?;
            }
            // 状态没有变化
            _ => {}
        }

        let question_ids = list_question_ids(&txn, revision_list_id).await?;
        let done = completed_by_allocation(&txn, &[allocation.id], &question_ids)
            .await?
            .remove(&allocation.id)
            .unwrap_or_default();

        let status = RevisionStatus::from_progress(done.len(), question_ids.len());
        let started_at = match (allocation.started_at, status) {
            (None, RevisionStatus::InProgress | RevisionStatus::Completed) => Some(now),
            (started_at, _) => started_at,
        };
        let completed_at = match status {
            RevisionStatus::Completed => allocation.completed_at.or(Some(now)),
            _ => None,
        };

        let mut model: AllocationActiveModel = allocation.into();
        model.status = Set(status.to_string());
        model.started_at = Set(started_at);
        model.completed_at = Set(completed_at);
        let updated = model
            .update(&txn)
            .await
            .map_err(|e| TutorError::database_operation(format!("更新清单分配失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| TutorError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(Some(updated.into_revision_allocation(done)))
    }
}

#[cfg(test)]
mod tests {
    use super::super::assignments::tests::seed;
    use super::super::test_support::memory_storage;
    use super::super::SeaOrmStorage;
    use crate::models::{
        assignments::requests::CreateAssignmentRequest,
        profiles::{entities::ProfileRole, requests::CreateProfileRequest},
        revision_lists::{entities::RevisionStatus, requests::CreateRevisionListRequest},
    };

    struct Fixture {
        teacher: i64,
        class_id: i64,
        assignment_id: i64,
        question_ids: Vec<i64>,
        students: Vec<i64>,
    }

    async fn fixture(storage: &SeaOrmStorage) -> Fixture {
        let (teacher, class_id, question_ids) =
            seed(storage, &[("Algebra", 2.0), ("Ratio", 3.0), ("Number", 1.0)]).await;
        let assignment_id = storage
            .create_assignment_impl(CreateAssignmentRequest {
                class_id,
                title: "Mock paper 2".to_string(),
                description: None,
                due_date: None,
                question_ids: question_ids.clone(),
                created_by: teacher,
            })
            .await
            .unwrap()
            .id;

        let mut students = Vec::new();
        for uid in ["amy", "ben"] {
            let id = storage
                .create_profile_impl(CreateProfileRequest {
                    auth_uid: uid.to_string(),
                    email: format!("{uid}@example.com"),
                    full_name: None,
                    role: ProfileRole::Student,
                })
                .await
                .unwrap()
                .id;
            storage.join_class_impl(class_id, id).await.unwrap();
            students.push(id);
        }

        Fixture {
            teacher,
            class_id,
            assignment_id,
            question_ids,
            students,
        }
    }

    fn new_list(f: &Fixture, question_ids: Vec<i64>) -> CreateRevisionListRequest {
        CreateRevisionListRequest {
            assignment_id: f.assignment_id,
            class_id: f.class_id,
            title: " Ratio catch-up ".to_string(),
            description: Some("  ".to_string()),
            question_ids,
            created_by: f.teacher,
        }
    }

    #[tokio::test]
    async fn test_create_allocates_to_class() {
        let storage = memory_storage().await;
        let f = fixture(&storage).await;

        let created = storage
            .create_revision_list_impl(new_list(&f, vec![f.question_ids[1], f.question_ids[0]]))
            .await
            .unwrap();
        assert_eq!(created.revision_list.title, "Ratio catch-up");
        assert!(created.revision_list.description.is_none());
        assert_eq!(created.question_count, 2);
        assert_eq!(created.students_allocated, 2);

        let questions = storage
            .list_revision_list_questions_impl(created.revision_list.id)
            .await
            .unwrap();
        let order: Vec<i64> = questions.iter().map(|q| q.question.id).collect();
        assert_eq!(order, vec![f.question_ids[1], f.question_ids[0]]);

        let allocations = storage
            .list_revision_allocations_impl(created.revision_list.id)
            .await
            .unwrap();
        assert_eq!(allocations.len(), 2);
        assert!(allocations.iter().all(|a| a.status == RevisionStatus::Pending));

        // 每份作业只能有一份清单
        let again = storage
            .create_revision_list_impl(new_list(&f, vec![f.question_ids[2]]))
            .await;
        assert!(matches!(again, Err(crate::errors::TutorError::Conflict(_))));

        let student_lists = storage
            .list_student_revision_lists_impl(f.students[0])
            .await
            .unwrap();
        assert_eq!(student_lists.len(), 1);
        assert_eq!(student_lists[0].assignment_title, "Mock paper 2");
        assert_eq!(student_lists[0].question_count, 2);
    }

    #[tokio::test]
    async fn test_progress_moves_through_statuses() {
        let storage = memory_storage().await;
        let f = fixture(&storage).await;
        let list = storage
            .create_revision_list_impl(new_list(&f, vec![f.question_ids[0], f.question_ids[1]]))
            .await
            .unwrap()
            .revision_list;
        let amy = f.students[0];

        let first = storage
            .update_revision_progress_impl(list.id, amy, f.question_ids[0], true)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(first.status, RevisionStatus::InProgress);
        assert!(first.started_at.is_some());
        assert!(first.completed_at.is_none());
        assert_eq!(first.completed_question_ids, vec![f.question_ids[0]]);

        // 重复标记不会重复计数
        storage
            .update_revision_progress_impl(list.id, amy, f.question_ids[0], true)
            .await
            .unwrap();
        let done = storage
            .update_revision_progress_impl(list.id, amy, f.question_ids[1], true)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(done.status, RevisionStatus::Completed);
        assert_eq!(done.started_at, first.started_at);
        assert!(done.completed_at.is_some());
        assert_eq!(done.completed_question_ids.len(), 2);

        let undone = storage
            .update_revision_progress_impl(list.id, amy, f.question_ids[1], false)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(undone.status, RevisionStatus::InProgress);
        assert!(undone.completed_at.is_none());
        assert_eq!(undone.started_at, first.started_at);

        let reset = storage
            .update_revision_progress_impl(list.id, amy, f.question_ids[0], false)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(reset.status, RevisionStatus::Pending);
        assert!(reset.completed_question_ids.is_empty());

        // 另一名学生的进度互不影响
        let ben = storage
            .get_revision_allocation_impl(list.id, f.students[1])
            .await
            .unwrap()
            .unwrap();
        assert_eq!(ben.status, RevisionStatus::Pending);
        assert!(ben.started_at.is_none());

        // 未分配的用户
        assert!(
            storage
                .update_revision_progress_impl(list.id, f.teacher, f.question_ids[0], true)
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_delete_removes_allocations() {
        let storage = memory_storage().await;
        let f = fixture(&storage).await;
        let list = storage
            .create_revision_list_impl(new_list(&f, vec![f.question_ids[2]]))
            .await
            .unwrap()
            .revision_list;
        storage
            .update_revision_progress_impl(list.id, f.students[0], f.question_ids[2], true)
            .await
            .unwrap();

        assert!(storage.delete_revision_list_impl(list.id).await.unwrap());
        assert!(!storage.delete_revision_list_impl(list.id).await.unwrap());
        assert!(
            storage
                .get_revision_list_by_assignment_impl(f.assignment_id)
                .await
                .unwrap()
                .is_none()
        );
        assert!(
            storage
                .list_student_revision_lists_impl(f.students[0])
                .await
                .unwrap()
                .is_empty()
        );
    }
}
