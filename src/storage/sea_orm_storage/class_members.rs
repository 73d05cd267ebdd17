//! 班级成员存储操作

use super::SeaOrmStorage;
use crate::entity::class_members::{ActiveModel, Column, Entity as ClassMembers};
use crate::entity::profiles::Entity as Profiles;
use crate::errors::{Result, TutorError};
use crate::models::{
    PaginationInfo, PaginationQuery,
    class_members::{entities::ClassMember, responses::ClassMemberListResponse},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    Set,
};

impl SeaOrmStorage {
    /// 获取班级成员数量
    pub async fn count_class_members_impl(&self, class_id: i64) -> Result<i64> {
        let count = ClassMembers::find()
            .filter(Column::ClassId.eq(class_id))
            .count(&self.db)
            .await
            .map_err(|e| TutorError::database_operation(format!("查询班级成员数量失败: {e}")))?;

        Ok(count as i64)
    }

    /// 学生加入班级
    ///
    /// (class_id, student_id) 有唯一约束，重复加入返回 Conflict。
    pub async fn join_class_impl(&self, class_id: i64, student_id: i64) -> Result<ClassMember> {
        if self.get_class_member_impl(class_id, student_id).await?.is_some() {
            return Err(TutorError::conflict(format!(
                "学生 {student_id} 已在班级 {class_id} 中"
            )));
        }

        let now = chrono::Utc::now().timestamp();
        let model = ActiveModel {
            class_id: Set(class_id),
            student_id: Set(student_id),
            joined_at: Set(now),
            ..Default::default()
        };

        model
            .insert(&self.db)
            .await
            .map_err(|e| TutorError::database_operation(format!("加入班级失败: {e}")))?;

        // 回读一次，带上学生资料
        self.get_class_member_impl(class_id, student_id)
            .await?
            .ok_or_else(|| TutorError::database_operation("加入班级后未找到成员记录"))
    }

    /// 查询学生在班级中的成员记录
    pub async fn get_class_member_impl(
        &self,
        class_id: i64,
        student_id: i64,
    ) -> Result<Option<ClassMember>> {
        let result = ClassMembers::find()
            .filter(
                Condition::all()
                    .add(Column::ClassId.eq(class_id))
                    .add(Column::StudentId.eq(student_id)),
            )
            .find_also_related(Profiles)
            .one(&self.db)
            .await
            .map_err(|e| TutorError::database_operation(format!("查询班级成员失败: {e}")))?;

        Ok(result.map(|(member, student)| member.into_class_member(student)))
    }

    /// 分页列出班级成员
    pub async fn list_class_members_with_pagination_impl(
        &self,
        class_id: i64,
        query: PaginationQuery,
    ) -> Result<ClassMemberListResponse> {
        let (page, size) = query.clamped();

        let select = ClassMembers::find()
            .filter(Column::ClassId.eq(class_id))
            .order_by_asc(Column::JoinedAt)
            .order_by_asc(Column::Id);

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| TutorError::database_operation(format!("查询班级成员总数失败: {e}")))?;

        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| TutorError::database_operation(format!("查询班级成员页数失败: {e}")))?;

        let members = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| TutorError::database_operation(format!("查询班级成员列表失败: {e}")))?;

        // 批量带出学生资料
        let student_ids: Vec<i64> = members.iter().map(|m| m.student_id).collect();
        let profiles = if student_ids.is_empty() {
            Vec::new()
        } else {
            Profiles::find()
                .filter(crate::entity::profiles::Column::Id.is_in(student_ids))
                .all(&self.db)
                .await
                .map_err(|e| {
                    TutorError::database_operation(format!("查询成员资料失败: {e}"))
                })?
        };

        let items = members
            .into_iter()
            .map(|member| {
                let student = profiles.iter().find(|p| p.id == member.student_id).cloned();
                member.into_class_member(student)
            })
            .collect();

        Ok(ClassMemberListResponse {
            items,
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    /// 移除班级成员
    pub async fn remove_class_member_impl(&self, class_id: i64, student_id: i64) -> Result<bool> {
        let result = ClassMembers::delete_many()
            .filter(
                Condition::all()
                    .add(Column::ClassId.eq(class_id))
                    .add(Column::StudentId.eq(student_id)),
            )
            .exec(&self.db)
            .await
            .map_err(|e| TutorError::database_operation(format!("移除班级成员失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::memory_storage;
    use super::super::SeaOrmStorage;
    use crate::errors::TutorError;
    use crate::models::{
        PaginationQuery,
        classes::requests::CreateClassRequest,
        profiles::{entities::ProfileRole, requests::CreateProfileRequest},
    };

    async fn profile(storage: &SeaOrmStorage, uid: &str, name: &str, role: ProfileRole) -> i64 {
        storage
            .create_profile_impl(CreateProfileRequest {
                auth_uid: uid.to_string(),
                email: format!("{uid}@example.com"),
                full_name: Some(name.to_string()),
                role,
            })
            .await
            .unwrap()
            .id
    }

    async fn class(storage: &SeaOrmStorage, teacher_id: i64) -> i64 {
        storage
            .create_class_impl(CreateClassRequest {
                teacher_id: Some(teacher_id),
                name: "11X".to_string(),
                description: None,
            })
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn test_join_is_unique() {
        let storage = memory_storage().await;
        let teacher = profile(&storage, "t1", "Ms Khan", ProfileRole::Teacher).await;
        let student = profile(&storage, "s1", "Sam", ProfileRole::Student).await;
        let class_id = class(&storage, teacher).await;

        let member = storage.join_class_impl(class_id, student).await.unwrap();
        assert_eq!(member.full_name.as_deref(), Some("Sam"));
        assert_eq!(member.email.as_deref(), Some("s1@example.com"));

        let again = storage.join_class_impl(class_id, student).await;
        assert!(matches!(again, Err(TutorError::Conflict(_))));
        assert_eq!(storage.count_class_members_impl(class_id).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_list_and_remove_members() {
        let storage = memory_storage().await;
        let teacher = profile(&storage, "t1", "Ms Khan", ProfileRole::Teacher).await;
        let class_id = class(&storage, teacher).await;
        for (uid, name) in [("s1", "Ana"), ("s2", "Ben"), ("s3", "Cat")] {
            let student = profile(&storage, uid, name, ProfileRole::Student).await;
            storage.join_class_impl(class_id, student).await.unwrap();
        }

        let page = storage
            .list_class_members_with_pagination_impl(class_id, PaginationQuery { page: 1, size: 2 })
            .await
            .unwrap();
        assert_eq!(page.pagination.total, 3);
        assert_eq!(page.pagination.total_pages, 2);
        assert_eq!(page.items.len(), 2);
        assert!(page.items.iter().all(|m| m.full_name.is_some()));

        let first = page.items[0].student_id;
        assert!(storage.remove_class_member_impl(class_id, first).await.unwrap());
        assert!(!storage.remove_class_member_impl(class_id, first).await.unwrap());
        assert!(
            storage
                .get_class_member_impl(class_id, first)
                .await
                .unwrap()
                .is_none()
        );
    }
}
