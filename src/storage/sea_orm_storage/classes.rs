//! 班级存储操作

use super::SeaOrmStorage;
use crate::entity::class_members::{Column as MemberColumn, Entity as ClassMembers};
use crate::entity::classes::{ActiveModel, Column, Entity as Classes};
use crate::errors::{Result, TutorError};
use crate::models::{
    PaginationInfo,
    classes::{
        entities::Class,
        requests::{ClassListQuery, CreateClassRequest, UpdateClassRequest},
        responses::ClassListResponse,
    },
};
use crate::utils::validate::normalize_optional;
use crate::utils::{escape_like_pattern, random_code::generate_random_code};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

/// 邀请码长度
const INVITE_CODE_LEN: usize = 8;

impl SeaOrmStorage {
    /// 创建班级
    pub async fn create_class_impl(&self, req: CreateClassRequest) -> Result<Class> {
        let now = chrono::Utc::now().timestamp();

        // teacher_id 必须由服务层确保已设置
        let teacher_id = req.teacher_id.ok_or_else(|| {
            TutorError::database_operation("teacher_id must be set before calling create_class")
        })?;

        let model = ActiveModel {
            teacher_id: Set(teacher_id),
            name: Set(req.name.trim().to_string()),
            description: Set(normalize_optional(req.description)),
            invite_code: Set(generate_random_code(INVITE_CODE_LEN)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| TutorError::database_operation(format!("创建班级失败: {e}")))?;

        Ok(result.into_class())
    }

    /// 通过 ID 获取班级
    pub async fn get_class_by_id_impl(&self, class_id: i64) -> Result<Option<Class>> {
        let result = Classes::find_by_id(class_id)
            .one(&self.db)
            .await
            .map_err(|e| TutorError::database_operation(format!("查询班级失败: {e}")))?;

        Ok(result.map(|m| m.into_class()))
    }

    /// 通过邀请码获取班级，大小写不敏感
    pub async fn get_class_by_code_impl(&self, invite_code: &str) -> Result<Option<Class>> {
        let code = invite_code.trim().to_ascii_uppercase();
        let result = Classes::find()
            .filter(Column::InviteCode.eq(code))
            .one(&self.db)
            .await
            .map_err(|e| TutorError::database_operation(format!("查询班级失败: {e}")))?;

        Ok(result.map(|m| m.into_class()))
    }

    /// 分页列出班级
    pub async fn list_classes_with_pagination_impl(
        &self,
        query: ClassListQuery,
    ) -> Result<ClassListResponse> {
        let (page, size) = query.pagination.clamped();

        let mut select = Classes::find();

        // 教师筛选
        if let Some(teacher_id) = query.teacher_id {
            select = select.filter(Column::TeacherId.eq(teacher_id));
        }

        // 学生筛选：只看已加入的班级
        if let Some(student_id) = query.student_id {
            let class_ids: Vec<i64> = ClassMembers::find()
                .select_only()
                .column(MemberColumn::ClassId)
                .filter(MemberColumn::StudentId.eq(student_id))
                .into_tuple()
                .all(&self.db)
                .await
                .map_err(|e| {
                    TutorError::database_operation(format!("查询学生班级关联失败: {e}"))
                })?;

            if class_ids.is_empty() {
                return Ok(ClassListResponse {
                    items: vec![],
                    pagination: PaginationInfo::new(page, size, 0, 0),
                });
            }
            select = select.filter(Column::Id.is_in(class_ids));
        }

        // 搜索条件
        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let escaped = escape_like_pattern(search.trim());
            select = select.filter(Column::Name.contains(&escaped));
        }

        select = select.order_by_desc(Column::CreatedAt);

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| TutorError::database_operation(format!("查询班级总数失败: {e}")))?;

        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| TutorError::database_operation(format!("查询班级页数失败: {e}")))?;

        let classes = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| TutorError::database_operation(format!("查询班级列表失败: {e}")))?;

        Ok(ClassListResponse {
            items: classes.into_iter().map(|m| m.into_class()).collect(),
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    /// 更新班级信息
    pub async fn update_class_impl(
        &self,
        class_id: i64,
        update: UpdateClassRequest,
    ) -> Result<Option<Class>> {
        if self.get_class_by_id_impl(class_id).await?.is_none() {
            return Ok(None);
        }

        let now = chrono::Utc::now().timestamp();

        let mut model = ActiveModel {
            id: Set(class_id),
            updated_at: Set(now),
            ..Default::default()
        };

        if let Some(name) = update.name {
            model.name = Set(name.trim().to_string());
        }

        if let Some(description) = update.description {
            model.description = Set(normalize_optional(Some(description)));
        }

        if update.regenerate_invite_code {
            model.invite_code = Set(generate_random_code(INVITE_CODE_LEN));
        }

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| TutorError::database_operation(format!("更新班级失败: {e}")))?;

        Ok(Some(result.into_class()))
    }

    /// 删除班级，成员与作业级联删除
    pub async fn delete_class_impl(&self, class_id: i64) -> Result<bool> {
        let result = Classes::delete_by_id(class_id)
            .exec(&self.db)
            .await
            .map_err(|e| TutorError::database_operation(format!("删除班级失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::memory_storage;
    use super::super::SeaOrmStorage;
    use crate::models::{
        PaginationQuery,
        classes::requests::{ClassListQuery, CreateClassRequest, UpdateClassRequest},
        profiles::{entities::ProfileRole, requests::CreateProfileRequest},
    };

    async fn profile(storage: &SeaOrmStorage, uid: &str, role: ProfileRole) -> i64 {
        storage
            .create_profile_impl(CreateProfileRequest {
                auth_uid: uid.to_string(),
                email: format!("{uid}@example.com"),
                full_name: None,
                role,
            })
            .await
            .unwrap()
            .id
    }

    fn new_class(teacher_id: i64, name: &str) -> CreateClassRequest {
        CreateClassRequest {
            teacher_id: Some(teacher_id),
            name: name.to_string(),
            description: Some("   ".to_string()),
        }
    }

    #[tokio::test]
    async fn test_create_class_requires_teacher() {
        let storage = memory_storage().await;
        let result = storage
            .create_class_impl(CreateClassRequest {
                teacher_id: None,
                name: "11X".to_string(),
                description: None,
            })
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_create_and_find_by_code() {
        let storage = memory_storage().await;
        let teacher = profile(&storage, "t1", ProfileRole::Teacher).await;

        let class = storage
            .create_class_impl(new_class(teacher, " Year 11 Set 2 "))
            .await
            .unwrap();
        assert_eq!(class.name, "Year 11 Set 2");
        assert_eq!(class.description, None);
        assert_eq!(class.invite_code.len(), 8);

        let found = storage
            .get_class_by_code_impl(&class.invite_code.to_lowercase())
            .await
            .unwrap();
        assert_eq!(found.map(|c| c.id), Some(class.id));
    }

    #[tokio::test]
    async fn test_list_classes_by_student_and_teacher() {
        let storage = memory_storage().await;
        let teacher_a = profile(&storage, "ta", ProfileRole::Teacher).await;
        let teacher_b = profile(&storage, "tb", ProfileRole::Teacher).await;
        let student = profile(&storage, "s1", ProfileRole::Student).await;

        let a1 = storage.create_class_impl(new_class(teacher_a, "Algebra club")).await.unwrap();
        storage.create_class_impl(new_class(teacher_a, "Geometry club")).await.unwrap();
        storage.create_class_impl(new_class(teacher_b, "Stats club")).await.unwrap();

        let by_teacher = storage
            .list_classes_with_pagination_impl(ClassListQuery {
                teacher_id: Some(teacher_a),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(by_teacher.pagination.total, 2);

        let none_joined = storage
            .list_classes_with_pagination_impl(ClassListQuery {
                student_id: Some(student),
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(none_joined.items.is_empty());

        storage.join_class_impl(a1.id, student).await.unwrap();
        let joined = storage
            .list_classes_with_pagination_impl(ClassListQuery {
                student_id: Some(student),
                pagination: PaginationQuery { page: 1, size: 5 },
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(joined.items.len(), 1);
        assert_eq!(joined.items[0].id, a1.id);

        let searched = storage
            .list_classes_with_pagination_impl(ClassListQuery {
                search: Some("geo".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(searched.items.len(), 1);
    }

    #[tokio::test]
    async fn test_update_regenerates_code_and_delete() {
        let storage = memory_storage().await;
        let teacher = profile(&storage, "t1", ProfileRole::Teacher).await;
        let class = storage.create_class_impl(new_class(teacher, "11X")).await.unwrap();

        let updated = storage
            .update_class_impl(
                class.id,
                UpdateClassRequest {
                    name: Some("11Y".to_string()),
                    description: None,
                    regenerate_invite_code: true,
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.name, "11Y");
        assert!(
            storage
                .get_class_by_code_impl(&updated.invite_code)
                .await
                .unwrap()
                .is_some()
        );

        assert!(storage.delete_class_impl(class.id).await.unwrap());
        assert!(!storage.delete_class_impl(class.id).await.unwrap());
        assert!(storage.get_class_by_id_impl(class.id).await.unwrap().is_none());
    }
}
