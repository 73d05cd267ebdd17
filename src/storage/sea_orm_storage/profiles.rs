//! 用户资料存储操作

use super::SeaOrmStorage;
use crate::entity::profiles::{ActiveModel, Column, Entity as Profiles};
use crate::errors::{Result, TutorError};
use crate::models::profiles::{
    entities::Profile,
    requests::{CreateProfileRequest, UpdateProfileRequest},
};
use crate::utils::validate::normalize_optional;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};

impl SeaOrmStorage {
    /// 通过认证服务 UUID 获取资料
    pub async fn get_profile_by_auth_uid_impl(&self, auth_uid: &str) -> Result<Option<Profile>> {
        let result = Profiles::find()
            .filter(Column::AuthUid.eq(auth_uid))
            .one(&self.db)
            .await
            .map_err(|e| TutorError::database_operation(format!("查询用户资料失败: {e}")))?;

        Ok(result.map(|m| m.into_profile()))
    }

    /// 通过 ID 获取资料
    pub async fn get_profile_by_id_impl(&self, id: i64) -> Result<Option<Profile>> {
        let result = Profiles::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| TutorError::database_operation(format!("查询用户资料失败: {e}")))?;

        Ok(result.map(|m| m.into_profile()))
    }

    /// 批量获取资料
    pub async fn get_profiles_by_ids_impl(&self, ids: &[i64]) -> Result<Vec<Profile>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let result = Profiles::find()
            .filter(Column::Id.is_in(ids.iter().copied()))
            .all(&self.db)
            .await
            .map_err(|e| TutorError::database_operation(format!("批量查询用户资料失败: {e}")))?;

        Ok(result.into_iter().map(|m| m.into_profile()).collect())
    }

    /// 创建资料
    ///
    /// 并发的首次请求可能同时走到这里，唯一约束冲突时回读已存在的记录。
    pub async fn create_profile_impl(&self, req: CreateProfileRequest) -> Result<Profile> {
        let now = chrono::Utc::now().timestamp();
        let auth_uid = req.auth_uid.clone();

        let model = ActiveModel {
            auth_uid: Set(req.auth_uid),
            email: Set(req.email),
            full_name: Set(normalize_optional(req.full_name)),
            role: Set(req.role.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        match model.insert(&self.db).await {
            Ok(result) => Ok(result.into_profile()),
            Err(e) => match self.get_profile_by_auth_uid_impl(&auth_uid).await? {
                Some(existing) => Ok(existing),
                None => Err(TutorError::database_operation(format!(
                    "创建用户资料失败: {e}"
                ))),
            },
        }
    }

    /// 更新资料
    pub async fn update_profile_impl(
        &self,
        id: i64,
        update: UpdateProfileRequest,
    ) -> Result<Option<Profile>> {
        if self.get_profile_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let now = chrono::Utc::now().timestamp();
        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(now),
            ..Default::default()
        };

        if let Some(full_name) = update.full_name {
            model.full_name = Set(normalize_optional(Some(full_name)));
        }

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| TutorError::database_operation(format!("更新用户资料失败: {e}")))?;

        Ok(Some(result.into_profile()))
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::memory_storage;
    use crate::models::profiles::{
        entities::ProfileRole,
        requests::{CreateProfileRequest, UpdateProfileRequest},
    };

    fn new_profile(uid: &str, email: &str) -> CreateProfileRequest {
        CreateProfileRequest {
            auth_uid: uid.to_string(),
            email: email.to_string(),
            full_name: Some("Ada Lovelace".to_string()),
            role: ProfileRole::Teacher,
        }
    }

    #[tokio::test]
    async fn test_create_and_lookup_profile() {
        let storage = memory_storage().await;
        let created = storage
            .create_profile_impl(new_profile("uid-1", "ada@example.com"))
            .await
            .unwrap();
        assert_eq!(created.role, ProfileRole::Teacher);

        let by_uid = storage.get_profile_by_auth_uid_impl("uid-1").await.unwrap();
        assert_eq!(by_uid.map(|p| p.id), Some(created.id));
        assert!(
            storage
                .get_profile_by_auth_uid_impl("missing")
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_duplicate_create_returns_existing() {
        let storage = memory_storage().await;
        let first = storage
            .create_profile_impl(new_profile("uid-1", "ada@example.com"))
            .await
            .unwrap();
        let second = storage
            .create_profile_impl(new_profile("uid-1", "ada@example.com"))
            .await
            .unwrap();
        assert_eq!(first.id, second.id);
    }

    #[tokio::test]
    async fn test_update_profile_name() {
        let storage = memory_storage().await;
        let created = storage
            .create_profile_impl(new_profile("uid-1", "ada@example.com"))
            .await
            .unwrap();

        let updated = storage
            .update_profile_impl(
                created.id,
                UpdateProfileRequest {
                    full_name: Some("  Ada King ".to_string()),
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.full_name.as_deref(), Some("Ada King"));

        let missing = storage
            .update_profile_impl(999, UpdateProfileRequest { full_name: None })
            .await
            .unwrap();
        assert!(missing.is_none());
    }
}
