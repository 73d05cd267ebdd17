pub mod assignment;
pub mod release;
pub mod student;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;
use tracing::warn;

use crate::errors::Result;
use crate::models::assignments::requests::ReleaseFeedbackRequest;
use crate::models::feedback::responses::StudentRef;
use crate::models::profiles::entities::Profile;
use crate::storage::Storage;

pub struct FeedbackService {
    storage: Option<Arc<dyn Storage>>,
}

impl FeedbackService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    // 全班反馈汇总
    pub async fn assignment_feedback(
        &self,
        request: &HttpRequest,
        assignment_id: i64,
    ) -> ActixResult<HttpResponse> {
        assignment::assignment_feedback(self, request, assignment_id).await
    }

    // 单个学生的反馈与复习包
    pub async fn student_feedback(
        &self,
        request: &HttpRequest,
        assignment_id: i64,
        student_id: i64,
    ) -> ActixResult<HttpResponse> {
        student::student_feedback(self, request, assignment_id, student_id).await
    }

    pub async fn release_feedback(
        &self,
        request: &HttpRequest,
        assignment_id: i64,
        body: ReleaseFeedbackRequest,
    ) -> ActixResult<HttpResponse> {
        release::release_feedback(self, request, assignment_id, body).await
    }
}

fn student_ref(student_id: i64, profile: Option<&Profile>) -> StudentRef {
    StudentRef {
        student_id,
        full_name: profile.and_then(|p| p.full_name.clone()),
        email: profile.map(|p| p.email.clone()),
    }
}

/// 资料查不到或查询失败时只返回学生 ID，反馈本身照常返回
fn student_ref_or_bare(student_id: i64, profile: Result<Option<Profile>>) -> StudentRef {
    match profile {
        Ok(profile) => student_ref(student_id, profile.as_ref()),
        Err(e) => {
            warn!("Failed to load profile of student {}: {}", student_id, e);
            student_ref(student_id, None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::TutorError;
    use crate::models::profiles::entities::ProfileRole;

    #[test]
    fn test_student_ref_falls_back_on_lookup_error() {
        let failed = student_ref_or_bare(7, Err(TutorError::database_operation("connection reset")));
        assert_eq!(failed.student_id, 7);
        assert_eq!(failed.full_name, None);
        assert_eq!(failed.email, None);

        let profile = Profile {
            id: 7,
            auth_uid: "c1b7".to_string(),
            email: "ada@example.com".to_string(),
            full_name: Some("Ada".to_string()),
            role: ProfileRole::Student,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        };
        let found = student_ref_or_bare(7, Ok(Some(profile)));
        assert_eq!(found.full_name.as_deref(), Some("Ada"));
        assert_eq!(found.email.as_deref(), Some("ada@example.com"));
    }
}
