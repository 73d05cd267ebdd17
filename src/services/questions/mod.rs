pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::profiles::entities::{Profile, ProfileRole};
use crate::models::questions::entities::Question;
use crate::models::questions::requests::{
    CreateQuestionRequest, QuestionListQuery, UpdateQuestionRequest,
};
use crate::storage::Storage;

pub struct QuestionService {
    storage: Option<Arc<dyn Storage>>,
}

impl QuestionService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    pub async fn list_questions(
        &self,
        request: &HttpRequest,
        query: QuestionListQuery,
    ) -> ActixResult<HttpResponse> {
        list::list_questions(self, request, query).await
    }

    pub async fn create_question(
        &self,
        request: &HttpRequest,
        question: CreateQuestionRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_question(self, request, question).await
    }

    pub async fn get_question(
        &self,
        request: &HttpRequest,
        question_id: i64,
    ) -> ActixResult<HttpResponse> {
        get::get_question(self, request, question_id).await
    }

    pub async fn update_question(
        &self,
        request: &HttpRequest,
        question_id: i64,
        update: UpdateQuestionRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_question(self, request, question_id, update).await
    }

    pub async fn delete_question(
        &self,
        request: &HttpRequest,
        question_id: i64,
    ) -> ActixResult<HttpResponse> {
        delete::delete_question(self, request, question_id).await
    }
}

/// 题目只能由出题人或管理员修改；没有出题人的（导入的真题）所有教师可改
pub(crate) fn can_modify(profile: &Profile, question: &Question) -> bool {
    profile.role == ProfileRole::Admin
        || question
            .created_by
            .is_none_or(|creator| creator == profile.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::questions::entities::{Difficulty, QuestionContentType};

    fn profile(id: i64, role: ProfileRole) -> Profile {
        let now = chrono::Utc::now();
        Profile {
            id,
            auth_uid: format!("uid-{id}"),
            email: format!("p{id}@example.com"),
            full_name: None,
            role,
            created_at: now,
            updated_at: now,
        }
    }

    fn question(created_by: Option<i64>) -> Question {
        let now = chrono::Utc::now();
        Question {
            id: 1,
            created_by,
            content_type: QuestionContentType::Manual,
            question_latex: "Solve $2x = 6$".into(),
            image_url: None,
            topic: "Algebra".into(),
            sub_topic: None,
            difficulty: Difficulty::Foundation,
            marks: 2.0,
            answer_key: None,
            is_verified: false,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_can_modify() {
        let owner = profile(7, ProfileRole::Teacher);
        let other = profile(8, ProfileRole::Teacher);
        let admin = profile(9, ProfileRole::Admin);

        assert!(can_modify(&owner, &question(Some(7))));
        assert!(!can_modify(&other, &question(Some(7))));
        assert!(can_modify(&admin, &question(Some(7))));
        assert!(can_modify(&other, &question(None)));
    }
}
