pub mod get;
pub mod list;
pub mod submit;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::submissions::requests::SubmitAssignmentRequest;
use crate::storage::Storage;

pub struct SubmissionService {
    storage: Option<Arc<dyn Storage>>,
}

impl SubmissionService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    // 学生提交作答
    pub async fn submit(
        &self,
        request: &HttpRequest,
        assignment_id: i64,
        body: SubmitAssignmentRequest,
    ) -> ActixResult<HttpResponse> {
        submit::submit_assignment(self, request, assignment_id, body).await
    }

    // 学生查看自己的提交
    pub async fn get_own(
        &self,
        request: &HttpRequest,
        assignment_id: i64,
    ) -> ActixResult<HttpResponse> {
        get::get_own_submission(self, request, assignment_id).await
    }

    // 教师查看全部提交
    pub async fn list(&self, request: &HttpRequest, assignment_id: i64) -> ActixResult<HttpResponse> {
        list::list_submissions(self, request, assignment_id).await
    }
}
