//! 复习清单：教师按作业建清单并分配给全班，学生逐题标记完成

pub mod create;
pub mod progress;
pub mod student;
pub mod teacher;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::revision_lists::requests::{
    CreateRevisionListBody, UpdateRevisionProgressRequest,
};
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;

pub struct RevisionListService {
    storage: Option<Arc<dyn Storage>>,
}

impl RevisionListService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    pub async fn create_revision_list(
        &self,
        request: &HttpRequest,
        assignment_id: i64,
        body: CreateRevisionListBody,
    ) -> ActixResult<HttpResponse> {
        create::create_revision_list(self, request, assignment_id, body).await
    }

    // 教师查看作业的清单及每名学生的进度
    pub async fn assignment_revision_list(
        &self,
        request: &HttpRequest,
        assignment_id: i64,
    ) -> ActixResult<HttpResponse> {
        teacher::assignment_revision_list(self, request, assignment_id).await
    }

    pub async fn delete_revision_list(
        &self,
        request: &HttpRequest,
        assignment_id: i64,
    ) -> ActixResult<HttpResponse> {
        teacher::delete_revision_list(self, request, assignment_id).await
    }

    // 分配给当前学生的清单
    pub async fn student_revision_lists(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        student::student_revision_lists(self, request).await
    }

    pub async fn revision_list_detail(
        &self,
        request: &HttpRequest,
        revision_list_id: i64,
    ) -> ActixResult<HttpResponse> {
        student::revision_list_detail(self, request, revision_list_id).await
    }

    pub async fn update_progress(
        &self,
        request: &HttpRequest,
        revision_list_id: i64,
        body: UpdateRevisionProgressRequest,
    ) -> ActixResult<HttpResponse> {
        progress::update_progress(self, request, revision_list_id, body).await
    }
}

fn revision_list_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(
        ErrorCode::RevisionListNotFound,
        "Revision list not found",
    ))
}
