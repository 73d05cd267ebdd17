pub mod access;
pub mod create;
pub mod delete;
pub mod detail;
pub mod list;
pub mod questions;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::collections::HashSet;
use std::sync::Arc;

use crate::models::assignments::requests::{
    AssignmentQueryParams, CreateAssignmentRequest, SetAssignmentQuestionsRequest,
    UpdateAssignmentRequest,
};
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;

/// 作业标题最大长度
pub(crate) const MAX_TITLE_LEN: usize = 200;
/// 一份作业最多题目数
pub(crate) const MAX_ASSIGNMENT_QUESTIONS: usize = 100;

pub struct AssignmentService {
    storage: Option<Arc<dyn Storage>>,
}

impl AssignmentService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    // 列出班级作业，学生只能看到已发布的
    pub async fn list_assignments(
        &self,
        request: &HttpRequest,
        query: AssignmentQueryParams,
    ) -> ActixResult<HttpResponse> {
        list::list_assignments(self, request, query).await
    }

    pub async fn create_assignment(
        &self,
        request: &HttpRequest,
        assignment: CreateAssignmentRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_assignment(self, request, assignment).await
    }

    // 作业详情（含按顺序排列的题目）
    pub async fn get_assignment(
        &self,
        request: &HttpRequest,
        assignment_id: i64,
    ) -> ActixResult<HttpResponse> {
        detail::get_assignment(self, request, assignment_id).await
    }

    pub async fn update_assignment(
        &self,
        request: &HttpRequest,
        assignment_id: i64,
        update: UpdateAssignmentRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_assignment(self, request, assignment_id, update).await
    }

    pub async fn delete_assignment(
        &self,
        request: &HttpRequest,
        assignment_id: i64,
    ) -> ActixResult<HttpResponse> {
        delete::delete_assignment(self, request, assignment_id).await
    }

    // 整体替换作业题目
    pub async fn set_questions(
        &self,
        request: &HttpRequest,
        assignment_id: i64,
        body: SetAssignmentQuestionsRequest,
    ) -> ActixResult<HttpResponse> {
        questions::set_questions(self, request, assignment_id, body).await
    }
}

/// 题目列表不能重复，且每道题都要在题库中存在
pub(crate) async fn check_question_ids(
    storage: &Arc<dyn Storage>,
    question_ids: &[i64],
) -> Result<(), HttpResponse> {
    if question_ids.len() > MAX_ASSIGNMENT_QUESTIONS {
        return Err(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            format!("An assignment can hold at most {MAX_ASSIGNMENT_QUESTIONS} questions"),
        )));
    }

    let unique: HashSet<i64> = question_ids.iter().copied().collect();
    if unique.len() != question_ids.len() {
        return Err(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "Duplicate question ids",
        )));
    }
    if unique.is_empty() {
        return Ok(());
    }

    let found = storage
        .get_questions_by_ids(question_ids)
        .await
        .map_err(|e| crate::services::internal_error(format!("Failed to load questions: {e}")))?;
    if found.len() != unique.len() {
        let found: HashSet<i64> = found.iter().map(|q| q.id).collect();
        let missing: Vec<String> = question_ids
            .iter()
            .filter(|id| !found.contains(id))
            .map(|id| id.to_string())
            .collect();
        return Err(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::QuestionNotFound,
            format!("Questions not found: {}", missing.join(", ")),
        )));
    }
    Ok(())
}
