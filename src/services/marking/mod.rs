pub mod list;
pub mod save;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::answer_records::requests::SaveMarksRequest;
use crate::storage::Storage;

pub struct MarkingService {
    storage: Option<Arc<dyn Storage>>,
}

impl MarkingService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    // 为一名学生保存评分
    pub async fn save_marks(
        &self,
        request: &HttpRequest,
        assignment_id: i64,
        body: SaveMarksRequest,
    ) -> ActixResult<HttpResponse> {
        save::save_marks(self, request, assignment_id, body).await
    }

    // 作业下的评分记录
    pub async fn list_marks(
        &self,
        request: &HttpRequest,
        assignment_id: i64,
    ) -> ActixResult<HttpResponse> {
        list::list_marks(self, request, assignment_id).await
    }
}
