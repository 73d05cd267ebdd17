pub mod ai;
pub mod assignments;
pub mod class_members;
pub mod classes;
pub mod feedback;
pub mod marking;
pub mod profiles;
pub mod questions;
pub mod revision_lists;
pub mod submissions;

pub use ai::AiService;
pub use assignments::AssignmentService;
pub use class_members::ClassMemberService;
pub use classes::ClassService;
pub use feedback::FeedbackService;
pub use marking::MarkingService;
pub use profiles::ProfileService;
pub use questions::QuestionService;
pub use revision_lists::RevisionListService;
pub use submissions::SubmissionService;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use std::sync::Arc;

use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;

// 从 app data 中取存储，服务未注入存储时使用
pub(crate) fn storage_from_request(request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
    request
        .app_data::<web::Data<Arc<dyn Storage>>>()
        .map(|s| s.get_ref().clone())
        .ok_or_else(|| actix_web::error::ErrorInternalServerError("Storage not configured"))
}

pub(crate) fn missing_profile() -> HttpResponse {
    HttpResponse::Unauthorized().json(ApiResponse::error_empty(
        ErrorCode::Unauthorized,
        "Unauthorized: missing profile",
    ))
}

pub(crate) fn internal_error(message: impl Into<String>) -> HttpResponse {
    HttpResponse::InternalServerError().json(ApiResponse::error_empty(
        ErrorCode::InternalServerError,
        message,
    ))
}
