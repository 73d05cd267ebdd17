use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::MarkingService;
use crate::models::answer_records::responses::MarkListResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::assignments::access::load_assignment_access;

pub async fn list_marks(
    service: &MarkingService,
    request: &HttpRequest,
    assignment_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let access = match load_assignment_access(&storage, request, assignment_id).await {
        Ok(access) => access,
        Err(resp) => return Ok(resp),
    };

    // 学生在反馈发布后只能看自己的得分
    if !access.is_owner() && !access.assignment.feedback_released {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::FeedbackNotReleased,
            "Marks have not been released yet",
        )));
    }

    match storage.list_answer_records(assignment_id).await {
        Ok(mut items) => {
            if !access.is_owner() {
                items.retain(|r| r.record.student_id == access.profile.id);
            }
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                MarkListResponse {
                    assignment_id,
                    items,
                },
                "Marks retrieved successfully",
            )))
        }
        Err(e) => Ok(crate::services::internal_error(format!(
            "Failed to load marks: {e}"
        ))),
    }
}
