use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::FeedbackService;
use crate::models::assignments::requests::ReleaseFeedbackRequest;
use crate::models::feedback::responses::FeedbackReleaseResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::assignments::access::load_assignment_access;

pub async fn release_feedback(
    service: &FeedbackService,
    request: &HttpRequest,
    assignment_id: i64,
    body: ReleaseFeedbackRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let access = match load_assignment_access(&storage, request, assignment_id).await {
        Ok(access) => access,
        Err(resp) => return Ok(resp),
    };
    if let Err(resp) = access.require_owner() {
        return Ok(resp);
    }

    match storage
        .set_feedback_released(assignment_id, body.released)
        .await
    {
        Ok(Some(assignment)) => {
            info!(
                "Feedback for assignment {} in class {} {}",
                assignment.id,
                access.class.name,
                if assignment.feedback_released {
                    "released"
                } else {
                    "withdrawn"
                }
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                FeedbackReleaseResponse {
                    assignment_id: assignment.id,
                    feedback_released: assignment.feedback_released,
                },
                "Feedback release updated",
            )))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::AssignmentNotFound,
            "Assignment not found",
        ))),
        Err(e) => Ok(crate::services::internal_error(format!(
            "Failed to update feedback release: {e}"
        ))),
    }
}
