use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::access::load_assignment_access;
use super::{AssignmentService, check_question_ids};
use crate::models::ApiResponse;
use crate::models::assignments::requests::SetAssignmentQuestionsRequest;

pub async fn set_questions(
    service: &AssignmentService,
    request: &HttpRequest,
    assignment_id: i64,
    body: SetAssignmentQuestionsRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let access = match load_assignment_access(&storage, request, assignment_id).await {
        Ok(access) => access,
        Err(resp) => return Ok(resp),
    };
    if let Err(resp) = access.require_owner() {
        return Ok(resp);
    }
    if let Err(resp) = check_question_ids(&storage, &body.question_ids).await {
        return Ok(resp);
    }

    match storage
        .set_assignment_questions(assignment_id, &body.question_ids)
        .await
    {
        Ok(questions) => {
            info!(
                "Assignment {} now has {} questions",
                assignment_id,
                questions.len()
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                questions,
                "Assignment questions updated successfully",
            )))
        }
        Err(e) => Ok(crate::services::internal_error(format!(
            "Failed to update assignment questions: {e}"
        ))),
    }
}
