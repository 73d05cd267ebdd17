use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{debug, error};

use super::{RevisionListService, revision_list_not_found};
use crate::middlewares::RequireJWT;
use crate::models::revision_lists::requests::UpdateRevisionProgressRequest;
use crate::models::{ApiResponse, ErrorCode};

pub async fn update_progress(
    service: &RevisionListService,
    request: &HttpRequest,
    revision_list_id: i64,
    body: UpdateRevisionProgressRequest,
) -> ActixResult<HttpResponse> {
    let Some(profile) = RequireJWT::extract_profile(request) else {
        return Ok(crate::services::missing_profile());
    };

    let storage = service.get_storage(request)?;
    match storage
        .get_revision_allocation(revision_list_id, profile.id)
        .await
    {
        Ok(Some(_)) => {}
        Ok(None) => return Ok(revision_list_not_found()),
        Err(e) => {
            return Ok(crate::services::internal_error(format!(
                "Failed to load revision progress: {e}"
            )));
        }
    }

    match storage.list_revision_list_questions(revision_list_id).await {
        Ok(questions) if questions.iter().any(|q| q.question.id == body.question_id) => {}
        Ok(_) => {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::QuestionNotInRevisionList,
                format!(
                    "Question {} is not part of this revision list",
                    body.question_id
                ),
            )));
        }
        Err(e) => {
            return Ok(crate::services::internal_error(format!(
                "Failed to load revision list questions: {e}"
            )));
        }
    }

    match storage
        .update_revision_progress(
            revision_list_id,
            profile.id,
            body.question_id,
            body.completed,
        )
        .await
    {
        Ok(Some(allocation)) => {
            debug!(
                "Revision list {} progress of {}: {}",
                revision_list_id, profile.id, allocation.status
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                allocation,
                "Progress updated successfully",
            )))
        }
        Ok(None) => Ok(revision_list_not_found()),
        Err(e) => {
            error!("Failed to update revision progress: {}", e);
            Ok(crate::services::internal_error("Failed to update progress"))
        }
    }
}
