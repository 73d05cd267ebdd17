use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info};

use super::RevisionListService;
use crate::errors::TutorError;
use crate::models::revision_lists::requests::{CreateRevisionListBody, CreateRevisionListRequest};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::assignments::access::load_assignment_access;
use crate::services::assignments::{MAX_TITLE_LEN, check_question_ids};
use crate::utils::validate::validate_name;

pub async fn create_revision_list(
    service: &RevisionListService,
    request: &HttpRequest,
    assignment_id: i64,
    body: CreateRevisionListBody,
) -> ActixResult<HttpResponse> {
    if let Err(msg) = validate_name(&body.title, MAX_TITLE_LEN) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            msg,
        )));
    }
    if body.question_ids.is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "At least one question must be included",
        )));
    }

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
        .create_revision_list(CreateRevisionListRequest {
            assignment_id,
            class_id: access.class.id,
            title: body.title,
            description: body.description,
            question_ids: body.question_ids,
            created_by: access.profile.id,
        })
        .await
    {
        Ok(created) => {
            info!(
                "Revision list {} created for assignment {}: {} questions, {} students",
                created.revision_list.id,
                assignment_id,
                created.question_count,
                created.students_allocated
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                created,
                "Revision list created successfully",
            )))
        }
        Err(TutorError::Conflict(_)) => Ok(HttpResponse::Conflict().json(
            ApiResponse::error_empty(
                ErrorCode::RevisionListExists,
                "This assignment already has a revision list",
            ),
        )),
        Err(e) => {
            error!("Failed to create revision list: {}", e);
            Ok(crate::services::internal_error(
                "Failed to create revision list",
            ))
        }
    }
}
