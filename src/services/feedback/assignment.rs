use std::collections::HashMap;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{debug, error};

use super::{FeedbackService, student_ref};
use crate::feedback::{group_records_by_student, summarize_assignment};
use crate::models::feedback::responses::AssignmentFeedbackResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::assignments::access::load_assignment_access;

pub async fn assignment_feedback(
    service: &FeedbackService,
    request: &HttpRequest,
    assignment_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let access = match load_assignment_access(&storage, request, assignment_id).await {
        Ok(access) => access,
        Err(resp) => return Ok(resp),
    };
    if let Err(resp) = access.require_owner() {
        return Ok(resp);
    }

    let records = match storage.list_answer_records(assignment_id).await {
        Ok(graded) => graded.into_iter().map(|g| g.record).collect::<Vec<_>>(),
        Err(e) => {
            error!("Failed to load answer records for {}: {}", assignment_id, e);
            return Ok(crate::services::internal_error("Failed to load marks"));
        }
    };

    let per_student = group_records_by_student(records);
    let summary = match summarize_assignment(&per_student) {
        Ok(summary) => summary,
        Err(e) if e.is_no_data() => {
            debug!("Assignment {} has no graded submissions", assignment_id);
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::FeedbackNoData,
                "No graded submissions yet",
            )));
        }
        Err(e) => {
            return Ok(crate::services::internal_error(format!(
                "Failed to summarise feedback: {e}"
            )));
        }
    };

    let student_ids: Vec<i64> = summary
        .student_feedback
        .iter()
        .map(|s| s.student_id)
        .collect();
    let profiles = match storage.get_profiles_by_ids(&student_ids).await {
        Ok(profiles) => profiles,
        Err(e) => {
            return Ok(crate::services::internal_error(format!(
                "Failed to load students: {e}"
            )));
        }
    };
    let by_id: HashMap<i64, _> = profiles.iter().map(|p| (p.id, p)).collect();
    let students = student_ids
        .iter()
        .map(|id| student_ref(*id, by_id.get(id).copied()))
        .collect();

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        AssignmentFeedbackResponse {
            assignment_id,
            assignment_title: access.assignment.title,
            feedback_released: access.assignment.feedback_released,
            students,
            summary,
        },
        "Assignment feedback retrieved successfully",
    )))
}
