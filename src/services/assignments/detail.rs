use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AssignmentService;
use super::access::load_assignment_access;
use crate::models::ApiResponse;
use crate::models::assignments::responses::AssignmentDetailResponse;

pub async fn get_assignment(
    service: &AssignmentService,
    request: &HttpRequest,
    assignment_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let access = match load_assignment_access(&storage, request, assignment_id).await {
        Ok(access) => access,
        Err(resp) => return Ok(resp),
    };

    let mut questions = match storage.list_assignment_questions(assignment_id).await {
        Ok(questions) => questions,
        Err(e) => {
            return Ok(crate::services::internal_error(format!(
                "Failed to load assignment questions: {e}"
            )));
        }
    };

    // 学生在反馈发布前看不到参考答案
    if !access.is_owner() && !access.assignment.feedback_released {
        for item in &mut questions {
            item.question.answer_key = None;
        }
    }

    let total_marks = questions.iter().map(|q| q.question.marks).sum::<f64>();
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        AssignmentDetailResponse {
            assignment: access.assignment,
            questions,
            total_marks,
        },
        "Assignment retrieved successfully",
    )))
}
