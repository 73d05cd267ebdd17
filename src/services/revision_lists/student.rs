use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::error;

use super::{RevisionListService, revision_list_not_found};
use crate::middlewares::RequireJWT;
use crate::models::ApiResponse;
use crate::models::revision_lists::{
    entities::{RevisionAllocation, RevisionListQuestion},
    responses::{RevisionListDetailResponse, StudentRevisionListsResponse},
};

pub async fn student_revision_lists(
    service: &RevisionListService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(profile) = RequireJWT::extract_profile(request) else {
        return Ok(crate::services::missing_profile());
    };

    let storage = service.get_storage(request)?;
    match storage.list_student_revision_lists(profile.id).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            StudentRevisionListsResponse { items },
            "Revision lists retrieved successfully",
        ))),
        Err(e) => {
            error!("Failed to load revision lists of {}: {}", profile.id, e);
            Ok(crate::services::internal_error(
                "Failed to load revision lists",
            ))
        }
    }
}

/// 学生打开一份分配给自己的清单，没有分配的清单按不存在处理
pub async fn revision_list_detail(
    service: &RevisionListService,
    request: &HttpRequest,
    revision_list_id: i64,
) -> ActixResult<HttpResponse> {
    let Some(profile) = RequireJWT::extract_profile(request) else {
        return Ok(crate::services::missing_profile());
    };

    let storage = service.get_storage(request)?;
    let allocation = match storage
        .get_revision_allocation(revision_list_id, profile.id)
        .await
    {
        Ok(Some(allocation)) => allocation,
        Ok(None) => return Ok(revision_list_not_found()),
        Err(e) => {
            return Ok(crate::services::internal_error(format!(
                "Failed to load revision progress: {e}"
            )));
        }
    };

    let revision_list = match storage.get_revision_list_by_id(revision_list_id).await {
        Ok(Some(list)) => list,
        Ok(None) => return Ok(revision_list_not_found()),
        Err(e) => {
            return Ok(crate::services::internal_error(format!(
                "Failed to load revision list: {e}"
            )));
        }
    };

    let questions = match storage.list_revision_list_questions(revision_list_id).await {
        Ok(questions) => mark_completed(questions, &allocation),
        Err(e) => {
            return Ok(crate::services::internal_error(format!(
                "Failed to load revision list questions: {e}"
            )));
        }
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        RevisionListDetailResponse {
            revision_list,
            allocation,
            questions,
        },
        "Revision list retrieved successfully",
    )))
}

pub(crate) fn mark_completed(
    questions: Vec<RevisionListQuestion>,
    allocation: &RevisionAllocation,
) -> Vec<RevisionListQuestion> {
    questions
        .into_iter()
        .map(|mut q| {
            q.completed = allocation.completed_question_ids.contains(&q.question.id);
            q
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::questions::entities::{Difficulty, Question, QuestionContentType};
    use crate::models::revision_lists::entities::RevisionStatus;

    fn item(position: i32, id: i64) -> RevisionListQuestion {
        let now = chrono::Utc::now();
        RevisionListQuestion {
            position,
            question: Question {
                id,
                created_by: None,
                content_type: QuestionContentType::GeneratedText,
                question_latex: format!("Simplify {id}x + x"),
                image_url: None,
                topic: "Algebra".to_string(),
                sub_topic: Some("Simplifying".to_string()),
                difficulty: Difficulty::Foundation,
                marks: 1.0,
                answer_key: None,
                is_verified: false,
                created_at: now,
                updated_at: now,
            },
            completed: false,
        }
    }

    #[test]
    fn test_mark_completed_keeps_order() {
        let allocation = RevisionAllocation {
            id: 1,
            revision_list_id: 3,
            student_id: 8,
            status: RevisionStatus::InProgress,
            started_at: Some(chrono::Utc::now()),
            completed_at: None,
            completed_question_ids: vec![22],
        };
        let marked = mark_completed(vec![item(1, 21), item(2, 22), item(3, 23)], &allocation);

        let flags: Vec<(i64, bool)> = marked.iter().map(|q| (q.question.id, q.completed)).collect();
        assert_eq!(flags, vec![(21, false), (22, true), (23, false)]);
    }
}
