use std::collections::HashSet;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info};

use super::SubmissionService;
use crate::errors::TutorError;
use crate::models::assignments::entities::AssignmentQuestion;
use crate::models::submissions::{
    entities::SubmittedAnswer,
    requests::{CreateSubmissionRequest, SubmitAssignmentRequest},
};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::assignments::access::load_assignment_access;

/// 单题作答的最大字符数
pub const MAX_ANSWER_LEN: usize = 5000;

pub async fn submit_assignment(
    service: &SubmissionService,
    request: &HttpRequest,
    assignment_id: i64,
    body: SubmitAssignmentRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    // 学生看不到草稿作业，这里拿到的一定是已发布的作业
    let access = match load_assignment_access(&storage, request, assignment_id).await {
        Ok(access) => access,
        Err(resp) => return Ok(resp),
    };
    if access.is_owner() {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::Forbidden,
            "Only enrolled students can submit",
        )));
    }
    if !access.assignment.is_published() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::AssignmentNotPublished,
            "Assignment is not published",
        )));
    }

    let questions = match storage.list_assignment_questions(assignment_id).await {
        Ok(questions) => questions,
        Err(e) => {
            return Ok(crate::services::internal_error(format!(
                "Failed to load assignment questions: {e}"
            )));
        }
    };

    let answers = match validate_submission(&body.answers, &questions) {
        Ok(answers) => answers,
        Err(msg) => {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::SubmissionInvalid,
                msg,
            )));
        }
    };

    match storage
        .create_submission(CreateSubmissionRequest {
            assignment_id,
            student_id: access.profile.id,
            answers,
        })
        .await
    {
        Ok(submission) => {
            info!(
                "Student {} submitted assignment {} ({} answers)",
                access.profile.id,
                assignment_id,
                submission.answers.len()
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                submission,
                "Assignment submitted successfully",
            )))
        }
        Err(TutorError::Conflict(_)) => Ok(HttpResponse::Conflict().json(
            ApiResponse::error_empty(
                ErrorCode::SubmissionAlreadyExists,
                "Assignment has already been submitted",
            ),
        )),
        Err(e) => {
            error!("Failed to create submission: {}", e);
            Ok(crate::services::internal_error("Failed to submit assignment"))
        }
    }
}

/// 校验作答：至少一题、不重复、题目属于作业、长度有限
///
/// 作答两端空白会被去掉，顺序保持和请求一致。
pub(crate) fn validate_submission(
    answers: &[SubmittedAnswer],
    questions: &[AssignmentQuestion],
) -> Result<Vec<SubmittedAnswer>, String> {
    if answers.is_empty() {
        return Err("No answers given".to_string());
    }

    let in_assignment: HashSet<i64> = questions.iter().map(|q| q.question.id).collect();
    let mut seen = HashSet::new();
    let mut cleaned = Vec::with_capacity(answers.len());

    for item in answers {
        if !seen.insert(item.question_id) {
            return Err(format!("Question {} is answered twice", item.question_id));
        }
        if !in_assignment.contains(&item.question_id) {
            return Err(format!(
                "Question {} is not part of this assignment",
                item.question_id
            ));
        }
        let answer = item.answer.trim();
        if answer.chars().count() > MAX_ANSWER_LEN {
            return Err(format!(
                "Answer to question {} exceeds {MAX_ANSWER_LEN} characters",
                item.question_id
            ));
        }
        cleaned.push(SubmittedAnswer {
            question_id: item.question_id,
            answer: answer.to_string(),
        });
    }

    Ok(cleaned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::questions::entities::{Difficulty, Question, QuestionContentType};

    fn question(id: i64) -> AssignmentQuestion {
        AssignmentQuestion {
            position: id as i32,
            question: Question {
                id,
                content_type: QuestionContentType::Manual,
                question_latex: format!("Q{id}"),
                image_url: None,
                topic: "Algebra".to_string(),
                sub_topic: None,
                difficulty: Difficulty::Foundation,
                marks: 2.0,
                answer_key: None,
                is_verified: true,
                created_by: None,
                created_at: chrono::Utc::now(),
                updated_at: chrono::Utc::now(),
            },
        }
    }

    fn answer(question_id: i64, text: &str) -> SubmittedAnswer {
        SubmittedAnswer {
            question_id,
            answer: text.to_string(),
        }
    }

    #[test]
    fn test_valid_answers_are_trimmed() {
        let questions = vec![question(1), question(2)];
        let cleaned =
            validate_submission(&[answer(2, " 12 "), answer(1, "x = 3\n")], &questions).unwrap();
        assert_eq!(cleaned, vec![answer(2, "12"), answer(1, "x = 3")]);
    }

    #[test]
    fn test_rejects_bad_answers() {
        let questions = vec![question(1), question(2)];
        assert!(validate_submission(&[], &questions).is_err());
        assert!(validate_submission(&[answer(1, "a"), answer(1, "b")], &questions).is_err());
        assert!(validate_submission(&[answer(9, "a")], &questions).is_err());

        let long = "7".repeat(MAX_ANSWER_LEN + 1);
        assert!(validate_submission(&[answer(1, &long)], &questions).is_err());
        let limit = "7".repeat(MAX_ANSWER_LEN);
        assert!(validate_submission(&[answer(1, &limit)], &questions).is_ok());
    }
}
