use std::collections::{HashMap, HashSet};

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info};

use super::MarkingService;
use crate::models::answer_records::{
    entities::AnswerRecord,
    requests::{MarkEntry, SaveMarksRequest},
    responses::SaveMarksResponse,
};
use crate::models::assignments::entities::AssignmentQuestion;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::assignments::access::load_assignment_access;
use crate::utils::validate::validate_awarded_marks;

pub async fn save_marks(
    service: &MarkingService,
    request: &HttpRequest,
    assignment_id: i64,
    body: SaveMarksRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let access = match load_assignment_access(&storage, request, assignment_id).await {
        Ok(access) => access,
        Err(resp) => return Ok(resp),
    };
    if let Err(resp) = access.require_owner() {
        return Ok(resp);
    }

    // 学生必须在班级中
    match storage
        .get_class_member(access.class.id, body.student_id)
        .await
    {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::StudentNotEnrolled,
                "Student is not enrolled in this class",
            )));
        }
        Err(e) => {
            return Ok(crate::services::internal_error(format!(
                "Failed to check enrolment: {e}"
            )));
        }
    }

    let questions = match storage.list_assignment_questions(assignment_id).await {
        Ok(questions) => questions,
        Err(e) => {
            return Ok(crate::services::internal_error(format!(
                "Failed to load assignment questions: {e}"
            )));
        }
    };

    let records = match build_answer_records(assignment_id, body.student_id, &body.marks, &questions)
    {
        Ok(records) => records,
        Err((code, msg)) => {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(code, msg)));
        }
    };

    let total_awarded = records.iter().map(|r| r.marks_awarded).sum::<f64>();
    let total_available = records.iter().map(|r| r.marks_available).sum::<f64>();

    match storage
        .save_answer_records(assignment_id, body.student_id, access.profile.id, records)
        .await
    {
        Ok(records_saved) => {
            info!(
                "Saved {} marks for student {} on assignment {} ({}/{})",
                records_saved, body.student_id, assignment_id, total_awarded, total_available
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                SaveMarksResponse {
                    assignment_id,
                    student_id: body.student_id,
                    records_saved,
                    total_awarded,
                    total_available,
                },
                "Marks saved successfully",
            )))
        }
        Err(e) => {
            error!("Failed to save marks: {}", e);
            Ok(crate::services::internal_error("Failed to save marks"))
        }
    }
}

/// 校验评分并从题目快照出评分记录
///
/// 每道题都必须属于该作业、不能重复，得分在 0 到题目分值之间。
pub(crate) fn build_answer_records(
    assignment_id: i64,
    student_id: i64,
    entries: &[MarkEntry],
    questions: &[AssignmentQuestion],
) -> Result<Vec<AnswerRecord>, (ErrorCode, String)> {
    if entries.is_empty() {
        return Err((ErrorCode::BadRequest, "No marks given".to_string()));
    }

    let by_id: HashMap<i64, &AssignmentQuestion> =
        questions.iter().map(|q| (q.question.id, q)).collect();
    let mut seen = HashSet::new();
    let mut records = Vec::with_capacity(entries.len());

    for entry in entries {
        if !seen.insert(entry.question_id) {
            return Err((
                ErrorCode::BadRequest,
                format!("Question {} is marked twice", entry.question_id),
            ));
        }
        let Some(item) = by_id.get(&entry.question_id) else {
            return Err((
                ErrorCode::QuestionNotInAssignment,
                format!("Question {} is not part of this assignment", entry.question_id),
            ));
        };
        let question = &item.question;
        if let Err(msg) = validate_awarded_marks(entry.marks_awarded, question.marks) {
            return Err((
                ErrorCode::MarkInvalid,
                format!("Question {}: {msg}", question.id),
            ));
        }

        records.push(AnswerRecord {
            student_id,
            assignment_id,
            question_id: question.id,
            topic: question.topic.trim().to_string(),
            sub_topic: question.sub_topic.clone(),
            marks_awarded: entry.marks_awarded,
            marks_available: question.marks,
        });
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::questions::entities::{Difficulty, Question, QuestionContentType};

    fn item(id: i64, topic: &str, marks: f64) -> AssignmentQuestion {
        let now = chrono::Utc::now();
        AssignmentQuestion {
            position: id as i32,
            question: Question {
                id,
                created_by: Some(1),
                content_type: QuestionContentType::Manual,
                question_latex: format!("Q{id}"),
                image_url: None,
                topic: format!(" {topic} "),
                sub_topic: Some("Linear equations".into()),
                difficulty: Difficulty::Foundation,
                marks,
                answer_key: None,
                is_verified: true,
                created_at: now,
                updated_at: now,
            },
        }
    }

    fn mark(question_id: i64, marks_awarded: f64) -> MarkEntry {
        MarkEntry {
            question_id,
            marks_awarded,
        }
    }

    #[test]
    fn test_build_records_snapshots_question() {
        let questions = vec![item(1, "Algebra", 4.0), item(2, "Geometry", 3.0)];
        let records =
            build_answer_records(9, 5, &[mark(1, 3.0), mark(2, 0.0)], &questions).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].topic, "Algebra");
        assert_eq!(records[0].marks_available, 4.0);
        assert_eq!(records[0].student_id, 5);
        assert_eq!(records[1].assignment_id, 9);
        assert_eq!(records[1].sub_topic.as_deref(), Some("Linear equations"));
    }

    #[test]
    fn test_build_records_rejects_bad_input() {
        let questions = vec![item(1, "Algebra", 4.0)];

        let (code, _) = build_answer_records(9, 5, &[], &questions).unwrap_err();
        assert_eq!(code, ErrorCode::BadRequest);

        let (code, _) = build_answer_records(9, 5, &[mark(2, 1.0)], &questions).unwrap_err();
        assert_eq!(code, ErrorCode::QuestionNotInAssignment);

        let (code, _) = build_answer_records(9, 5, &[mark(1, 5.0)], &questions).unwrap_err();
        assert_eq!(code, ErrorCode::MarkInvalid);

        let (code, _) = build_answer_records(9, 5, &[mark(1, -1.0)], &questions).unwrap_err();
        assert_eq!(code, ErrorCode::MarkInvalid);

        let (code, _) =
            build_answer_records(9, 5, &[mark(1, 1.0), mark(1, 2.0)], &questions).unwrap_err();
        assert_eq!(code, ErrorCode::BadRequest);
    }

    #[test]
    fn test_full_marks_allowed() {
        let questions = vec![item(1, "Algebra", 4.0)];
        assert!(build_answer_records(9, 5, &[mark(1, 4.0)], &questions).is_ok());
    }
}
