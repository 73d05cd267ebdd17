use std::collections::HashSet;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{debug, error};

use super::{FeedbackService, student_ref_or_bare};
use crate::config::AppConfig;
use crate::feedback::{RevisionLimits, build_revision_pack, summarize_student};
use crate::models::feedback::entities::{RagStatus, StudentFeedbackSummary};
use crate::models::feedback::responses::StudentFeedbackResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::assignments::access::{AssignmentAccess, load_assignment_access};

pub async fn student_feedback(
    service: &FeedbackService,
    request: &HttpRequest,
    assignment_id: i64,
    student_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let access = match load_assignment_access(&storage, request, assignment_id).await {
        Ok(access) => access,
        Err(resp) => return Ok(resp),
    };
    if let Err(resp) = check_student_access(&access, student_id) {
        return Ok(resp);
    }

    let records = match storage
        .list_student_answer_records(assignment_id, student_id)
        .await
    {
        Ok(records) => records,
        Err(e) => {
            error!("Failed to load marks for student {}: {}", student_id, e);
            return Ok(crate::services::internal_error("Failed to load marks"));
        }
    };

    let summary = match summarize_student(&records) {
        Ok(summary) => summary,
        Err(e) if e.is_no_data() => {
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

    // 复习包：从题库挑选薄弱主题的题目，跳过本次作业已有的题
    let topics = revision_topics(&summary);
    let revision_pack = if topics.is_empty() {
        Vec::new()
    } else {
        let candidates = storage.list_questions_by_topics(&topics).await;
        let in_assignment = storage.list_assignment_questions(assignment_id).await;
        match (candidates, in_assignment) {
            (Ok(candidates), Ok(in_assignment)) => {
                let exclude: HashSet<i64> =
                    in_assignment.iter().map(|q| q.question.id).collect();
                let limits = RevisionLimits::from(&AppConfig::get().feedback);
                build_revision_pack(&summary, &candidates, &exclude, limits)
            }
            (Err(e), _) | (_, Err(e)) => {
                return Ok(crate::services::internal_error(format!(
                    "Failed to build revision pack: {e}"
                )));
            }
        }
    };
    debug!(
        "Student {} on assignment {}: {} revision questions",
        student_id,
        assignment_id,
        revision_pack.len()
    );

    let student = student_ref_or_bare(student_id, storage.get_profile_by_id(student_id).await);

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        StudentFeedbackResponse {
            assignment_id,
            assignment_title: access.assignment.title,
            student,
            summary,
            revision_pack,
        },
        "Student feedback retrieved successfully",
    )))
}

/// 班级教师可看任意学生；学生只能在反馈发布后看自己的
fn check_student_access(access: &AssignmentAccess, student_id: i64) -> Result<(), HttpResponse> {
    if access.is_owner() {
        return Ok(());
    }
    if access.profile.id != student_id {
        return Err(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::Forbidden,
            "You can only view your own feedback",
        )));
    }
    if !access.assignment.feedback_released {
        return Err(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::FeedbackNotReleased,
            "Feedback has not been released yet",
        )));
    }
    Ok(())
}

/// 需要复习的主题（子主题未达绿色），保持首次出现顺序
fn revision_topics(summary: &StudentFeedbackSummary) -> Vec<String> {
    let mut topics: Vec<String> = Vec::new();
    for sub in &summary.sub_topic_breakdown {
        if sub.status != RagStatus::Green && !topics.contains(&sub.topic) {
            topics.push(sub.topic.clone());
        }
    }
    topics
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::answer_records::entities::AnswerRecord;

    fn record(question_id: i64, topic: &str, sub_topic: &str, awarded: f64) -> AnswerRecord {
        AnswerRecord {
            student_id: 3,
            assignment_id: 1,
            question_id,
            topic: topic.to_string(),
            sub_topic: Some(sub_topic.to_string()),
            marks_awarded: awarded,
            marks_available: 10.0,
        }
    }

    #[test]
    fn test_revision_topics_skip_green() {
        let summary = summarize_student(&[
            record(1, "Algebra", "Expanding brackets", 9.0),
            record(2, "Algebra", "Factorising", 3.0),
            record(3, "Geometry", "Angles", 8.0),
            record(4, "Number", "Fractions", 5.0),
        ])
        .unwrap();

        assert_eq!(revision_topics(&summary), vec!["Algebra", "Number"]);
    }
}
