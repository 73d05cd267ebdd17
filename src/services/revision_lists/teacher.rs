use std::collections::HashMap;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info, warn};

use super::{RevisionListService, revision_list_not_found};
use crate::models::ApiResponse;
use crate::models::profiles::entities::Profile;
use crate::models::revision_lists::{
    entities::RevisionAllocation,
    responses::{AssignmentRevisionListResponse, StudentRevisionProgress},
};
use crate::services::assignments::access::load_assignment_access;

pub async fn assignment_revision_list(
    service: &RevisionListService,
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

    let list = match storage.get_revision_list_by_assignment(assignment_id).await {
        Ok(Some(list)) => list,
        Ok(None) => return Ok(revision_list_not_found()),
        Err(e) => {
            error!("Failed to load revision list of {}: {}", assignment_id, e);
            return Ok(crate::services::internal_error("Failed to load revision list"));
        }
    };

    let question_count = match storage.list_revision_list_questions(list.id).await {
        Ok(questions) => questions.len(),
        Err(e) => {
            return Ok(crate::services::internal_error(format!(
                "Failed to load revision list questions: {e}"
            )));
        }
    };
    let allocations = match storage.list_revision_allocations(list.id).await {
        Ok(allocations) => allocations,
        Err(e) => {
            return Ok(crate::services::internal_error(format!(
                "Failed to load revision progress: {e}"
            )));
        }
    };

    let student_ids: Vec<i64> = allocations.iter().map(|a| a.student_id).collect();
    // 姓名只用于展示，查不到时仍返回进度
    let profiles = storage
        .get_profiles_by_ids(&student_ids)
        .await
        .unwrap_or_else(|e| {
            warn!("Failed to load student profiles: {}", e);
            Vec::new()
        });

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        AssignmentRevisionListResponse {
            revision_list: list,
            question_count,
            students: student_progress(allocations, &profiles, question_count),
        },
        "Revision list retrieved successfully",
    )))
}

pub async fn delete_revision_list(
    service: &RevisionListService,
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

    let list = match storage.get_revision_list_by_assignment(assignment_id).await {
        Ok(Some(list)) => list,
        Ok(None) => return Ok(revision_list_not_found()),
        Err(e) => {
            error!("Failed to load revision list of {}: {}", assignment_id, e);
            return Ok(crate::services::internal_error("Failed to load revision list"));
        }
    };

    match storage.delete_revision_list(list.id).await {
        Ok(true) => {
            info!("Revision list {} deleted", list.id);
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
                "Revision list deleted successfully",
            )))
        }
        Ok(false) => Ok(revision_list_not_found()),
        Err(e) => {
            error!("Failed to delete revision list {}: {}", list.id, e);
            Ok(crate::services::internal_error(
                "Failed to delete revision list",
            ))
        }
    }
}

/// 每名学生的完成数，顺序与分配顺序一致
pub(crate) fn student_progress(
    allocations: Vec<RevisionAllocation>,
    profiles: &[Profile],
    total: usize,
) -> Vec<StudentRevisionProgress> {
    let by_id: HashMap<i64, &Profile> = profiles.iter().map(|p| (p.id, p)).collect();
    allocations
        .into_iter()
        .map(|a| {
            let profile = by_id.get(&a.student_id);
            StudentRevisionProgress {
                student_id: a.student_id,
                full_name: profile.and_then(|p| p.full_name.clone()),
                email: profile.map(|p| p.email.clone()),
                status: a.status,
                completed: a.completed_question_ids.len(),
                total,
                started_at: a.started_at,
                completed_at: a.completed_at,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::profiles::entities::ProfileRole;
    use crate::models::revision_lists::entities::RevisionStatus;

    fn allocation(student_id: i64, done: Vec<i64>, status: RevisionStatus) -> RevisionAllocation {
        RevisionAllocation {
            id: student_id * 10,
            revision_list_id: 1,
            student_id,
            status,
            started_at: None,
            completed_at: None,
            completed_question_ids: done,
        }
    }

    #[test]
    fn test_student_progress_counts_and_names() {
        let now = chrono::Utc::now();
        let profiles = vec![Profile {
            id: 4,
            auth_uid: "uid-4".to_string(),
            email: "dee@example.com".to_string(),
            full_name: Some("Dee".to_string()),
            role: ProfileRole::Student,
            created_at: now,
            updated_at: now,
        }];
        let rows = student_progress(
            vec![
                allocation(4, vec![11, 12], RevisionStatus::InProgress),
                allocation(5, vec![], RevisionStatus::Pending),
            ],
            &profiles,
            3,
        );

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].full_name.as_deref(), Some("Dee"));
        assert_eq!(rows[0].completed, 2);
        assert_eq!(rows[0].total, 3);
        assert_eq!(rows[0].status, RevisionStatus::InProgress);
        assert_eq!(rows[1].student_id, 5);
        assert!(rows[1].email.is_none());
        assert_eq!(rows[1].completed, 0);
    }
}
