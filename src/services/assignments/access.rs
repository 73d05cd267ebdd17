//! 作业访问控制：按作业找到班级，再判断当前用户在班级中的身份

use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse};
use tracing::error;

use crate::middlewares::{RequireJWT, require_class_role::resolve_class_role};
use crate::models::{
    ApiResponse, ErrorCode,
    assignments::entities::Assignment,
    classes::entities::{Class, ClassRole},
    profiles::entities::Profile,
};
use crate::storage::Storage;

pub(crate) struct AssignmentAccess {
    pub profile: Profile,
    pub assignment: Assignment,
    pub class: Class,
    pub role: ClassRole,
}

impl AssignmentAccess {
    pub fn is_owner(&self) -> bool {
        self.role == ClassRole::Owner
    }

    /// 只有班级所属教师（或管理员）可以继续
    pub fn require_owner(&self) -> Result<(), HttpResponse> {
        if self.is_owner() {
            Ok(())
        } else {
            Err(HttpResponse::Forbidden().json(ApiResponse::error_empty(
                ErrorCode::ClassPermissionDenied,
                "Only the class teacher can do this",
            )))
        }
    }
}

/// 加载作业及当前用户的班级身份
///
/// 学生看不到草稿作业，按不存在处理。
pub(crate) async fn load_assignment_access(
    storage: &Arc<dyn Storage>,
    request: &HttpRequest,
    assignment_id: i64,
) -> Result<AssignmentAccess, HttpResponse> {
    let profile = RequireJWT::extract_profile(request).ok_or_else(crate::services::missing_profile)?;

    let not_found = || {
        HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::AssignmentNotFound,
            "Assignment not found",
        ))
    };

    let assignment = match storage.get_assignment_by_id(assignment_id).await {
        Ok(Some(assignment)) => assignment,
        Ok(None) => return Err(not_found()),
        Err(e) => {
            error!("Failed to load assignment {}: {}", assignment_id, e);
            return Err(crate::services::internal_error("Failed to load assignment"));
        }
    };

    let class = match storage.get_class_by_id(assignment.class_id).await {
        Ok(Some(class)) => class,
        Ok(None) => {
            return Err(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::ClassNotFound,
                "Class not found",
            )));
        }
        Err(e) => {
            error!("Failed to load class {}: {}", assignment.class_id, e);
            return Err(crate::services::internal_error("Failed to load class"));
        }
    };

    let role = match resolve_class_role(storage, &profile, &class).await {
        Ok(Some(role)) => role,
        Ok(None) => {
            return Err(HttpResponse::Forbidden().json(ApiResponse::error_empty(
                ErrorCode::ClassPermissionDenied,
                "You are not a member of this class",
            )));
        }
        Err(e) => {
            error!("Failed to resolve class role: {}", e);
            return Err(crate::services::internal_error(
                "Failed to check class membership",
            ));
        }
    };

    if role == ClassRole::Student && !assignment.is_published() {
        return Err(not_found());
    }

    Ok(AssignmentAccess {
        profile,
        assignment,
        class,
        role,
    })
}
