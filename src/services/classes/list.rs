use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ClassService;
use crate::{
    middlewares::RequireJWT,
    models::{
        ApiResponse,
        classes::requests::{ClassListQuery, ClassQueryParams},
        profiles::entities::ProfileRole,
    },
};

pub async fn list_classes(
    service: &ClassService,
    request: &HttpRequest,
    query: ClassQueryParams,
) -> ActixResult<HttpResponse> {
    let Some(profile) = RequireJWT::extract_profile(request) else {
        return Ok(crate::services::missing_profile());
    };
    let storage = service.get_storage(request)?;

    let mut list_query = ClassListQuery {
        pagination: query.pagination,
        search: query.search,
        ..Default::default()
    };

    match profile.role {
        // 管理员可查全部班级
        ProfileRole::Admin => {}
        // 教师只看自己的班级
        ProfileRole::Teacher => list_query.teacher_id = Some(profile.id),
        // 学生只看已加入的班级
        ProfileRole::Student => list_query.student_id = Some(profile.id),
    }

    match storage.list_classes_with_pagination(list_query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Class list retrieved successfully",
        ))),
        Err(e) => Ok(crate::services::internal_error(format!(
            "Failed to retrieve class list: {e}"
        ))),
    }
}
