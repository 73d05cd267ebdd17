use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::answer_records::requests::SaveMarksRequest;
use crate::models::assignments::requests::{
    AssignmentQueryParams, CreateAssignmentRequest, ReleaseFeedbackRequest,
    SetAssignmentQuestionsRequest, UpdateAssignmentRequest,
};
use crate::models::profiles::entities::ProfileRole;
use crate::models::revision_lists::requests::CreateRevisionListBody;
use crate::models::submissions::requests::SubmitAssignmentRequest;
use crate::services::{
    AssignmentService, FeedbackService, MarkingService, RevisionListService, SubmissionService,
};
use crate::utils::{SafeAssignmentIdI64, SafeStudentIdI64};

// 懒加载的全局服务实例
static ASSIGNMENT_SERVICE: Lazy<AssignmentService> = Lazy::new(AssignmentService::new_lazy);
static MARKING_SERVICE: Lazy<MarkingService> = Lazy::new(MarkingService::new_lazy);
static FEEDBACK_SERVICE: Lazy<FeedbackService> = Lazy::new(FeedbackService::new_lazy);
static SUBMISSION_SERVICE: Lazy<SubmissionService> = Lazy::new(SubmissionService::new_lazy);
static REVISION_LIST_SERVICE: Lazy<RevisionListService> =
    Lazy::new(RevisionListService::new_lazy);

// HTTP处理程序
pub async fn list_assignments(
    req: HttpRequest,
    query: web::Query<AssignmentQueryParams>,
) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE
        .list_assignments(&req, query.into_inner())
        .await
}

pub async fn create_assignment(
    req: HttpRequest,
    assignment: web::Json<CreateAssignmentRequest>,
) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE
        .create_assignment(&req, assignment.into_inner())
        .await
}

pub async fn get_assignment(
    req: HttpRequest,
    assignment_id: SafeAssignmentIdI64,
) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE
        .get_assignment(&req, assignment_id.0)
        .await
}

pub async fn update_assignment(
    req: HttpRequest,
    assignment_id: SafeAssignmentIdI64,
    update: web::Json<UpdateAssignmentRequest>,
) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE
        .update_assignment(&req, assignment_id.0, update.into_inner())
        .await
}

pub async fn delete_assignment(
    req: HttpRequest,
    assignment_id: SafeAssignmentIdI64,
) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE
        .delete_assignment(&req, assignment_id.0)
        .await
}

pub async fn set_questions(
    req: HttpRequest,
    assignment_id: SafeAssignmentIdI64,
    body: web::Json<SetAssignmentQuestionsRequest>,
) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE
        .set_questions(&req, assignment_id.0, body.into_inner())
        .await
}

pub async fn save_marks(
    req: HttpRequest,
    assignment_id: SafeAssignmentIdI64,
    body: web::Json<SaveMarksRequest>,
) -> ActixResult<HttpResponse> {
    MARKING_SERVICE
        .save_marks(&req, assignment_id.0, body.into_inner())
        .await
}

pub async fn list_marks(
    req: HttpRequest,
    assignment_id: SafeAssignmentIdI64,
) -> ActixResult<HttpResponse> {
    MARKING_SERVICE.list_marks(&req, assignment_id.0).await
}

pub async fn assignment_feedback(
    req: HttpRequest,
    assignment_id: SafeAssignmentIdI64,
) -> ActixResult<HttpResponse> {
    FEEDBACK_SERVICE
        .assignment_feedback(&req, assignment_id.0)
        .await
}

pub async fn student_feedback(
    req: HttpRequest,
    assignment_id: SafeAssignmentIdI64,
    student_id: SafeStudentIdI64,
) -> ActixResult<HttpResponse> {
    FEEDBACK_SERVICE
        .student_feedback(&req, assignment_id.0, student_id.0)
        .await
}

pub async fn release_feedback(
    req: HttpRequest,
    assignment_id: SafeAssignmentIdI64,
    body: web::Json<ReleaseFeedbackRequest>,
) -> ActixResult<HttpResponse> {
    FEEDBACK_SERVICE
        .release_feedback(&req, assignment_id.0, body.into_inner())
        .await
}

pub async fn submit_assignment(
    req: HttpRequest,
    assignment_id: SafeAssignmentIdI64,
    body: web::Json<SubmitAssignmentRequest>,
) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE
        .submit(&req, assignment_id.0, body.into_inner())
        .await
}

pub async fn get_own_submission(
    req: HttpRequest,
    assignment_id: SafeAssignmentIdI64,
) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE.get_own(&req, assignment_id.0).await
}

pub async fn list_submissions(
    req: HttpRequest,
    assignment_id: SafeAssignmentIdI64,
) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE.list(&req, assignment_id.0).await
}

pub async fn create_revision_list(
    req: HttpRequest,
    assignment_id: SafeAssignmentIdI64,
    body: web::Json<CreateRevisionListBody>,
) -> ActixResult<HttpResponse> {
    REVISION_LIST_SERVICE
        .create_revision_list(&req, assignment_id.0, body.into_inner())
        .await
}

pub async fn get_revision_list(
    req: HttpRequest,
    assignment_id: SafeAssignmentIdI64,
) -> ActixResult<HttpResponse> {
    REVISION_LIST_SERVICE
        .assignment_revision_list(&req, assignment_id.0)
        .await
}

pub async fn delete_revision_list(
    req: HttpRequest,
    assignment_id: SafeAssignmentIdI64,
) -> ActixResult<HttpResponse> {
    REVISION_LIST_SERVICE
        .delete_revision_list(&req, assignment_id.0)
        .await
}

// 配置路由
//
// 班级内的身份（教师/学生）在服务层按作业所属班级判断。
pub fn configure_assignments_routes(cfg: &mut web::ServiceConfig) {
    let teacher_only = || middlewares::RequireRole::new_any(ProfileRole::teacher_roles());

    cfg.service(
        web::scope("/api/v1/assignments")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_assignments))
                    .route(web::post().to(create_assignment).wrap(teacher_only())),
            )
            .service(
                web::resource("/{assignment_id}")
                    .route(web::get().to(get_assignment))
                    .route(web::put().to(update_assignment).wrap(teacher_only()))
                    .route(web::delete().to(delete_assignment).wrap(teacher_only())),
            )
            .service(
                web::resource("/{assignment_id}/questions")
                    .route(web::put().to(set_questions).wrap(teacher_only())),
            )
            .service(
                web::resource("/{assignment_id}/marks")
                    .route(web::get().to(list_marks))
                    .route(web::put().to(save_marks).wrap(teacher_only())),
            )
            .service(
                web::resource("/{assignment_id}/feedback")
                    .route(web::get().to(assignment_feedback).wrap(teacher_only())),
            )
            .service(
                web::resource("/{assignment_id}/feedback/students/{student_id}")
                    .route(web::get().to(student_feedback)),
            )
            .service(
                web::resource("/{assignment_id}/feedback/release")
                    .route(web::put().to(release_feedback).wrap(teacher_only())),
            )
            .service(
                web::resource("/{assignment_id}/submission")
                    .route(web::get().to(get_own_submission))
                    .route(web::post().to(submit_assignment)),
            )
            .service(
                web::resource("/{assignment_id}/submissions")
                    .route(web::get().to(list_submissions).wrap(teacher_only())),
            )
            .service(
                web::resource("/{assignment_id}/revision-list")
                    .route(web::get().to(get_revision_list).wrap(teacher_only()))
                    .route(web::post().to(create_revision_list).wrap(teacher_only()))
                    .route(web::delete().to(delete_revision_list).wrap(teacher_only())),
            ),
    );
}
