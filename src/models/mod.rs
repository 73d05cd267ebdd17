//! 数据模型定义
//!
//! 按业务拆分为 `entities`（业务实体）、`requests`（请求体/查询参数）、`responses`（响应体）。

pub mod ai;
pub mod answer_records;
pub mod assignments;
pub mod class_members;
pub mod classes;
pub mod common;
pub mod feedback;
pub mod profiles;
pub mod questions;
pub mod revision_lists;
pub mod submissions;

pub use common::{ApiResponse, PaginatedResponse, PaginationInfo, PaginationQuery};

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 业务错误码，和前端共享
///
/// 0 为成功；1xxx 通用；2xxx 认证与资料；3xxx 班级；4xxx 作业与评分；5xxx 题库；6xxx 反馈；7xxx AI。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/error_code.ts")]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    BadRequest = 1000,
    Unauthorized = 1001,
    Forbidden = 1003,
    NotFound = 1004,
    Conflict = 1009,
    RateLimitExceeded = 1029,
    InternalServerError = 1500,

    AuthFailed = 2000,
    ProfileNotFound = 2004,
    ProfileUpdateFailed = 2005,

    ClassNotFound = 3004,
    ClassCreationFailed = 3005,
    ClassPermissionDenied = 3006,
    ClassInviteCodeInvalid = 3007,
    ClassAlreadyJoined = 3008,
    ClassMemberNotFound = 3009,

    AssignmentNotFound = 4004,
    AssignmentNotPublished = 4005,
    MarkInvalid = 4006,
    StudentNotEnrolled = 4007,
    QuestionNotInAssignment = 4008,
    SubmissionNotFound = 4009,
    SubmissionAlreadyExists = 4010,
    SubmissionInvalid = 4011,

    QuestionNotFound = 5004,
    QuestionInvalid = 5005,

    FeedbackNoData = 6004,
    FeedbackNotReleased = 6005,
    RevisionListNotFound = 6006,
    RevisionListExists = 6007,
    QuestionNotInRevisionList = 6008,

    AiNotConfigured = 7001,
    AiRequestFailed = 7002,
    AiResponseInvalid = 7003,
}
