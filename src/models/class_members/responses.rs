use super::entities::ClassMember;
use crate::models::common::PaginationInfo;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class-member.ts")]
pub struct ClassMemberListResponse {
    pub pagination: PaginationInfo,
    pub items: Vec<ClassMember>,
}
