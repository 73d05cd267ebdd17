use serde::Deserialize;
use ts_rs::TS;

use super::entities::ProfileRole;

// 首次访问时根据令牌声明创建资料（内部使用）
#[derive(Debug, Clone)]
pub struct CreateProfileRequest {
    pub auth_uid: String,
    pub email: String,
    pub full_name: Option<String>,
    pub role: ProfileRole,
}

// 更新个人资料请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/profile.ts")]
pub struct UpdateProfileRequest {
    pub full_name: Option<String>,
}
