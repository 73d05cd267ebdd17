use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 用户角色
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/profile.ts")]
pub enum ProfileRole {
    Student, // 学生
    Teacher, // 教师
    Admin,   // 管理员
}

impl ProfileRole {
    pub const STUDENT: &'static str = "student";
    pub const TEACHER: &'static str = "teacher";
    pub const ADMIN: &'static str = "admin";

    pub fn admin_roles() -> &'static [&'static ProfileRole] {
        &[&Self::Admin]
    }
    pub fn teacher_roles() -> &'static [&'static ProfileRole] {
        &[&Self::Teacher, &Self::Admin]
    }
    pub fn all_roles() -> &'static [&'static ProfileRole] {
        &[&Self::Student, &Self::Teacher, &Self::Admin]
    }

    /// 从令牌声明中解析自助注册角色，管理员只能在数据库中授予
    pub fn from_claim(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(Self::TEACHER) => ProfileRole::Teacher,
            _ => ProfileRole::Student,
        }
    }

    pub fn is_staff(&self) -> bool {
        matches!(self, ProfileRole::Teacher | ProfileRole::Admin)
    }
}

impl<'de> Deserialize<'de> for ProfileRole {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(|_| {
            serde::de::Error::custom(format!(
                "无效的用户角色: '{s}'. 支持的角色: student, teacher, admin"
            ))
        })
    }
}

impl std::fmt::Display for ProfileRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProfileRole::Student => write!(f, "{}", ProfileRole::STUDENT),
            ProfileRole::Teacher => write!(f, "{}", ProfileRole::TEACHER),
            ProfileRole::Admin => write!(f, "{}", ProfileRole::ADMIN),
        }
    }
}

impl std::str::FromStr for ProfileRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ProfileRole::STUDENT => Ok(ProfileRole::Student),
            ProfileRole::TEACHER => Ok(ProfileRole::Teacher),
            ProfileRole::ADMIN => Ok(ProfileRole::Admin),
            _ => Err(format!("Invalid profile role: {s}")),
        }
    }
}

// 用户资料，对应托管认证服务中的一个账号
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/profile.ts")]
pub struct Profile {
    pub id: i64,
    // 认证服务中的用户 UUID
    pub auth_uid: String,
    pub email: String,
    pub full_name: Option<String>,
    pub role: ProfileRole,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Profile {
    /// 展示用名称，没有姓名时退回邮箱
    pub fn display_name(&self) -> &str {
        self.full_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(&self.email)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_from_claim_never_grants_admin() {
        assert_eq!(ProfileRole::from_claim(Some("admin")), ProfileRole::Student);
        assert_eq!(ProfileRole::from_claim(Some("teacher")), ProfileRole::Teacher);
        assert_eq!(ProfileRole::from_claim(None), ProfileRole::Student);
    }

    #[test]
    fn test_role_deserialize() {
        let role: ProfileRole = serde_json::from_str("\"teacher\"").unwrap();
        assert_eq!(role, ProfileRole::Teacher);
        assert!(serde_json::from_str::<ProfileRole>("\"parent\"").is_err());
    }

    #[test]
    fn test_display_name_fallback() {
        let now = chrono::Utc::now();
        let mut profile = Profile {
            id: 1,
            auth_uid: "6f1c2a64-3e59-4b0e-9d55-2a7c1b8f0e11".into(),
            email: "sam@example.com".into(),
            full_name: Some("  ".into()),
            role: ProfileRole::Student,
            created_at: now,
            updated_at: now,
        };
        assert_eq!(profile.display_name(), "sam@example.com");
        profile.full_name = Some("Sam Patel".into());
        assert_eq!(profile.display_name(), "Sam Patel");
    }
}
