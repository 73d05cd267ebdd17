//! 托管认证服务签发的访问令牌校验
//!
//! 本服务不签发令牌，只用共享密钥（HS256）校验并读取声明。

use crate::config::{AppConfig, JwtConfig};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};

// 认证服务写入的用户元数据
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserMetadata {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

// JWT Claims 结构体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // 认证服务中的用户 UUID
    #[serde(default)]
    pub email: Option<String>,
    pub exp: usize,
    #[serde(default)]
    pub iat: usize,
    #[serde(default)]
    pub user_metadata: UserMetadata,
}

pub struct JwtUtils;

impl JwtUtils {
    /// 使用全局配置校验令牌
    pub fn verify_token(token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        Self::verify_with(token, &AppConfig::get().jwt)
    }

    /// 使用给定配置校验令牌，`sub` 必须是 UUID
    pub fn verify_with(token: &str, config: &JwtConfig) -> Result<Claims, jsonwebtoken::errors::Error> {
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = config.leeway;
        if config.audience.trim().is_empty() {
            validation.validate_aud = false;
        } else {
            validation.set_audience(&[config.audience.trim()]);
        }

        let claims = decode::<Claims>(token, &decoding_key, &validation)?.claims;
        if uuid::Uuid::parse_str(&claims.sub).is_err() {
            return Err(jsonwebtoken::errors::ErrorKind::InvalidSubject.into());
        }
        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{EncodingKey, Header, encode};
    use serde_json::json;

    fn config(audience: &str) -> JwtConfig {
        JwtConfig {
            secret: "unit-test-secret".into(),
            audience: audience.into(),
            leeway: 0,
        }
    }

    fn sign(claims: serde_json::Value, secret: &str) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn claims(sub: &str, exp_offset: i64) -> serde_json::Value {
        let now = chrono::Utc::now().timestamp();
        json!({
            "sub": sub,
            "email": "ada@example.com",
            "aud": "authenticated",
            "iat": now,
            "exp": now + exp_offset,
            "user_metadata": { "full_name": "Ada Lovelace", "role": "teacher" }
        })
    }

    const SUB: &str = "0b7c1f5e-8a2d-4c3b-9e6f-1a2b3c4d5e6f";

    #[test]
    fn test_valid_token() {
        let token = sign(claims(SUB, 3600), "unit-test-secret");
        let claims = JwtUtils::verify_with(&token, &config("authenticated")).unwrap();
        assert_eq!(claims.sub, SUB);
        assert_eq!(claims.email.as_deref(), Some("ada@example.com"));
        assert_eq!(claims.user_metadata.role.as_deref(), Some("teacher"));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = sign(claims(SUB, 3600), "another-secret");
        assert!(JwtUtils::verify_with(&token, &config("authenticated")).is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let token = sign(claims(SUB, -3600), "unit-test-secret");
        assert!(JwtUtils::verify_with(&token, &config("authenticated")).is_err());
    }

    #[test]
    fn test_audience_mismatch_and_disabled() {
        let token = sign(claims(SUB, 3600), "unit-test-secret");
        assert!(JwtUtils::verify_with(&token, &config("service_role")).is_err());
        assert!(JwtUtils::verify_with(&token, &config("")).is_ok());
    }

    #[test]
    fn test_non_uuid_subject_rejected() {
        let token = sign(claims("42", 3600), "unit-test-secret");
        assert!(JwtUtils::verify_with(&token, &config("authenticated")).is_err());
    }
}
