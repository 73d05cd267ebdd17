//! 统一错误处理模块
//!
//! 使用宏自动生成错误类型，支持错误代码和类型名称。

use std::fmt;

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义
/// - code() 方法 - 返回错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - message() 方法 - 返回错误详情
/// - 便捷构造函数
macro_rules! define_tutor_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub enum TutorError {
            $($variant(String),)*
        }

        impl TutorError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(TutorError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(TutorError::$variant(_) => $type_name,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(TutorError::$variant(msg) => msg,)*
                }
            }
        }

        paste::paste! {
            impl TutorError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        TutorError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_tutor_errors! {
    CacheConnection("E001", "Cache Connection Error"),
    CachePluginNotFound("E002", "Cache Plugin Not Found"),
    DatabaseConfig("E003", "Database Configuration Error"),
    DatabaseConnection("E004", "Database Connection Error"),
    DatabaseOperation("E005", "Database Operation Error"),
    Io("E006", "IO Error"),
    Validation("E007", "Validation Error"),
    NotFound("E008", "Resource Not Found"),
    Serialization("E009", "Serialization Error"),
    Conflict("E010", "Resource Conflict"),
    DateParse("E011", "Date Parse Error"),
    Authentication("E012", "Authentication Error"),
    Authorization("E013", "Authorization Error"),
    NoData("E014", "No Data"),
    LlmConfig("E015", "LLM Configuration Error"),
    LlmRequest("E016", "LLM Request Error"),
    LlmResponse("E017", "LLM Response Error"),
}

impl TutorError {
    /// 格式化为彩色输出（用于开发环境）
    #[cfg(debug_assertions)]
    pub fn format_colored(&self) -> String {
        format!(
            "\x1b[1;31m[ERROR]\x1b[0m \x1b[33m{}\x1b[0m \x1b[31m{}\x1b[0m\n  {}",
            self.code(),
            self.error_type(),
            self.message()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }

    /// 是否为"没有可汇总的数据"
    pub fn is_no_data(&self) -> bool {
        matches!(self, TutorError::NoData(_))
    }
}

impl fmt::Display for TutorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for TutorError {}

impl From<sea_orm::DbErr> for TutorError {
    fn from(err: sea_orm::DbErr) -> Self {
        TutorError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for TutorError {
    fn from(err: std::io::Error) -> Self {
        TutorError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for TutorError {
    fn from(err: serde_json::Error) -> Self {
        TutorError::Serialization(err.to_string())
    }
}

impl From<chrono::ParseError> for TutorError {
    fn from(err: chrono::ParseError) -> Self {
        TutorError::DateParse(err.to_string())
    }
}

impl From<reqwest::Error> for TutorError {
    fn from(err: reqwest::Error) -> Self {
        TutorError::LlmRequest(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, TutorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(TutorError::cache_connection("test").code(), "E001");
        assert_eq!(TutorError::database_config("test").code(), "E003");
        assert_eq!(TutorError::validation("test").code(), "E007");
        assert_eq!(TutorError::authentication("test").code(), "E012");
        assert_eq!(TutorError::no_data("test").code(), "E014");
        assert_eq!(TutorError::llm_response("test").code(), "E017");
    }

    #[test]
    fn test_error_types() {
        assert_eq!(
            TutorError::cache_connection("test").error_type(),
            "Cache Connection Error"
        );
        assert_eq!(TutorError::no_data("test").error_type(), "No Data");
    }

    #[test]
    fn test_no_data_predicate() {
        assert!(TutorError::no_data("empty").is_no_data());
        assert!(!TutorError::not_found("missing").is_no_data());
    }

    #[test]
    fn test_format_simple() {
        let err = TutorError::validation("Invalid topic");
        let formatted = err.format_simple();
        assert!(formatted.contains("Validation Error"));
        assert!(formatted.contains("Invalid topic"));
    }

    #[test]
    fn test_db_err_conversion() {
        let err: TutorError = sea_orm::DbErr::Custom("boom".to_string()).into();
        assert_eq!(err.code(), "E005");
        assert!(err.message().contains("boom"));
    }
}
