use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("Invalid email regex")
});

static INVITE_CODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9]{6,16}$").expect("Invalid invite code regex"));

/// 主题/子主题标签最大长度
pub const MAX_LABEL_LEN: usize = 100;
/// 单题分值上限
pub const MAX_QUESTION_MARKS: f64 = 100.0;

pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if !EMAIL_RE.is_match(email) {
        return Err("Email format is invalid");
    }
    Ok(())
}

/// 主题必须是非空标签
pub fn validate_topic(topic: &str) -> Result<(), &'static str> {
    let topic = topic.trim();
    if topic.is_empty() {
        return Err("Topic must not be empty");
    }
    if topic.chars().count() > MAX_LABEL_LEN {
        return Err("Topic must be at most 100 characters");
    }
    Ok(())
}

/// 子主题可以为空，为空视为没有子主题
pub fn validate_sub_topic(sub_topic: Option<&str>) -> Result<(), &'static str> {
    match sub_topic {
        Some(s) if s.trim().chars().count() > MAX_LABEL_LEN => {
            Err("Sub-topic must be at most 100 characters")
        }
        _ => Ok(()),
    }
}

/// 题目分值：(0, 100]
pub fn validate_question_marks(marks: f64) -> Result<(), &'static str> {
    if !marks.is_finite() || marks <= 0.0 {
        return Err("Marks must be greater than 0");
    }
    if marks > MAX_QUESTION_MARKS {
        return Err("Marks must be at most 100");
    }
    Ok(())
}

/// 得分：0 <= awarded <= available
pub fn validate_awarded_marks(awarded: f64, available: f64) -> Result<(), &'static str> {
    if !awarded.is_finite() || awarded < 0.0 {
        return Err("Awarded marks must not be negative");
    }
    if awarded > available {
        return Err("Awarded marks must not exceed the marks available");
    }
    Ok(())
}

pub fn validate_invite_code(code: &str) -> Result<(), &'static str> {
    if !INVITE_CODE_RE.is_match(code) {
        return Err("Invite code format is invalid");
    }
    Ok(())
}

/// 名称类字段（班级名、作业标题、姓名）：去空白后 1..=max 个字符
pub fn validate_name(value: &str, max_len: usize) -> Result<(), String> {
    let len = value.trim().chars().count();
    if len == 0 {
        return Err("Name must not be empty".to_string());
    }
    if len > max_len {
        return Err(format!("Name must be at most {max_len} characters"));
    }
    Ok(())
}

/// 去掉首尾空白，空字符串视为 None
pub fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email() {
        assert!(validate_email("teacher@school.org.uk").is_ok());
        assert!(validate_email("not-an-email").is_err());
        assert!(validate_email("a@b").is_err());
    }

    #[test]
    fn test_validate_topic() {
        assert!(validate_topic("Algebra").is_ok());
        assert_eq!(validate_topic("   "), Err("Topic must not be empty"));
        assert!(validate_topic(&"x".repeat(101)).is_err());
    }

    #[test]
    fn test_validate_sub_topic() {
        assert!(validate_sub_topic(None).is_ok());
        assert!(validate_sub_topic(Some("")).is_ok());
        assert!(validate_sub_topic(Some(&"y".repeat(101))).is_err());
    }

    #[test]
    fn test_validate_question_marks() {
        assert!(validate_question_marks(4.0).is_ok());
        assert!(validate_question_marks(100.0).is_ok());
        assert!(validate_question_marks(0.0).is_err());
        assert!(validate_question_marks(-1.0).is_err());
        assert!(validate_question_marks(100.5).is_err());
        assert!(validate_question_marks(f64::NAN).is_err());
    }

    #[test]
    fn test_validate_awarded_marks() {
        assert!(validate_awarded_marks(0.0, 4.0).is_ok());
        assert!(validate_awarded_marks(4.0, 4.0).is_ok());
        assert!(validate_awarded_marks(4.5, 4.0).is_err());
        assert!(validate_awarded_marks(-0.5, 4.0).is_err());
    }

    #[test]
    fn test_validate_invite_code() {
        assert!(validate_invite_code("AB12cd34").is_ok());
        assert!(validate_invite_code("ab-12").is_err());
        assert!(validate_invite_code("").is_err());
    }

    #[test]
    fn test_validate_name_and_normalize() {
        assert!(validate_name("Year 11 Set 2", 100).is_ok());
        assert!(validate_name("  ", 100).is_err());
        assert!(validate_name("abcdef", 5).is_err());
        assert_eq!(normalize_optional(Some("  ".into())), None);
        assert_eq!(normalize_optional(Some(" Ratio ".into())), Some("Ratio".into()));
    }
}
