/// 转义 LIKE 模式中的通配符
///
/// SeaORM 的 `contains` 会在两端拼接 `%`，用户输入中的 `%`、`_` 需要按字面匹配。
pub fn escape_like_pattern(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like_pattern() {
        assert_eq!(escape_like_pattern("algebra"), "algebra");
        assert_eq!(escape_like_pattern("50%"), "50\\%");
        assert_eq!(escape_like_pattern("sub_topic"), "sub\\_topic");
        assert_eq!(escape_like_pattern("a\\b"), "a\\\\b");
    }
}
