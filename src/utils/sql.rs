use sea_orm::sea_query::LikeExpr;

/// 转义 LIKE 模式中的通配符（`%`、`_` 与转义符本身）
pub fn escape_like_pattern(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// 构造 `%input%` 子串匹配，并声明 `\` 为转义符
pub fn like_contains(input: &str) -> LikeExpr {
    LikeExpr::new(format!("%{}%", escape_like_pattern(input))).escape('\\')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like_pattern() {
        assert_eq!(escape_like_pattern("abc"), "abc");
        assert_eq!(escape_like_pattern("50%_off"), "50\\%\\_off");
        assert_eq!(escape_like_pattern("a\\b"), "a\\\\b");
    }
}
