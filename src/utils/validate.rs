use once_cell::sync::Lazy;
use regex::Regex;

/// 账号用户名：字母、数字以及 `@ . + - _`
static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\w.@+-]+$").expect("Invalid username regex"));

pub const USERNAME_MAX_LEN: usize = 50;
pub const NAME_MAX_LEN: usize = 50;
pub const CLASS_NAME_MAX_LEN: usize = 100;
pub const TITLE_MAX_LEN: usize = 50;
pub const DESCRIPTION_MAX_LEN: usize = 1000;
pub const NOTES_MAX_LEN: usize = 500;

pub fn validate_username(username: &str) -> Result<(), String> {
    if username.is_empty() {
        return Err("This field may not be blank".to_string());
    }
    if username.chars().count() > USERNAME_MAX_LEN {
        return Err(format!(
            "Ensure this field has no more than {USERNAME_MAX_LEN} characters"
        ));
    }
    if !USERNAME_RE.is_match(username) {
        return Err(
            "Username may contain only letters, numbers, and @/./+/-/_ characters".to_string(),
        );
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), String> {
    if password.is_empty() {
        return Err("This field may not be blank".to_string());
    }
    Ok(())
}

/// 必填文本：非空白且不超过 `max` 个字符
pub fn validate_required_text(value: &str, max: usize) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err("This field may not be blank".to_string());
    }
    validate_max_len(value, max)
}

pub fn validate_max_len(value: &str, max: usize) -> Result<(), String> {
    if value.chars().count() > max {
        return Err(format!("Ensure this field has no more than {max} characters"));
    }
    Ok(())
}

pub fn required_message() -> String {
    "This field is required".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_rules() {
        assert!(validate_username("t1").is_ok());
        assert!(validate_username("jane.doe+cls@school-1_x").is_ok());
        assert!(validate_username("").is_err());
        assert!(validate_username("has space").is_err());
        assert!(validate_username("semi;colon").is_err());
        assert!(validate_username(&"a".repeat(50)).is_ok());
        assert!(validate_username(&"a".repeat(51)).is_err());
    }

    #[test]
    fn test_required_text() {
        assert!(validate_required_text("Algebra", CLASS_NAME_MAX_LEN).is_ok());
        assert!(validate_required_text("   ", CLASS_NAME_MAX_LEN).is_err());
        assert!(validate_required_text(&"x".repeat(51), TITLE_MAX_LEN).is_err());
    }

    #[test]
    fn test_max_len_counts_chars() {
        assert!(validate_max_len(&"é".repeat(50), NAME_MAX_LEN).is_ok());
        assert!(validate_max_len(&"é".repeat(51), NAME_MAX_LEN).is_err());
    }

    #[test]
    fn test_password_non_empty() {
        assert!(validate_password("x").is_ok());
        assert!(validate_password("").is_err());
    }
}
