use rand::Rng;

const TOKEN_LEN: usize = 40;
const HEX: &[u8] = b"0123456789abcdef";
const PASSWORD_CHARSET: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!@#$%";

/// 生成登录令牌：40 位小写十六进制
pub fn generate_token() -> String {
    random_from(HEX, TOKEN_LEN)
}

/// 生成随机密码
pub fn generate_random_password(length: usize) -> String {
    random_from(PASSWORD_CHARSET, length)
}

fn random_from(charset: &[u8], length: usize) -> String {
    let mut rng = rand::rng();
    (0..length)
        .map(|_| charset[rng.random_range(0..charset.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_shape() {
        let token = generate_token();
        assert_eq!(token.len(), 40);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        assert_ne!(token, generate_token());
    }

    #[test]
    fn test_random_password_length() {
        assert_eq!(generate_random_password(16).len(), 16);
    }
}
