use crate::config::AppConfig;
use crate::errors::SchoolError;
use argon2::password_hash::{SaltString, rand_core::OsRng};
use argon2::{Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version};
use once_cell::sync::Lazy;

/// 账号不存在时用于校验的占位哈希，参数与真实账号一致
static DUMMY_HASH: Lazy<Option<String>> = Lazy::new(|| hash_password("placeholder-password").ok());

/// 哈希密码（Argon2id，参数来自配置）
pub fn hash_password(password: &str) -> Result<String, SchoolError> {
    let config = AppConfig::get();
    let params = Params::new(
        config.argon2.memory_cost,
        config.argon2.time_cost,
        config.argon2.parallelism,
        None,
    )
    .map_err(|e| SchoolError::password_hash(format!("Argon2 参数错误: {e}")))?;

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);
    let salt = SaltString::generate(&mut OsRng);
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| SchoolError::password_hash(format!("密码哈希失败: {e}")))?;
    Ok(hash.to_string())
}

/// 验证密码，参数从哈希串本身读取
pub fn verify_password(password: &str, hash: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed_hash) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok(),
        Err(_) => false,
    }
}

/// 对不存在的账号执行一次同等开销的校验
pub fn verify_dummy_password(password: &str) {
    if let Some(hash) = DUMMY_HASH.as_deref() {
        let _ = verify_password(password, hash);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("s3cret").expect("hash");
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("s3cret", &hash));
        assert!(!verify_password("wrong", &hash));
    }

    #[test]
    fn test_dummy_hash_is_real_argon2() {
        let hash = DUMMY_HASH.as_deref().expect("dummy hash");
        assert!(hash.starts_with("$argon2id$"));
        assert!(!verify_password("anything", hash));
        verify_dummy_password("anything");
    }

    #[test]
    fn test_verify_rejects_garbage_hash() {
        assert!(!verify_password("s3cret", "not-a-hash"));
    }
}
