use crate::errors::SchoolError;

/// 解析路径中的正整数 ID，非法值返回 400 校验错误
pub fn parse_positive_i64(param: &str, raw: &str) -> Result<i64, SchoolError> {
    match raw.parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(SchoolError::validation(format!(
            "{param}: invalid identifier '{raw}'"
        ))),
    }
}

/// 定义从路径参数中安全提取 i64 的提取器
///
/// ```ignore
/// define_safe_i64_extractor!(SafeIDI64, "id");
/// ```
#[macro_export]
macro_rules! define_safe_i64_extractor {
    ($name:ident, $param:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct $name(pub i64);

        impl actix_web::FromRequest for $name {
            type Error = $crate::errors::SchoolError;
            type Future = futures_util::future::Ready<Result<Self, Self::Error>>;

            fn from_request(
                req: &actix_web::HttpRequest,
                _: &mut actix_web::dev::Payload,
            ) -> Self::Future {
                let result = match req.match_info().get($param) {
                    Some(raw) => $crate::utils::extractor::parse_positive_i64($param, raw).map($name),
                    None => Err($crate::errors::SchoolError::validation(concat!(
                        $param,
                        ": missing path parameter"
                    ))),
                };
                futures_util::future::ready(result)
            }
        }
    };
}

define_safe_i64_extractor!(SafeIDI64, "id");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_positive_i64("id", "42").ok(), Some(42));
        assert!(parse_positive_i64("id", "0").is_err());
        assert!(parse_positive_i64("id", "-3").is_err());
        assert!(parse_positive_i64("id", "abc").is_err());
    }

    #[actix_web::test]
    async fn test_extractor_reads_match_info() {
        use actix_web::FromRequest;

        let req = actix_web::test::TestRequest::default()
            .param("id", "7")
            .to_http_request();
        let id = SafeIDI64::extract(&req).await.expect("valid id");
        assert_eq!(id, SafeIDI64(7));

        let req = actix_web::test::TestRequest::default()
            .param("id", "x")
            .to_http_request();
        assert!(SafeIDI64::extract(&req).await.is_err());
    }
}
