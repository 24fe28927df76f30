pub mod blob_path;
pub mod extractor;
pub mod parameter_error_handler;
pub mod password;
pub mod random_code;
pub mod sql;
pub mod validate;

pub use extractor::SafeIDI64;
pub use parameter_error_handler::json_error_handler;
pub use parameter_error_handler::query_error_handler;
pub use sql::{escape_like_pattern, like_contains};
