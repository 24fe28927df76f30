/// 业务错误码
///
/// 按资源分段：1xxx 通用，2xxx 认证，3xxx 账号，4xxx 教室，5xxx 作业，6xxx 提交。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    // 通用
    BadRequest = 1000,
    ValidationFailed = 1001,
    Unauthorized = 1002,
    Forbidden = 1003,
    NotFound = 1004,
    Conflict = 1005,
    RateLimitExceeded = 1006,
    InternalServerError = 1007,

    // 认证
    AuthFailed = 2000,
    TokenInvalid = 2001,

    // 账号
    AccountNotFound = 3000,
    AccountAlreadyExists = 3001,

    // 教室
    ClassroomNotFound = 4000,

    // 作业
    AssignmentNotFound = 5000,

    // 提交
    SubmissionNotFound = 6000,
}
