use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 账号角色，创建后不可变
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash, TS)]
#[serde(rename_all = "UPPERCASE")]
#[ts(export, export_to = "account.ts")]
pub enum AccountRole {
    Teacher,
    Student,
}

impl AccountRole {
    pub const TEACHER: &'static str = "TEACHER";
    pub const STUDENT: &'static str = "STUDENT";

    pub fn as_str(&self) -> &'static str {
        match self {
            AccountRole::Teacher => Self::TEACHER,
            AccountRole::Student => Self::STUDENT,
        }
    }

    /// 资源名（用于日志与错误信息）
    pub fn label(&self) -> &'static str {
        match self {
            AccountRole::Teacher => "Teacher",
            AccountRole::Student => "Student",
        }
    }
}

impl<'de> Deserialize<'de> for AccountRole {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(|_| {
            serde::de::Error::custom(format!(
                "无效的账号角色: '{s}'. 支持的角色: TEACHER, STUDENT"
            ))
        })
    }
}

impl std::fmt::Display for AccountRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for AccountRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            AccountRole::TEACHER => Ok(AccountRole::Teacher),
            AccountRole::STUDENT => Ok(AccountRole::Student),
            _ => Err(format!("Invalid account role: {s}")),
        }
    }
}

/// 账号实体（教师与学生共用）
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "account.ts")]
pub struct Account {
    pub id: i64,
    pub username: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub profile_pic: Option<String>,
    pub role: AccountRole,
    #[serde(skip_serializing, default)] // 不序列化到JSON响应中
    #[ts(skip)]
    pub password_hash: String,
    pub is_active: bool,
    pub is_staff: bool,
    #[serde(skip_serializing, default)]
    #[ts(skip)]
    pub is_superuser: bool,
    pub last_login: Option<chrono::DateTime<chrono::Utc>>,
    pub date_joined: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Account {
    pub fn is_teacher(&self) -> bool {
        self.role == AccountRole::Teacher
    }

    pub fn is_student(&self) -> bool {
        self.role == AccountRole::Student
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_wire_format() {
        assert_eq!(
            serde_json::to_string(&AccountRole::Teacher).expect("serialize"),
            "\"TEACHER\""
        );
        let role: AccountRole = serde_json::from_str("\"STUDENT\"").expect("parse");
        assert_eq!(role, AccountRole::Student);
        assert!(serde_json::from_str::<AccountRole>("\"teacher\"").is_err());
    }
}
