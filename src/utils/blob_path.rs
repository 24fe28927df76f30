//! 文件引用路径
//!
//! 服务本身不保存文件内容，只把客户端给出的文件名转换为固定命名空间下的引用串：
//! 头像为 `uploads/profiles/{ROLE}/{username}/{file}`，附件为 `uploads/attachments/{file}`。

use crate::models::accounts::entities::AccountRole;

/// 取客户端文件名的最后一段，拒绝空名以及 `.`、`..`
fn file_name(raw: &str) -> Result<&str, String> {
    let name = raw
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();
    if name.is_empty() || name == "." || name == ".." {
        return Err(format!("Invalid file name: '{raw}'"));
    }
    Ok(name)
}

pub fn profile_pic_ref(role: AccountRole, username: &str, raw: &str) -> Result<String, String> {
    let name = file_name(raw)?;
    Ok(format!("uploads/profiles/{role}/{username}/{name}"))
}

pub fn attachment_ref(raw: &str) -> Result<String, String> {
    let name = file_name(raw)?;
    Ok(format!("uploads/attachments/{name}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_pic_ref() {
        assert_eq!(
            profile_pic_ref(AccountRole::Teacher, "t1", "me.png").as_deref(),
            Ok("uploads/profiles/TEACHER/t1/me.png")
        );
        assert_eq!(
            profile_pic_ref(AccountRole::Student, "s1", "C:\\pics\\me.jpg").as_deref(),
            Ok("uploads/profiles/STUDENT/s1/me.jpg")
        );
    }

    #[test]
    fn test_attachment_ref_strips_directories() {
        assert_eq!(
            attachment_ref("../../etc/passwd").as_deref(),
            Ok("uploads/attachments/passwd")
        );
        assert_eq!(
            attachment_ref("hw1.pdf").as_deref(),
            Ok("uploads/attachments/hw1.pdf")
        );
    }

    #[test]
    fn test_rejects_empty_and_dot_names() {
        assert!(attachment_ref("").is_err());
        assert!(attachment_ref("dir/").is_err());
        assert!(attachment_ref("..").is_err());
        assert!(attachment_ref("a/.").is_err());
    }
}
