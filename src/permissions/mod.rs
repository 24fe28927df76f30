//! 授权策略
//!
//! 每条策略都是 (当前账号, HTTP 方法, 目标对象) 上的纯谓词，分两级求值：
//! - 请求级 `has_permission`：还没有目标对象（列表、创建）。
//! - 对象级 `has_object_permission`：已经取到目标对象（查看、修改、删除）。
//!
//! 一个接口挂载的策略按顺序求值，全部通过才放行（逻辑与）。

use actix_web::http::Method;
use tracing::info;

use crate::errors::{Result, SchoolError};
use crate::models::accounts::entities::Account;
use crate::models::assignments::entities::Assignment;
use crate::models::classrooms::entities::Classroom;
use crate::models::submissions::entities::Submission;

/// 只读方法
pub fn is_safe_method(method: &Method) -> bool {
    matches!(*method, Method::GET | Method::HEAD | Method::OPTIONS)
}

/// 对象级检查的目标
#[derive(Debug, Clone, Copy)]
pub enum Target<'a> {
    Account(&'a Account),
    Classroom(&'a Classroom),
    Assignment(&'a Assignment),
    /// 提交需要连同其作业一起判断（评分教师是作业的所有者）
    Submission {
        submission: &'a Submission,
        assignment: &'a Assignment,
    },
}

impl Target<'_> {
    fn owner_teacher(&self) -> Option<i64> {
        match self {
            Target::Account(_) => None,
            Target::Classroom(classroom) => Some(classroom.owner_teacher),
            Target::Assignment(assignment) => Some(assignment.owner_teacher),
            Target::Submission { assignment, .. } => Some(assignment.owner_teacher),
        }
    }

    fn owner_student(&self) -> Option<i64> {
        match self {
            Target::Submission { submission, .. } => Some(submission.owner_student),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    /// 必须登录
    Authenticated,
    /// 只读方法允许匿名，其余必须登录
    AuthenticatedOrReadOnly,
    /// 非只读方法只能修改自己的账号
    SelfOrReadOnly,
    /// 非只读方法只能由对象所属教师执行
    OwnerTeacherOrReadOnly,
    /// 非只读方法只能由教师执行
    TeacherOrReadOnly,
    /// 非只读方法只能由对象所属学生执行
    OwnerStudentOrReadOnly,
    /// 非只读方法只能由学生执行
    StudentOrReadOnly,
    /// 提交专用：学生管理自己的提交，作业所属教师可以查看并评分
    SubmissionOwnerOrGradingTeacher,
}

impl Policy {
    /// 请求级检查
    pub fn has_permission(self, actor: Option<&Account>, method: &Method) -> bool {
        let safe = is_safe_method(method);
        let is_teacher = actor.is_some_and(Account::is_teacher);
        let is_student = actor.is_some_and(Account::is_student);

        match self {
            Policy::Authenticated => actor.is_some(),
            Policy::AuthenticatedOrReadOnly => safe || actor.is_some(),
            Policy::TeacherOrReadOnly => safe || is_teacher,
            Policy::StudentOrReadOnly => safe || is_student,
            // 读放行；教师的 PATCH 放行；其余（包括非教师的 PATCH）要求是学生
            Policy::SubmissionOwnerOrGradingTeacher => {
                if safe || (method == Method::PATCH && is_teacher) {
                    true
                } else {
                    is_student
                }
            }
            // 仅在对象级生效
            Policy::SelfOrReadOnly
            | Policy::OwnerTeacherOrReadOnly
            | Policy::OwnerStudentOrReadOnly => true,
        }
    }

    /// 对象级检查
    pub fn has_object_permission(
        self,
        actor: Option<&Account>,
        method: &Method,
        target: &Target<'_>,
    ) -> bool {
        let safe = is_safe_method(method);
        let actor_id = actor.map(|a| a.id);

        match self {
            Policy::SelfOrReadOnly => {
                safe || matches!(target, Target::Account(account) if Some(account.id) == actor_id)
            }
            Policy::OwnerTeacherOrReadOnly => {
                safe || (actor_id.is_some() && target.owner_teacher() == actor_id)
            }
            Policy::OwnerStudentOrReadOnly => {
                safe || (actor_id.is_some() && target.owner_student() == actor_id)
            }
            // 读也受限：只有提交者本人和评分教师可见；
            // PATCH 允许评分教师或提交者本人；其余方法只允许提交者本人
            Policy::SubmissionOwnerOrGradingTeacher => {
                let Target::Submission {
                    submission,
                    assignment,
                } = target
                else {
                    return false;
                };
                let Some(actor) = actor else {
                    return false;
                };
                let is_owner = submission.owner_student == actor.id;
                let is_grader = assignment.owner_teacher == actor.id;

                if safe || method == Method::PATCH {
                    is_owner || is_grader
                } else {
                    is_owner
                }
            }
            Policy::Authenticated
            | Policy::AuthenticatedOrReadOnly
            | Policy::TeacherOrReadOnly
            | Policy::StudentOrReadOnly => true,
        }
    }

    /// 拒绝时的错误：匿名访问一律视为未认证，其余为无权限
    fn deny(self, actor: Option<&Account>, method: &Method) -> SchoolError {
        match actor {
            None => {
                info!("Denied anonymous {} by {:?}", method, self);
                SchoolError::authentication("Authentication credentials were not provided")
            }
            Some(account) => {
                info!(
                    "Denied {} for account {} ({}) by {:?}",
                    method, account.id, account.role, self
                );
                SchoolError::authorization("You do not have permission to perform this action")
            }
        }
    }
}

/// 挂在某个接口上的一组策略
#[derive(Debug, Clone, Copy)]
pub struct PolicySet(&'static [Policy]);

impl PolicySet {
    pub const fn new(policies: &'static [Policy]) -> Self {
        Self(policies)
    }

    pub fn check_request(&self, actor: Option<&Account>, method: &Method) -> Result<()> {
        match self.0.iter().find(|p| !p.has_permission(actor, method)) {
            Some(policy) => Err(policy.deny(actor, method)),
            None => Ok(()),
        }
    }

    pub fn check_object(
        &self,
        actor: Option<&Account>,
        method: &Method,
        target: &Target<'_>,
    ) -> Result<()> {
        match self
            .0
            .iter()
            .find(|p| !p.has_object_permission(actor, method, target))
        {
            Some(policy) => Err(policy.deny(actor, method)),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::accounts::entities::AccountRole;
    use chrono::Utc;

    fn account(id: i64, role: AccountRole) -> Account {
        Account {
            id,
            username: format!("user{id}"),
            first_name: None,
            last_name: None,
            profile_pic: None,
            role,
            password_hash: String::new(),
            is_active: true,
            is_staff: false,
            is_superuser: false,
            last_login: None,
            date_joined: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn classroom(owner: i64) -> Classroom {
        Classroom {
            id: 1,
            class_name: "Algebra".into(),
            owner_teacher: owner,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn assignment(owner: i64) -> Assignment {
        Assignment {
            id: 10,
            title: "HW1".into(),
            description: String::new(),
            attachment: "uploads/attachments/hw1.pdf".into(),
            classroom: None,
            owner_teacher: owner,
            completed_by: vec![],
            date_created: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn submission(owner: i64) -> Submission {
        Submission {
            id: 100,
            assignment: 10,
            score: None,
            accepted: false,
            attachment: None,
            notes: "done".into(),
            owner_student: owner,
            date_created: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    const T1: i64 = 1;
    const T2: i64 = 2;
    const S1: i64 = 3;
    const S2: i64 = 4;

    #[test]
    fn test_safe_methods() {
        assert!(is_safe_method(&Method::GET));
        assert!(is_safe_method(&Method::HEAD));
        assert!(is_safe_method(&Method::OPTIONS));
        assert!(!is_safe_method(&Method::POST));
        assert!(!is_safe_method(&Method::PATCH));
        assert!(!is_safe_method(&Method::DELETE));
    }

    #[test]
    fn test_self_or_read_only() {
        let me = account(S1, AccountRole::Student);
        let other = account(S2, AccountRole::Student);
        let p = Policy::SelfOrReadOnly;

        assert!(p.has_object_permission(Some(&me), &Method::GET, &Target::Account(&other)));
        assert!(p.has_object_permission(Some(&me), &Method::PATCH, &Target::Account(&me)));
        assert!(!p.has_object_permission(Some(&me), &Method::PATCH, &Target::Account(&other)));
        assert!(!p.has_object_permission(None, &Method::DELETE, &Target::Account(&other)));
    }

    #[test]
    fn test_teacher_or_read_only() {
        let t1 = account(T1, AccountRole::Teacher);
        let s1 = account(S1, AccountRole::Student);
        let p = Policy::TeacherOrReadOnly;

        assert!(p.has_permission(None, &Method::GET));
        assert!(p.has_permission(Some(&t1), &Method::POST));
        assert!(!p.has_permission(Some(&s1), &Method::POST));
        assert!(!p.has_permission(None, &Method::POST));
    }

    #[test]
    fn test_student_or_read_only() {
        let t1 = account(T1, AccountRole::Teacher);
        let s1 = account(S1, AccountRole::Student);
        let p = Policy::StudentOrReadOnly;

        assert!(p.has_permission(Some(&t1), &Method::GET));
        assert!(p.has_permission(Some(&s1), &Method::POST));
        assert!(!p.has_permission(Some(&t1), &Method::POST));
    }

    #[test]
    fn test_owner_teacher_or_read_only() {
        let t1 = account(T1, AccountRole::Teacher);
        let t2 = account(T2, AccountRole::Teacher);
        let a = assignment(T1);
        let c = classroom(T1);
        let p = Policy::OwnerTeacherOrReadOnly;

        assert!(p.has_object_permission(Some(&t2), &Method::GET, &Target::Assignment(&a)));
        assert!(p.has_object_permission(Some(&t1), &Method::PATCH, &Target::Assignment(&a)));
        assert!(!p.has_object_permission(Some(&t2), &Method::PATCH, &Target::Assignment(&a)));
        assert!(!p.has_object_permission(Some(&t2), &Method::DELETE, &Target::Classroom(&c)));
        assert!(!p.has_object_permission(None, &Method::DELETE, &Target::Classroom(&c)));
    }

    #[test]
    fn test_owner_student_or_read_only() {
        let s1 = account(S1, AccountRole::Student);
        let s2 = account(S2, AccountRole::Student);
        let a = assignment(T1);
        let s = submission(S1);
        let target = Target::Submission {
            submission: &s,
            assignment: &a,
        };
        let p = Policy::OwnerStudentOrReadOnly;

        assert!(p.has_object_permission(Some(&s2), &Method::GET, &target));
        assert!(p.has_object_permission(Some(&s1), &Method::PUT, &target));
        assert!(!p.has_object_permission(Some(&s2), &Method::PUT, &target));
        // 非提交对象没有所属学生
        assert!(!p.has_object_permission(Some(&s1), &Method::PUT, &Target::Assignment(&a)));
    }

    #[test]
    fn test_submission_request_level() {
        let t1 = account(T1, AccountRole::Teacher);
        let s1 = account(S1, AccountRole::Student);
        let p = Policy::SubmissionOwnerOrGradingTeacher;

        assert!(p.has_permission(Some(&t1), &Method::GET));
        assert!(p.has_permission(Some(&t1), &Method::PATCH));
        assert!(!p.has_permission(Some(&t1), &Method::POST));
        assert!(!p.has_permission(Some(&t1), &Method::DELETE));
        assert!(p.has_permission(Some(&s1), &Method::POST));
        // 学生的 PATCH 落到学生分支
        assert!(p.has_permission(Some(&s1), &Method::PATCH));
        assert!(!p.has_permission(None, &Method::PATCH));
    }

    #[test]
    fn test_submission_object_level() {
        let t1 = account(T1, AccountRole::Teacher);
        let t2 = account(T2, AccountRole::Teacher);
        let s1 = account(S1, AccountRole::Student);
        let s2 = account(S2, AccountRole::Student);
        let a = assignment(T1);
        let s = submission(S1);
        let target = Target::Submission {
            submission: &s,
            assignment: &a,
        };
        let p = Policy::SubmissionOwnerOrGradingTeacher;

        // 查看：提交者与评分教师
        assert!(p.has_object_permission(Some(&s1), &Method::GET, &target));
        assert!(p.has_object_permission(Some(&t1), &Method::GET, &target));
        assert!(!p.has_object_permission(Some(&s2), &Method::GET, &target));
        assert!(!p.has_object_permission(Some(&t2), &Method::GET, &target));

        // PATCH：评分教师或提交者，其他学生被拒绝
        assert!(p.has_object_permission(Some(&t1), &Method::PATCH, &target));
        assert!(p.has_object_permission(Some(&s1), &Method::PATCH, &target));
        assert!(!p.has_object_permission(Some(&t2), &Method::PATCH, &target));
        assert!(!p.has_object_permission(Some(&s2), &Method::PATCH, &target));

        // PUT / DELETE 仅提交者
        assert!(p.has_object_permission(Some(&s1), &Method::DELETE, &target));
        assert!(!p.has_object_permission(Some(&t1), &Method::DELETE, &target));
        assert!(!p.has_object_permission(Some(&t1), &Method::PUT, &target));

        assert!(!p.has_object_permission(None, &Method::GET, &target));
    }

    #[test]
    fn test_policy_set_error_kinds() {
        const CLASSROOM: PolicySet = PolicySet::new(&[
            Policy::AuthenticatedOrReadOnly,
            Policy::TeacherOrReadOnly,
            Policy::OwnerTeacherOrReadOnly,
        ]);
        let t1 = account(T1, AccountRole::Teacher);
        let t2 = account(T2, AccountRole::Teacher);
        let s1 = account(S1, AccountRole::Student);
        let c = classroom(T1);

        assert!(CLASSROOM.check_request(None, &Method::GET).is_ok());
        assert!(matches!(
            CLASSROOM.check_request(None, &Method::POST),
            Err(SchoolError::Authentication(_))
        ));
        assert!(matches!(
            CLASSROOM.check_request(Some(&s1), &Method::POST),
            Err(SchoolError::Authorization(_))
        ));
        assert!(CLASSROOM.check_request(Some(&t1), &Method::POST).is_ok());

        let target = Target::Classroom(&c);
        assert!(CLASSROOM.check_object(Some(&t1), &Method::DELETE, &target).is_ok());
        assert!(matches!(
            CLASSROOM.check_object(Some(&t2), &Method::DELETE, &target),
            Err(SchoolError::Authorization(_))
        ));
    }
}
