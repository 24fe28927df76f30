//! 预导入模块，方便使用

pub use super::accounts::{
    ActiveModel as AccountActiveModel, Entity as Accounts, Model as AccountModel,
};
pub use super::assignment_completions::{
    ActiveModel as AssignmentCompletionActiveModel, Entity as AssignmentCompletions,
    Model as AssignmentCompletionModel,
};
pub use super::assignments::{
    ActiveModel as AssignmentActiveModel, Entity as Assignments, Model as AssignmentModel,
};
pub use super::auth_tokens::{
    ActiveModel as AuthTokenActiveModel, Entity as AuthTokens, Model as AuthTokenModel,
};
pub use super::classrooms::{
    ActiveModel as ClassroomActiveModel, Entity as Classrooms, Model as ClassroomModel,
};
pub use super::submissions::{
    ActiveModel as SubmissionActiveModel, Entity as Submissions, Model as SubmissionModel,
};
