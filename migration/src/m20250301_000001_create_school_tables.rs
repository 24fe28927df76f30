use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 创建账号表（教师与学生共用，通过 role 区分）
        manager
            .create_table(
                Table::create()
                    .table(Accounts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Accounts::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Accounts::Username)
                            .string_len(50)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Accounts::FirstName).string_len(50).null())
                    .col(ColumnDef::new(Accounts::LastName).string_len(50).null())
                    .col(ColumnDef::new(Accounts::ProfilePic).string().null())
                    .col(ColumnDef::new(Accounts::Role).string_len(16).not_null())
                    .col(ColumnDef::new(Accounts::PasswordHash).string().not_null())
                    .col(
                        ColumnDef::new(Accounts::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Accounts::IsStaff)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Accounts::IsSuperuser)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Accounts::LastLogin).big_integer().null())
                    .col(ColumnDef::new(Accounts::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Accounts::UpdatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // 创建登录令牌表（每个账号最多一个令牌）
        manager
            .create_table(
                Table::create()
                    .table(AuthTokens::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AuthTokens::Key)
                            .string_len(40)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(AuthTokens::AccountId)
                            .big_integer()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(AuthTokens::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(AuthTokens::Table, AuthTokens::AccountId)
                            .to(Accounts::Table, Accounts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建教室表
        manager
            .create_table(
                Table::create()
                    .table(Classrooms::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Classrooms::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Classrooms::ClassName)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Classrooms::OwnerTeacherId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Classrooms::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Classrooms::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Classrooms::Table, Classrooms::OwnerTeacherId)
                            .to(Accounts::Table, Accounts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建作业表
        manager
            .create_table(
                Table::create()
                    .table(Assignments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Assignments::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Assignments::Title).string_len(50).not_null())
                    .col(ColumnDef::new(Assignments::Description).text().not_null())
                    .col(ColumnDef::new(Assignments::Attachment).string().not_null())
                    .col(ColumnDef::new(Assignments::ClassroomId).big_integer().null())
                    .col(
                        ColumnDef::new(Assignments::OwnerTeacherId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Assignments::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Assignments::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Assignments::Table, Assignments::ClassroomId)
                            .to(Classrooms::Table, Classrooms::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Assignments::Table, Assignments::OwnerTeacherId)
                            .to(Accounts::Table, Accounts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建作业完成名单（作业与学生多对多）
        manager
            .create_table(
                Table::create()
                    .table(AssignmentCompletions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AssignmentCompletions::AssignmentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AssignmentCompletions::StudentId)
                            .big_integer()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(AssignmentCompletions::AssignmentId)
                            .col(AssignmentCompletions::StudentId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(
                                AssignmentCompletions::Table,
                                AssignmentCompletions::AssignmentId,
                            )
                            .to(Assignments::Table, Assignments::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(
                                AssignmentCompletions::Table,
                                AssignmentCompletions::StudentId,
                            )
                            .to(Accounts::Table, Accounts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建作业提交表
        manager
            .create_table(
                Table::create()
                    .table(Submissions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Submissions::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Submissions::AssignmentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Submissions::Score).integer().null())
                    .col(
                        ColumnDef::new(Submissions::Accepted)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Submissions::Attachment).string().null())
                    .col(ColumnDef::new(Submissions::Notes).text().not_null())
                    .col(
                        ColumnDef::new(Submissions::OwnerStudentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Submissions::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Submissions::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Submissions::Table, Submissions::AssignmentId)
                            .to(Assignments::Table, Assignments::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Submissions::Table, Submissions::OwnerStudentId)
                            .to(Accounts::Table, Accounts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 索引
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_accounts_role")
                    .table(Accounts::Table)
                    .col(Accounts::Role)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_classrooms_owner_teacher_id")
                    .table(Classrooms::Table)
                    .col(Classrooms::OwnerTeacherId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_assignments_owner_teacher_id")
                    .table(Assignments::Table)
                    .col(Assignments::OwnerTeacherId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_assignments_classroom_id")
                    .table(Assignments::Table)
                    .col(Assignments::ClassroomId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_submissions_assignment_id")
                    .table(Submissions::Table)
                    .col(Submissions::AssignmentId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_submissions_owner_student_id")
                    .table(Submissions::Table)
                    .col(Submissions::OwnerStudentId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 按照创建的相反顺序删除
        manager
            .drop_table(Table::drop().table(Submissions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AssignmentCompletions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Assignments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Classrooms::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AuthTokens::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Accounts::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Accounts {
    #[sea_orm(iden = "accounts")]
    Table,
    Id,
    Username,
    FirstName,
    LastName,
    ProfilePic,
    Role,
    PasswordHash,
    IsActive,
    IsStaff,
    IsSuperuser,
    LastLogin,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum AuthTokens {
    #[sea_orm(iden = "auth_tokens")]
    Table,
    Key,
    AccountId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Classrooms {
    #[sea_orm(iden = "classrooms")]
    Table,
    Id,
    ClassName,
    OwnerTeacherId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Assignments {
    #[sea_orm(iden = "assignments")]
    Table,
    Id,
    Title,
    Description,
    Attachment,
    ClassroomId,
    OwnerTeacherId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum AssignmentCompletions {
    #[sea_orm(iden = "assignment_completions")]
    Table,
    AssignmentId,
    StudentId,
}

#[derive(DeriveIden)]
enum Submissions {
    #[sea_orm(iden = "submissions")]
    Table,
    Id,
    AssignmentId,
    Score,
    Accepted,
    Attachment,
    Notes,
    OwnerStudentId,
    CreatedAt,
    UpdatedAt,
}
