//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod accounts;
mod assignments;
mod classrooms;
mod submissions;
mod tokens;

pub use accounts::{students, teachers};

use crate::config::AppConfig;
use crate::errors::{Result, SchoolError};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr, SqlErr};
use std::time::Duration;
use tracing::{info, warn};

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 创建新的 SeaORM 存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        let db_url = Self::build_database_url(&config.database.url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite://") {
            Self::connect_sqlite(&db_url, config).await?
        } else {
            Self::connect_generic(&db_url, config).await?
        };

        // 运行迁移
        Migrator::up(&db, None)
            .await
            .map_err(|e| SchoolError::database_operation(format!("数据库迁移失败: {e}")))?;

        info!("SeaORM storage ready, database: {}", db_url);

        Ok(Self { db })
    }

    /// 内存 SQLite（单连接，测试使用）
    pub async fn in_memory() -> Result<Self> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| SchoolError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .foreign_keys(true);

        // 内存库随连接销毁，必须始终保持同一个连接
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(opt)
            .await
            .map_err(|e| SchoolError::database_connection(format!("SQLite 连接失败: {e}")))?;

        let db = SqlxSqliteConnector::from_sqlx_sqlite_pool(pool);
        Migrator::up(&db, None)
            .await
            .map_err(|e| SchoolError::database_operation(format!("数据库迁移失败: {e}")))?;

        Ok(Self { db })
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| SchoolError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .foreign_keys(true)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory")
            .pragma("mmap_size", "536870912")
            .pragma("wal_autocheckpoint", "1000");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.database.pool_size)
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(300))
            .connect_with(opt)
            .await
            .map_err(|e| SchoolError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.database.pool_size)
            .min_connections(5)
            .connect_timeout(Duration::from_secs(config.database.timeout))
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| SchoolError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite://") {
            Ok(url.to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") || url == ":memory:" {
            Ok(format!("sqlite://{}?mode=rwc", url))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(SchoolError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }
}

/// 唯一约束冲突时返回给客户端的固定信息，具体约束只写日志
pub(crate) const CONFLICT_MESSAGE: &str = "Resource already exists";

/// 数据库错误转换：唯一约束冲突 -> Conflict，外键约束 -> Validation，其余为数据库操作错误
pub(crate) fn db_error(context: &'static str) -> impl Fn(DbErr) -> SchoolError {
    move |e| match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => {
            warn!("{context}: {detail}");
            SchoolError::conflict(CONFLICT_MESSAGE)
        }
        Some(SqlErr::ForeignKeyConstraintViolation(detail)) => {
            SchoolError::validation(format!("{context}: {detail}"))
        }
        _ => SchoolError::database_operation(format!("{context}: {e}")),
    }
}

// Storage trait 实现
use crate::models::{
    accounts::{
        entities::{Account, AccountRole},
        requests::{AccountListQuery, AccountUpdate, NewAccount},
        responses::AccountListResponse,
    },
    assignments::{
        entities::Assignment,
        requests::{AssignmentListQuery, AssignmentUpdate, NewAssignment},
        responses::AssignmentListResponse,
    },
    classrooms::{
        entities::Classroom, requests::ClassroomListQuery, responses::ClassroomListResponse,
    },
    submissions::{
        entities::Submission,
        requests::{NewSubmission, SubmissionListQuery, SubmissionUpdate},
        responses::SubmissionListResponse,
    },
};
use crate::storage::Storage;
use async_trait::async_trait;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 账号模块
    async fn create_account(&self, account: NewAccount) -> Result<Account> {
        self.create_account_impl(account).await
    }

    async fn get_account_by_id(&self, id: i64) -> Result<Option<Account>> {
        self.get_account_by_id_impl(id).await
    }

    async fn get_account_by_username(&self, username: &str) -> Result<Option<Account>> {
        self.get_account_by_username_impl(username).await
    }

    async fn get_scoped_account(&self, role: AccountRole, id: i64) -> Result<Option<Account>> {
        self.get_scoped_account_impl(role, id).await
    }

    async fn list_accounts_with_pagination(
        &self,
        role: AccountRole,
        query: AccountListQuery,
    ) -> Result<AccountListResponse> {
        self.list_accounts_with_pagination_impl(role, query).await
    }

    async fn update_account(&self, id: i64, update: AccountUpdate) -> Result<Option<Account>> {
        self.update_account_impl(id, update).await
    }

    async fn set_account_active(&self, id: i64, active: bool) -> Result<bool> {
        self.set_account_active_impl(id, active).await
    }

    async fn update_last_login(&self, id: i64) -> Result<bool> {
        self.update_last_login_impl(id).await
    }

    async fn count_superusers(&self) -> Result<u64> {
        self.count_superusers_impl().await
    }

    async fn filter_student_ids(&self, ids: &[i64]) -> Result<Vec<i64>> {
        self.filter_student_ids_impl(ids).await
    }

    // 令牌模块
    async fn get_or_create_token(&self, account_id: i64) -> Result<String> {
        self.get_or_create_token_impl(account_id).await
    }

    async fn get_account_by_token(&self, key: &str) -> Result<Option<Account>> {
        self.get_account_by_token_impl(key).await
    }

    async fn get_token_by_account_id(&self, account_id: i64) -> Result<Option<String>> {
        self.get_token_by_account_id_impl(account_id).await
    }

    async fn delete_token(&self, account_id: i64) -> Result<Option<String>> {
        self.delete_token_impl(account_id).await
    }

    // 教室模块
    async fn create_classroom(&self, owner_teacher: i64, class_name: String) -> Result<Classroom> {
        self.create_classroom_impl(owner_teacher, class_name).await
    }

    async fn get_classroom_by_id(&self, id: i64) -> Result<Option<Classroom>> {
        self.get_classroom_by_id_impl(id).await
    }

    async fn list_classrooms_with_pagination(
        &self,
        query: ClassroomListQuery,
    ) -> Result<ClassroomListResponse> {
        self.list_classrooms_with_pagination_impl(query).await
    }

    async fn update_classroom(
        &self,
        id: i64,
        class_name: Option<String>,
    ) -> Result<Option<Classroom>> {
        self.update_classroom_impl(id, class_name).await
    }

    async fn delete_classroom(&self, id: i64) -> Result<bool> {
        self.delete_classroom_impl(id).await
    }

    // 作业模块
    async fn create_assignment(&self, assignment: NewAssignment) -> Result<Assignment> {
        self.create_assignment_impl(assignment).await
    }

    async fn get_assignment_by_id(&self, id: i64) -> Result<Option<Assignment>> {
        self.get_assignment_by_id_impl(id).await
    }

    async fn list_assignments_with_pagination(
        &self,
        query: AssignmentListQuery,
    ) -> Result<AssignmentListResponse> {
        self.list_assignments_with_pagination_impl(query).await
    }

    async fn update_assignment(
        &self,
        id: i64,
        update: AssignmentUpdate,
    ) -> Result<Option<Assignment>> {
        self.update_assignment_impl(id, update).await
    }

    async fn delete_assignment(&self, id: i64) -> Result<bool> {
        self.delete_assignment_impl(id).await
    }

    // 提交模块
    async fn create_submission(&self, submission: NewSubmission) -> Result<Submission> {
        self.create_submission_impl(submission).await
    }

    async fn get_submission_by_id(&self, id: i64) -> Result<Option<Submission>> {
        self.get_submission_by_id_impl(id).await
    }

    async fn list_submissions_with_pagination(
        &self,
        query: SubmissionListQuery,
    ) -> Result<SubmissionListResponse> {
        self.list_submissions_with_pagination_impl(query).await
    }

    async fn update_submission(
        &self,
        id: i64,
        update: SubmissionUpdate,
    ) -> Result<Option<Submission>> {
        self.update_submission_impl(id, update).await
    }

    async fn delete_submission(&self, id: i64) -> Result<bool> {
        self.delete_submission_impl(id).await
    }
}
