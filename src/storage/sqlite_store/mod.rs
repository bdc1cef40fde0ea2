//! SQLite 内存存储实现
//!
//! 全部关系数据保存在进程内的 SQLite 内存库中，每次成功写入（或事务提交）后
//! 同步把整库快照写回磁盘。写操作通过 `write_lock` 串行化。

mod assignments;
mod attendance;
mod courses;
mod events;
mod snapshot;
mod submissions;
mod users;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use futures_util::future::BoxFuture;
use migration::{Migrator, MigratorTrait};
use sea_orm::{
    ConnectionTrait, DatabaseConnection, DatabaseTransaction, DbBackend, ExecResult,
    FromQueryResult, Statement, TransactionTrait, Value,
};
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use crate::config::DatabaseConfig;
use crate::errors::{CampusError, Result};

/// 存储打开参数
#[derive(Debug, Clone)]
pub struct StoreOptions {
    pub snapshot_path: PathBuf,
    pub acquire_timeout: Duration,
}

impl StoreOptions {
    pub fn new(snapshot_path: impl Into<PathBuf>) -> Self {
        Self {
            snapshot_path: snapshot_path.into(),
            acquire_timeout: Duration::from_secs(10),
        }
    }

    pub fn from_config(config: &DatabaseConfig) -> Self {
        Self {
            snapshot_path: PathBuf::from(&config.snapshot_path),
            acquire_timeout: Duration::from_secs(config.acquire_timeout),
        }
    }
}

/// 带快照持久化的事务性存储
///
/// 克隆共享同一个内存库和同一把写锁。
#[derive(Clone)]
pub struct Store {
    db: DatabaseConnection,
    snapshot_path: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

/// 事务句柄
///
/// 只在 [`Store::transaction`] 的闭包内可用。事务体内的读写都必须走这个句柄：
/// 连接池只有一个连接，事务期间再通过 `Store` 读取会一直等到获取连接超时。
pub struct StoreTransaction {
    txn: DatabaseTransaction,
}

impl Store {
    /// 打开存储：有快照则恢复，没有则从空库开始，然后执行迁移
    pub async fn open(options: StoreOptions) -> Result<Self> {
        let db = Self::connect_memory(&options).await?;

        let restored = snapshot::restore_snapshot(&db, &options.snapshot_path).await?;
        if restored {
            info!(
                "Restored in-memory store from snapshot {}",
                options.snapshot_path.display()
            );
        } else {
            info!(
                "No snapshot at {}, starting with an empty store",
                options.snapshot_path.display()
            );
        }

        // 运行迁移
        Migrator::up(&db, None)
            .await
            .map_err(|e| CampusError::database_operation(format!("数据库迁移失败: {e}")))?;

        Ok(Self {
            db,
            snapshot_path: options.snapshot_path,
            write_lock: Arc::new(Mutex::new(())),
        })
    }

    /// 单连接内存库：连接永不过期，否则内存库会随连接一起消失
    async fn connect_memory(options: &StoreOptions) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

        // 不能用 `sqlite::memory:`：它带 SQLITE_OPEN_MEMORY，之后 ATTACH 和
        // VACUUM INTO 的目标也会变成内存库，快照永远落不了盘
        let opt = SqliteConnectOptions::new()
            .filename(":memory:")
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .acquire_timeout(options.acquire_timeout)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(opt)
            .await
            .map_err(|e| CampusError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 快照文件路径
    pub fn snapshot_path(&self) -> &Path {
        &self.snapshot_path
    }

    /// 构造带参数的语句
    pub fn statement<I>(sql: &str, values: I) -> Statement
    where
        I: IntoIterator<Item = Value>,
    {
        Statement::from_sql_and_values(DbBackend::Sqlite, sql, values)
    }

    /// 查询至多一行；谓词的选择性由调用方保证，这里只取第一行
    pub async fn query_one<R>(&self, stmt: Statement) -> Result<Option<R>>
    where
        R: FromQueryResult,
    {
        R::find_by_statement(stmt)
            .one(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询失败: {e}")))
    }

    /// 查询多行，保持引擎返回的顺序
    pub async fn query_many<R>(&self, stmt: Statement) -> Result<Vec<R>>
    where
        R: FromQueryResult,
    {
        R::find_by_statement(stmt)
            .all(&self.db)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询失败: {e}")))
    }

    /// 执行单条写语句，返回前快照已经落盘
    pub async fn mutate(&self, stmt: Statement) -> Result<ExecResult> {
        let _guard = self.write_lock.lock().await;

        let result = self
            .db
            .execute_raw(stmt)
            .await
            .map_err(|e| CampusError::database_operation(format!("写入失败: {e}")))?;

        self.flush_locked().await?;
        Ok(result)
    }

    /// 在一个事务中执行 `body`
    ///
    /// `body` 返回错误时回滚且不写快照，错误以 `Transaction` 返回；
    /// 成功时提交并只写一次快照。整个过程持有写锁。
    pub async fn transaction<F, T>(&self, body: F) -> Result<T>
    where
        F: for<'c> FnOnce(&'c StoreTransaction) -> BoxFuture<'c, Result<T>> + Send,
        T: Send,
    {
        let _guard = self.write_lock.lock().await;

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| CampusError::transaction(format!("开启事务失败: {e}")))?;
        let handle = StoreTransaction { txn };

        let outcome = body(&handle).await;

        match outcome {
            Ok(value) => {
                handle
                    .txn
                    .commit()
                    .await
                    .map_err(|e| CampusError::transaction(format!("提交事务失败: {e}")))?;
                self.flush_locked().await?;
                Ok(value)
            }
            Err(e) => {
                if let Err(rollback_err) = handle.txn.rollback().await {
                    error!("Rollback failed after transaction error: {}", rollback_err);
                }
                warn!("Transaction rolled back: {}", e);
                Err(CampusError::transaction(format!("事务已回滚: {e}")))
            }
        }
    }

    /// 立即写一次快照
    pub async fn flush(&self) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        self.flush_locked().await
    }

    /// 调用方必须已持有写锁
    async fn flush_locked(&self) -> Result<()> {
        match snapshot::write_snapshot(&self.db, &self.snapshot_path).await {
            Ok(()) => {
                debug!("Snapshot written to {}", self.snapshot_path.display());
                Ok(())
            }
            Err(e) => {
                error!(
                    "Failed to write snapshot {}: {}",
                    self.snapshot_path.display(),
                    e
                );
                Err(CampusError::persistence(format!(
                    "快照写入失败 ({}): {}",
                    self.snapshot_path.display(),
                    e.message()
                )))
            }
        }
    }

    /// 列出所有用户表及其行数
    pub async fn table_row_counts(&self) -> Result<Vec<(String, i64)>> {
        #[derive(FromQueryResult)]
        struct TableName {
            name: String,
        }

        #[derive(FromQueryResult)]
        struct RowCount {
            count: i64,
        }

        let tables: Vec<TableName> = self
            .query_many(Statement::from_string(
                DbBackend::Sqlite,
                "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
            ))
            .await?;

        let mut counts = Vec::with_capacity(tables.len());
        for table in tables {
            let sql = format!(
                "SELECT COUNT(*) AS count FROM {}",
                crate::utils::quote_identifier(&table.name)
            );
            let count = self
                .query_one::<RowCount>(Statement::from_string(DbBackend::Sqlite, sql))
                .await?
                .map(|row| row.count)
                .unwrap_or(0);
            counts.push((table.name, count));
        }
        Ok(counts)
    }
}

impl StoreTransaction {
    pub async fn query_one<R>(&self, stmt: Statement) -> Result<Option<R>>
    where
        R: FromQueryResult,
    {
        R::find_by_statement(stmt)
            .one(&self.txn)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询失败: {e}")))
    }

    pub async fn query_many<R>(&self, stmt: Statement) -> Result<Vec<R>>
    where
        R: FromQueryResult,
    {
        R::find_by_statement(stmt)
            .all(&self.txn)
            .await
            .map_err(|e| CampusError::database_operation(format!("查询失败: {e}")))
    }

    /// 事务内写入，不单独写快照
    pub async fn mutate(&self, stmt: Statement) -> Result<ExecResult> {
        self.txn
            .execute_raw(stmt)
            .await
            .map_err(|e| CampusError::database_operation(format!("写入失败: {e}")))
    }
}

// Storage trait 实现
use crate::models::{
    assignments::{entities::Assignment, requests::CreateAssignmentRequest},
    attendance::{
        entities::{AttendanceRecord, AttendanceStatus},
        requests::AttendanceRecordQuery,
    },
    courses::entities::{Course, RosterStudent},
    events::entities::Event,
    submissions::{
        entities::{Submission, SubmissionListItem},
        requests::NewSubmission,
    },
    users::{entities::User, requests::CreateUserRequest},
};
use crate::storage::Storage;
use async_trait::async_trait;

#[async_trait]
impl Storage for Store {
    // 用户模块
    async fn create_user(&self, user: CreateUserRequest) -> Result<User> {
        self.create_user_impl(user).await
    }

    async fn count_users(&self) -> Result<i64> {
        self.count_users_impl().await
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        self.get_user_by_id_impl(id).await
    }

    async fn get_user_by_credentials(&self, email: &str, password: &str) -> Result<Option<User>> {
        self.get_user_by_credentials_impl(email, password).await
    }

    // 课程模块
    async fn create_course(&self, name: &str, code: &str) -> Result<Course> {
        self.create_course_impl(name, code).await
    }

    async fn list_courses(&self) -> Result<Vec<Course>> {
        self.list_courses_impl().await
    }

    async fn is_enrolled(&self, user_id: i64, course_id: i64) -> Result<bool> {
        self.is_enrolled_impl(user_id, course_id).await
    }

    async fn list_course_students(&self, course_id: i64) -> Result<Vec<RosterStudent>> {
        self.list_course_students_impl(course_id).await
    }

    // 考勤模块
    async fn mark_attendance(
        &self,
        course_id: i64,
        session_date: &str,
        marked_by: i64,
        marks: Vec<(i64, AttendanceStatus)>,
    ) -> Result<usize> {
        self.mark_attendance_impl(course_id, session_date, marked_by, marks)
            .await
    }

    async fn list_attendance_records(
        &self,
        query: AttendanceRecordQuery,
    ) -> Result<Vec<AttendanceRecord>> {
        self.list_attendance_records_impl(query).await
    }

    // 作业模块
    async fn create_assignment(&self, req: CreateAssignmentRequest) -> Result<Assignment> {
        self.create_assignment_impl(req).await
    }

    async fn get_assignment_by_id(&self, id: i64) -> Result<Option<Assignment>> {
        self.get_assignment_by_id_impl(id).await
    }

    async fn list_assignments(&self, course_id: Option<i64>) -> Result<Vec<Assignment>> {
        self.list_assignments_impl(course_id).await
    }

    // 提交模块
    async fn create_submission(&self, submission: NewSubmission) -> Result<Submission> {
        self.create_submission_impl(submission).await
    }

    async fn list_student_submissions(&self, student_id: i64) -> Result<Vec<SubmissionListItem>> {
        self.list_submissions_impl(Some(student_id)).await
    }

    async fn list_all_submissions(&self) -> Result<Vec<SubmissionListItem>> {
        self.list_submissions_impl(None).await
    }

    // 活动模块
    async fn list_upcoming_events(&self, limit: u64) -> Result<Vec<Event>> {
        self.list_upcoming_events_impl(limit).await
    }
}
