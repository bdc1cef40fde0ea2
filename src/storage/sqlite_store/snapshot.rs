//! 内存库快照
//!
//! 快照就是一个普通的 SQLite 数据库文件：`VACUUM INTO` 写到同目录的临时文件，
//! 再原子地改名覆盖旧快照。恢复时 ATTACH 快照文件，按原样重建表结构并复制
//! 全部数据和 `sqlite_sequence`（自增计数器）。

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use sea_orm::{ConnectionTrait, DatabaseConnection, DbBackend, FromQueryResult, Statement};
use tracing::{debug, warn};

use crate::errors::{CampusError, Result};
use crate::utils::{quote_identifier, quote_literal};

const SNAPSHOT_SCHEMA: &str = "snapshot";

#[derive(Debug, FromQueryResult)]
struct SchemaEntry {
    kind: String,
    name: String,
    sql: Option<String>,
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut file_name = path
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_else(|| "snapshot".into());
    file_name.push(".tmp");
    path.with_file_name(file_name)
}

/// 把当前内存库完整写入 `path`（覆盖）
pub(super) async fn write_snapshot(db: &DatabaseConnection, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }

    // VACUUM INTO 要求目标文件不存在
    let temp_path = temp_path_for(path);
    if temp_path.exists() {
        fs::remove_file(&temp_path)?;
    }

    let sql = format!(
        "VACUUM INTO {}",
        quote_literal(&temp_path.to_string_lossy())
    );
    if let Err(e) = db.execute_unprepared(&sql).await {
        let _ = fs::remove_file(&temp_path);
        return Err(CampusError::persistence(format!("VACUUM INTO 失败: {e}")));
    }

    File::open(&temp_path)?.sync_all()?;
    fs::rename(&temp_path, path)?;
    Ok(())
}

/// 若快照存在则恢复到空的内存库，返回是否恢复
pub(super) async fn restore_snapshot(db: &DatabaseConnection, path: &Path) -> Result<bool> {
    if !path.exists() {
        return Ok(false);
    }

    let attach = format!(
        "ATTACH DATABASE {} AS {SNAPSHOT_SCHEMA}",
        quote_literal(&path.to_string_lossy())
    );
    db.execute_unprepared(&attach)
        .await
        .map_err(|e| CampusError::database_connection(format!("无法打开快照文件: {e}")))?;

    let copied = copy_attached(db).await;

    // 无论复制是否成功都要恢复外键检查并分离快照
    let fk_on = db.execute_unprepared("PRAGMA foreign_keys = ON").await;
    let detach = db
        .execute_unprepared(&format!("DETACH DATABASE {SNAPSHOT_SCHEMA}"))
        .await;

    copied?;
    fk_on?;
    if let Err(e) = detach {
        warn!("Failed to detach snapshot database: {}", e);
    }
    Ok(true)
}

async fn copy_attached(db: &DatabaseConnection) -> Result<()> {
    let entries = SchemaEntry::find_by_statement(Statement::from_string(
        DbBackend::Sqlite,
        format!(
            "SELECT type AS kind, name, sql FROM {SNAPSHOT_SCHEMA}.sqlite_master \
             WHERE name NOT LIKE 'sqlite_%' \
             ORDER BY CASE type WHEN 'table' THEN 0 ELSE 1 END"
        ),
    ))
    .all(db)
    .await
    .map_err(|e| CampusError::database_connection(format!("读取快照结构失败: {e}")))?;

    // 空文件也能 ATTACH 成功，不能当作恢复成功
    if !entries.iter().any(|entry| entry.kind == "table") {
        return Err(CampusError::database_connection("快照文件中没有任何表"));
    }

    db.execute_unprepared("PRAGMA foreign_keys = OFF").await?;

    // 表在前，索引等在后；自动索引没有 sql
    for entry in &entries {
        if let Some(sql) = &entry.sql {
            db.execute_unprepared(sql).await.map_err(|e| {
                CampusError::database_operation(format!("重建 {} 失败: {e}", entry.name))
            })?;
        }
    }

    for table in entries.iter().filter(|entry| entry.kind == "table") {
        let name = quote_identifier(&table.name);
        let sql = format!("INSERT INTO main.{name} SELECT * FROM {SNAPSHOT_SCHEMA}.{name}");
        let result = db.execute_unprepared(&sql).await.map_err(|e| {
            CampusError::database_operation(format!("复制表 {} 失败: {e}", table.name))
        })?;
        debug!(
            "Restored {} row(s) into {}",
            result.rows_affected(),
            table.name
        );
    }

    // 自增计数器单独复制，保证与快照时完全一致
    let has_sequence = SchemaEntry::find_by_statement(Statement::from_string(
        DbBackend::Sqlite,
        format!(
            "SELECT type AS kind, name, sql FROM {SNAPSHOT_SCHEMA}.sqlite_master \
             WHERE name = 'sqlite_sequence'"
        ),
    ))
    .one(db)
    .await?
    .is_some();

    if has_sequence {
        db.execute_unprepared("DELETE FROM main.sqlite_sequence")
            .await?;
        db.execute_unprepared(&format!(
            "INSERT INTO main.sqlite_sequence (name, seq) \
             SELECT name, seq FROM {SNAPSHOT_SCHEMA}.sqlite_sequence"
        ))
        .await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temp_path_is_sibling() {
        let temp = temp_path_for(Path::new("data/university.db"));
        assert_eq!(temp, PathBuf::from("data/university.db.tmp"));
    }
}
