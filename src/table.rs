//! 表管理能力 - 存在性检查、建表、参数化插入与查询
//!
//! Logger 以组合方式持有 TableStore，表管理行为不与日志语义耦合。
//! 查询通过 Condition 描述（WHERE 文本 + 命名参数 + ORDER BY + LIMIT）。

use crate::error::{DatabaseError, Error, Result};
use crate::schema::Column;
use log::{debug, info};
use rusqlite::types::Value;
use rusqlite::{Connection, ToSql};
use std::collections::HashMap;
use std::path::Path;

/// 查询返回的一行：列名 -> SQL 值
pub type SqlRow = HashMap<String, Value>;

/// 通用查询条件
///
/// WHERE 子句中的命名参数使用 `:name` 形式，与 with_param 的参数名一致。
#[derive(Debug, Default, Clone)]
pub struct Condition {
    where_clause: Option<String>,
    params: Vec<(String, Value)>,
    order_by: Option<String>,
    limit: Option<usize>,
}

impl Condition {
    /// 创建空条件
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置 WHERE 子句文本
    pub fn with_where(mut self, clause: impl Into<String>) -> Self {
        self.where_clause = Some(clause.into());
        self
    }

    /// 绑定命名参数（参数名需带冒号）
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.push((name.into(), value.into()));
        self
    }

    /// 设置 ORDER BY 子句文本
    pub fn with_order_by(mut self, order_by: impl Into<String>) -> Self {
        self.order_by = Some(order_by.into());
        self
    }

    /// 设置 LIMIT
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// 条件是否为空（空条件由调用方决定默认排序）
    pub fn is_empty(&self) -> bool {
        self.where_clause.is_none()
            && self.params.is_empty()
            && self.order_by.is_none()
            && self.limit.is_none()
    }
}

/// 表管理接口 - 所有存储后端必须实现此接口
pub trait TableStore {
    /// 表是否已存在
    fn has_table(&self, name: &str) -> Result<bool>;

    /// 按列定义建表（可选 collation 透传给文本列）
    fn create_table(&self, name: &str, columns: &[Column], collation: Option<&str>) -> Result<()>;

    /// 参数化插入一条记录（按列名绑定），返回自增 id
    fn insert(&self, table: &str, record: &[(String, Value)]) -> Result<i64>;

    /// 按条件查询
    fn select(&self, table: &str, condition: &Condition) -> Result<Vec<SqlRow>>;
}

/// 基于 rusqlite 的 TableStore 实现
#[derive(Debug)]
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// 打开（或创建）数据库文件，父目录缺失时一并创建
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();
        if let Some(parent) = path_ref.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    Error::Database(DatabaseError::OpenFailed {
                        path: path_ref.to_path_buf(),
                        reason: format!("Failed to create directory: {e}"),
                    })
                })?;
            }
        }

        let conn = Connection::open(path_ref).map_err(|e| {
            Error::Database(DatabaseError::OpenFailed {
                path: path_ref.to_path_buf(),
                reason: e.to_string(),
            })
        })?;

        info!("SQLite database opened: {}", path_ref.display());
        Ok(Self { conn })
    }

    /// 打开内存数据库（主要用于测试）
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|e| {
            Error::Database(DatabaseError::OpenFailed {
                path: ":memory:".into(),
                reason: e.to_string(),
            })
        })?;
        Ok(Self { conn })
    }

    /// 复用既有连接
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }
}

impl TableStore for SqliteStore {
    fn has_table(&self, name: &str) -> Result<bool> {
        let count: i64 = self
            .conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
                rusqlite::params![name],
                |row| row.get(0),
            )
            .map_err(|e| {
                Error::Database(DatabaseError::QueryFailed {
                    table: name.to_string(),
                    reason: e.to_string(),
                })
            })?;
        Ok(count > 0)
    }

    fn create_table(&self, name: &str, columns: &[Column], collation: Option<&str>) -> Result<()> {
        let definitions: Vec<String> = columns.iter().map(|c| c.ddl(collation)).collect();
        let sql = format!(
            "CREATE TABLE IF NOT EXISTS {} ({})",
            name,
            definitions.join(", ")
        );

        self.conn.execute(&sql, []).map_err(|e| {
            Error::Database(DatabaseError::CreateTableFailed {
                table: name.to_string(),
                reason: e.to_string(),
            })
        })?;

        info!("Table created or already exists: {name}");
        Ok(())
    }

    fn insert(&self, table: &str, record: &[(String, Value)]) -> Result<i64> {
        let insert_failed = |e: rusqlite::Error| {
            Error::Database(DatabaseError::InsertFailed {
                table: table.to_string(),
                reason: e.to_string(),
            })
        };

        let columns: Vec<&str> = record.iter().map(|(name, _)| name.as_str()).collect();
        let placeholders: Vec<String> =
            record.iter().map(|(name, _)| format!(":{name}")).collect();
        let sql = format!(
            "INSERT INTO {}({}) VALUES({})",
            table,
            columns.join(", "),
            placeholders.join(", ")
        );

        let mut stmt = self.conn.prepare(&sql).map_err(insert_failed)?;
        let bound: Vec<(&str, &dyn ToSql)> = placeholders
            .iter()
            .zip(record.iter())
            .map(|(placeholder, (_, value))| (placeholder.as_str(), value as &dyn ToSql))
            .collect();
        stmt.execute(&bound[..]).map_err(insert_failed)?;

        let id = self.conn.last_insert_rowid();
        debug!("Inserted row {id} into {table}");
        Ok(id)
    }

    fn select(&self, table: &str, condition: &Condition) -> Result<Vec<SqlRow>> {
        let query_failed = |e: rusqlite::Error| {
            Error::Database(DatabaseError::QueryFailed {
                table: table.to_string(),
                reason: e.to_string(),
            })
        };

        let mut sql = format!("SELECT * FROM {table}");
        if let Some(where_clause) = &condition.where_clause {
            sql.push_str(&format!(" WHERE {where_clause}"));
        }
        if let Some(order_by) = &condition.order_by {
            sql.push_str(&format!(" ORDER BY {order_by}"));
        }
        if let Some(limit) = condition.limit {
            sql.push_str(&format!(" LIMIT {limit}"));
        }

        let mut stmt = self.conn.prepare(&sql).map_err(query_failed)?;
        // 列名要在 query 借用 stmt 之前取出
        let column_names: Vec<String> = stmt
            .column_names()
            .iter()
            .map(|name| (*name).to_string())
            .collect();

        let bound: Vec<(&str, &dyn ToSql)> = condition
            .params
            .iter()
            .map(|(name, value)| (name.as_str(), value as &dyn ToSql))
            .collect();
        let mut rows = stmt.query(&bound[..]).map_err(query_failed)?;

        let mut records = Vec::new();
        while let Some(row) = rows.next().map_err(query_failed)? {
            let mut record = SqlRow::new();
            for (index, name) in column_names.iter().enumerate() {
                let value: Value = row.get(index).map_err(query_failed)?;
                record.insert(name.clone(), value);
            }
            records.push(record);
        }
        Ok(records)
    }
}
