use std::path::PathBuf;
use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration related error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Database operation error
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),

    /// Configuration file parse failed
    #[error("Failed to parse configuration file {path}: {reason}")]
    ParseFailed { path: PathBuf, reason: String },

    /// Table name sanitized to nothing
    #[error("Log table name is empty after sanitizing '{name}'")]
    EmptyTableName { name: String },

    /// The column schema is fixed
    #[error("Log table columns are fixed and cannot be redefined")]
    ColumnsFixed,

    /// Read operation before set_table
    #[error("No log table has been set")]
    TableNotSet,

    /// Invalid configuration value
    #[error("Invalid configuration value {field} = '{value}': {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
}

/// 数据库错误
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Opening the database failed
    #[error("Failed to open database {path}: {reason}")]
    OpenFailed { path: PathBuf, reason: String },

    /// CREATE TABLE failed
    #[error("Failed to create table {table}: {reason}")]
    CreateTableFailed { table: String, reason: String },

    /// INSERT failed
    #[error("Failed to insert into {table}: {reason}")]
    InsertFailed { table: String, reason: String },

    /// SELECT or metadata query failed
    #[error("Query on {table} failed: {reason}")]
    QueryFailed { table: String, reason: String },
}

/// 应用程序 Result 类型别名
pub type Result<T> = std::result::Result<T, Error>;

// 辅助宏，用于快速创建错误
#[macro_export]
macro_rules! config_error {
    ($variant:ident { $($field:ident: $value:expr),+ $(,)? }) => {
        $crate::error::Error::Config($crate::error::ConfigError::$variant {
            $($field: $value),+
        })
    };
}

#[macro_export]
macro_rules! database_error {
    ($variant:ident { $($field:ident: $value:expr),+ $(,)? }) => {
        $crate::error::Error::Database($crate::error::DatabaseError::$variant {
            $($field: $value),+
        })
    };
}
