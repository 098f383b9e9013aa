use crate::config_error;
use crate::error::{ConfigError, Error, Result};
use crate::logger::sanitize_table_name;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// 引导配置：数据库位置与日志表绑定参数
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub logger: LoggerConfig,
}

impl Config {
    /// 从文件加载配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|_| Error::Config(ConfigError::NotFound(path.to_path_buf())))?;
        Self::from_str(&content, path.to_path_buf())
    }

    /// 从字符串解析配置
    pub fn from_str(content: &str, path: PathBuf) -> Result<Self> {
        let config: Config = toml::from_str(content).map_err(|e| {
            Error::Config(ConfigError::ParseFailed {
                path,
                reason: e.to_string(),
            })
        })?;

        // 验证配置
        config.validate()?;

        Ok(config)
    }

    /// 验证配置的有效性
    pub fn validate(&self) -> Result<()> {
        self.database.validate()?;
        self.logger.validate()?;
        Ok(())
    }
}

/// 数据库配置
#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// SQLite 数据库文件路径
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: "logs/tablelog.db".to_string(),
        }
    }
}

impl DatabaseConfig {
    /// 获取数据库文件路径
    pub fn path(&self) -> &str {
        &self.path
    }

    /// 验证配置
    pub fn validate(&self) -> Result<()> {
        if self.path.trim().is_empty() {
            return Err(config_error!(InvalidValue {
                field: "database.path".to_string(),
                value: self.path.clone(),
                reason: "Database path cannot be empty".to_string(),
            }));
        }
        Ok(())
    }
}

/// 日志表配置
#[derive(Debug, Deserialize, Clone)]
pub struct LoggerConfig {
    /// 日志表逻辑名（清洗后追加 _log 后缀）
    pub table: String,
    /// 建表时透传给文本列的 collation
    #[serde(default)]
    pub collation: Option<String>,
    /// 写入时作为 created_by 的操作者 id
    #[serde(default)]
    pub actor: Option<i64>,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            table: "default".to_string(),
            collation: None,
            actor: None,
        }
    }
}

impl LoggerConfig {
    /// 获取日志表逻辑名
    pub fn table(&self) -> &str {
        &self.table
    }

    /// 获取 collation
    pub fn collation(&self) -> Option<&str> {
        self.collation.as_deref()
    }

    /// 获取操作者 id
    pub fn actor(&self) -> Option<i64> {
        self.actor
    }

    /// 验证配置（表名清洗后不能为空）
    pub fn validate(&self) -> Result<()> {
        if sanitize_table_name(&self.table).is_empty() {
            return Err(config_error!(InvalidValue {
                field: "logger.table".to_string(),
                value: self.table.clone(),
                reason: "Table name is empty after sanitizing".to_string(),
            }));
        }
        Ok(())
    }
}
