//! Logger 门面 - 分级日志写入 SQL 表，按 id 或条件读取
//!
//! 表在首次 set_table 时惰性创建；message 以原始模板入库，
//! 读取时才对 `{{ key }}` 占位符做插值。写入是即发即弃语义：
//! 插入失败不会上抛，只交给可注入的失败回调观察。

use crate::config::Config;
use crate::config_error;
use crate::constants::{
    CONTEXT_READ_ERROR_KEY, CONTEXT_WRITE_ERROR_KEY, DATETIME_FORMAT, LEVEL_ALERT, LEVEL_CRITICAL,
    LEVEL_DEBUG, LEVEL_EMERGENCY, LEVEL_ERROR, LEVEL_INFO, LEVEL_NOTICE, LEVEL_WARNING,
    TABLE_SUFFIX,
};
use crate::entry::LogEntry;
use crate::error::{ConfigError, Error, Result};
use crate::schema::{Column, DataType, log_columns};
use crate::table::{Condition, SqlRow, SqliteStore, TableStore};
use chrono::Local;
use log::warn;
use rusqlite::types::Value as SqlValue;
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::fmt;

/// 写入失败的观察回调
pub type WriteErrorHook = Box<dyn Fn(&Error)>;

/// 持久化日志记录器
///
/// 两个状态：未绑定表（log 为空操作，读操作报错）和已绑定表。
/// set_table 完成一次 未绑定 -> 已绑定 的迁移，没有反向迁移。
pub struct Logger {
    store: Box<dyn TableStore>,
    columns: Vec<Column>,
    table: Option<String>,
    actor: Option<i64>,
    on_write_error: Option<WriteErrorHook>,
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("table", &self.table)
            .field("actor", &self.actor)
            .finish_non_exhaustive()
    }
}

impl Logger {
    /// 创建未绑定表的 Logger
    pub fn new(store: Box<dyn TableStore>) -> Self {
        Self {
            store,
            columns: log_columns(),
            table: None,
            actor: None,
            on_write_error: None,
        }
    }

    /// 注入当前操作者 id，写入时作为 created_by 落库
    pub fn with_actor(mut self, actor: i64) -> Self {
        self.actor = Some(actor);
        self
    }

    /// 注入写入失败的观察回调（默认仅记录 warn 日志）
    pub fn with_write_error_hook(mut self, hook: impl Fn(&Error) + 'static) -> Self {
        self.on_write_error = Some(Box::new(hook));
        self
    }

    /// 从配置引导：打开数据库并绑定日志表
    pub fn from_config(config: &Config) -> Result<Self> {
        let store = SqliteStore::open(config.database.path())?;
        let mut logger = Self::new(Box::new(store));
        if let Some(actor) = config.logger.actor() {
            logger = logger.with_actor(actor);
        }
        logger.set_table(config.logger.table(), config.logger.collation())?;
        Ok(logger)
    }

    /// 绑定（并在缺失时创建）日志表
    ///
    /// 表名先按 [A-Za-z0-9_-] 清洗再追加 _log 后缀；清洗后为空视为配置错误。
    /// 表已存在时不做任何修改，列结构从不变更。重复调用是幂等的。
    pub fn set_table(&mut self, name: &str, collation: Option<&str>) -> Result<()> {
        let sanitized = sanitize_table_name(name);
        if sanitized.is_empty() {
            return Err(config_error!(EmptyTableName {
                name: name.to_string(),
            }));
        }

        let table = format!("{sanitized}{TABLE_SUFFIX}");
        if !self.store.has_table(&table)? {
            self.store.create_table(&table, &self.columns, collation)?;
        }
        self.table = Some(table);
        Ok(())
    }

    /// 列结构固定，任何覆盖尝试都会失败
    pub fn set_columns(&mut self, _columns: Vec<Column>) -> Result<()> {
        Err(Error::Config(ConfigError::ColumnsFixed))
    }

    /// 当前绑定的物理表名
    pub fn table_name(&self) -> Option<&str> {
        self.table.as_deref()
    }

    /// 固定的列定义
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|column| column.name() == name)
    }

    /// 写入一条日志（即发即弃）
    ///
    /// 未绑定表时静默丢弃；插入失败不上抛，交给失败回调。
    pub fn log<C: Serialize>(&self, level: &str, message: &str, context: &C) {
        self.dispatch(self.actor, level, message, context);
    }

    /// 指定操作者写入一条日志
    pub fn log_as<C: Serialize>(&self, actor: i64, level: &str, message: &str, context: &C) {
        self.dispatch(Some(actor), level, message, context);
    }

    fn dispatch<C: Serialize>(&self, actor: Option<i64>, level: &str, message: &str, context: &C) {
        if self.table.is_none() {
            return;
        }
        if let Err(e) = self.try_log_as(actor, level, message, context) {
            match &self.on_write_error {
                Some(hook) => hook(&e),
                None => warn!("log entry dropped: {e}"),
            }
        }
    }

    /// 写入一条日志并返回新行 id
    pub fn try_log<C: Serialize>(&self, level: &str, message: &str, context: &C) -> Result<i64> {
        self.try_log_as(self.actor, level, message, context)
    }

    /// 指定操作者写入一条日志并返回新行 id
    pub fn try_log_as<C: Serialize>(
        &self,
        actor: Option<i64>,
        level: &str,
        message: &str,
        context: &C,
    ) -> Result<i64> {
        let table = self
            .table
            .as_deref()
            .ok_or(Error::Config(ConfigError::TableNotSet))?;

        // 上下文序列化失败不会让写入失败，改存哨兵对象
        let context_text = match serde_json::to_string(context) {
            Ok(text) => text,
            Err(e) => {
                warn!("log context serialization failed: {e}");
                serde_json::json!({ (CONTEXT_WRITE_ERROR_KEY): e.to_string() }).to_string()
            }
        };

        let mut record: Vec<(String, JsonValue)> = vec![
            ("level".to_string(), JsonValue::from(level)),
            ("message".to_string(), JsonValue::from(message)),
            ("context".to_string(), JsonValue::from(context_text)),
            (
                "created_at".to_string(),
                JsonValue::from(Local::now().format(DATETIME_FORMAT).to_string()),
            ),
        ];
        if let Some(actor) = actor {
            record.push(("created_by".to_string(), JsonValue::from(actor)));
        }

        // 每个字段按列声明的数据类型绑定
        let bound: Vec<(String, SqlValue)> = record
            .iter()
            .map(|(name, value)| {
                let data_type = self.column(name).map_or(DataType::Text, Column::data_type);
                (name.clone(), bind_value(data_type, value))
            })
            .collect();

        self.store.insert(table, &bound)
    }

    /// 系统不可用
    pub fn emergency<C: Serialize>(&self, message: &str, context: &C) {
        self.log(LEVEL_EMERGENCY, message, context);
    }

    /// 必须立即处理
    pub fn alert<C: Serialize>(&self, message: &str, context: &C) {
        self.log(LEVEL_ALERT, message, context);
    }

    /// 严重故障
    pub fn critical<C: Serialize>(&self, message: &str, context: &C) {
        self.log(LEVEL_CRITICAL, message, context);
    }

    /// 运行时错误
    pub fn error<C: Serialize>(&self, message: &str, context: &C) {
        self.log(LEVEL_ERROR, message, context);
    }

    /// 非错误的异常情况
    pub fn warning<C: Serialize>(&self, message: &str, context: &C) {
        self.log(LEVEL_WARNING, message, context);
    }

    /// 正常但值得注意的事件
    pub fn notice<C: Serialize>(&self, message: &str, context: &C) {
        self.log(LEVEL_NOTICE, message, context);
    }

    /// 一般性事件
    pub fn info<C: Serialize>(&self, message: &str, context: &C) {
        self.log(LEVEL_INFO, message, context);
    }

    /// 调试信息
    pub fn debug<C: Serialize>(&self, message: &str, context: &C) {
        self.log(LEVEL_DEBUG, message, context);
    }

    /// 按条件读取日志；空条件默认按 id 降序（最新在前）
    pub fn get_logs(&self, condition: Condition) -> Result<Vec<LogEntry>> {
        let table = self
            .table
            .as_deref()
            .ok_or(Error::Config(ConfigError::TableNotSet))?;

        let condition = if condition.is_empty() {
            Condition::new().with_order_by("id DESC")
        } else {
            condition
        };

        let rows = self.store.select(table, &condition)?;
        Ok(rows.into_iter().map(entry_from_row).collect())
    }

    /// 按 id 精确读取；未命中（或命中多行）返回 None
    pub fn get_log_by_id(&self, id: i64) -> Result<Option<LogEntry>> {
        let table = self
            .table
            .as_deref()
            .ok_or(Error::Config(ConfigError::TableNotSet))?;

        let condition = Condition::new()
            .with_where("id = :id")
            .with_param(":id", id)
            .with_limit(1);
        let mut rows = self.store.select(table, &condition)?;
        if rows.len() != 1 {
            return Ok(None);
        }
        Ok(rows.pop().map(entry_from_row))
    }
}

/// 清洗表名：仅保留 [A-Za-z0-9_-]
pub fn sanitize_table_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
        .collect()
}

/// 对 message 中的 `{{ key }}` 占位符做字面替换
///
/// 只替换标量值；数组和对象保持占位符原样。字符串值原样替换，
/// 其余标量用其 JSON 形式（true、42、null）。不是模板语言：
/// 没有转义、没有条件、没有嵌套路径。
pub fn interpolate(message: &str, context: &JsonValue) -> String {
    let Some(map) = context.as_object() else {
        return message.to_string();
    };

    let mut rendered = message.to_string();
    for (key, value) in map {
        let replacement = match value {
            JsonValue::Array(_) | JsonValue::Object(_) => continue,
            JsonValue::String(text) => text.clone(),
            scalar => scalar.to_string(),
        };
        rendered = rendered.replace(&format!("{{{{ {key} }}}}"), &replacement);
    }
    rendered
}

/// 把一行查询结果转换为 LogEntry：整数转换、context 解码与消息插值
fn entry_from_row(row: SqlRow) -> LogEntry {
    let id = match row.get("id") {
        Some(SqlValue::Integer(n)) => *n,
        _ => 0,
    };
    let created_by = match row.get("created_by") {
        Some(SqlValue::Integer(n)) if *n != 0 => Some(*n),
        _ => None,
    };
    let level = text_field(&row, "level");
    let raw_message = text_field(&row, "message");
    let context_text = text_field(&row, "context");
    let created_at = text_field(&row, "created_at");

    // 存储中的 context 解码失败时换成哨兵对象而不是报错
    let context: JsonValue = serde_json::from_str(&context_text)
        .unwrap_or_else(|e| serde_json::json!({ (CONTEXT_READ_ERROR_KEY): e.to_string() }));
    let message = interpolate(&raw_message, &context);

    LogEntry {
        id,
        level,
        message,
        context,
        created_at,
        created_by,
    }
}

fn text_field(row: &SqlRow, name: &str) -> String {
    match row.get(name) {
        Some(SqlValue::Text(text)) => text.clone(),
        Some(SqlValue::Integer(n)) => n.to_string(),
        Some(SqlValue::Real(x)) => x.to_string(),
        _ => String::new(),
    }
}

fn bind_value(data_type: DataType, value: &JsonValue) -> SqlValue {
    match data_type {
        DataType::BigInt => SqlValue::Integer(value.as_i64().unwrap_or_default()),
        _ => match value {
            JsonValue::String(text) => SqlValue::Text(text.clone()),
            other => SqlValue::Text(other.to_string()),
        },
    }
}
