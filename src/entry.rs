//! 日志条目类型

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 单条日志记录
///
/// `message` 是读取时已完成占位符插值的文本；原始模板只存在于表中。
/// `context` 为解码后的结构化上下文，解码失败时是哨兵对象。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    /// 自增主键
    pub id: i64,
    /// 日志级别（自由文本，约定使用标准级别名）
    pub level: String,
    /// 插值后的消息
    pub message: String,
    /// 结构化上下文
    pub context: Value,
    /// 写入时间（本地时间，`%Y-%m-%d %H:%M:%S`）
    pub created_at: String,
    /// 操作者 id；缺失或为 0 时为 None
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<i64>,
}
