//! 公共常量
//! 提供：
//! - 标准日志级别常量与 LOG_LEVELS 列表
//! - 日志表命名规则与上下文哨兵键

/// 系统不可用
pub const LEVEL_EMERGENCY: &str = "emergency";
/// 必须立即处理
pub const LEVEL_ALERT: &str = "alert";
/// 严重故障
pub const LEVEL_CRITICAL: &str = "critical";
/// 运行时错误
pub const LEVEL_ERROR: &str = "error";
/// 非错误的异常情况
pub const LEVEL_WARNING: &str = "warning";
/// 正常但值得注意的事件
pub const LEVEL_NOTICE: &str = "notice";
/// 一般性事件
pub const LEVEL_INFO: &str = "info";
/// 调试信息
pub const LEVEL_DEBUG: &str = "debug";

/// 标准日志级别（按严重程度从高到低）
pub const LOG_LEVELS: &[&str] = &[
    LEVEL_EMERGENCY,
    LEVEL_ALERT,
    LEVEL_CRITICAL,
    LEVEL_ERROR,
    LEVEL_WARNING,
    LEVEL_NOTICE,
    LEVEL_INFO,
    LEVEL_DEBUG,
];

/// level 列的默认级别
pub const DEFAULT_LEVEL: &str = LEVEL_NOTICE;

/// 物理表名后缀：`<清洗后的名称>_log`
pub const TABLE_SUFFIX: &str = "_log";

/// 上下文序列化失败时落库的哨兵键
pub const CONTEXT_WRITE_ERROR_KEY: &str = "log-context-write-error";

/// 存储中的上下文解码失败时返回的哨兵键
pub const CONTEXT_READ_ERROR_KEY: &str = "log-context-read-error";

/// created_at 的时间格式（本地时间）
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
