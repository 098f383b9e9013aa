//! 日志表结构定义
//! 列描述符、绑定类型代码与固定的日志列集合

use crate::constants::DEFAULT_LEVEL;

/// 列的 SQL 数据类型，同时作为参数绑定的类型代码
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    /// 64 位整数
    BigInt,
    /// 定长文本
    Varchar(u16),
    /// 不定长文本
    Text,
    /// 日期时间（按文本存储）
    DateTime,
}

impl DataType {
    /// DDL 中的类型名
    pub fn sql(self) -> String {
        match self {
            DataType::BigInt => "BIGINT".to_string(),
            DataType::Varchar(len) => format!("VARCHAR({len})"),
            DataType::Text => "TEXT".to_string(),
            DataType::DateTime => "DATETIME".to_string(),
        }
    }

    /// 是否为文本亲和类型；collation 只作用于这些列
    pub fn is_text(self) -> bool {
        matches!(self, DataType::Varchar(_) | DataType::Text)
    }
}

/// 列描述符
#[derive(Debug, Clone)]
pub struct Column {
    name: String,
    data_type: DataType,
    default: Option<String>,
    auto_increment: bool,
    primary_key: bool,
    unique: bool,
    not_null: bool,
}

impl Column {
    /// 创建新列
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            default: None,
            auto_increment: false,
            primary_key: false,
            unique: false,
            not_null: false,
        }
    }

    /// 设置默认值字面量
    pub fn with_default(mut self, value: impl Into<String>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// 标记为自增列
    pub fn auto(mut self) -> Self {
        self.auto_increment = true;
        self
    }

    /// 标记为主键
    pub fn primary(mut self) -> Self {
        self.primary_key = true;
        self
    }

    /// 标记为唯一
    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// 标记为非空
    pub fn not_null(mut self) -> Self {
        self.not_null = true;
        self
    }

    /// 列名
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 绑定类型代码
    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    /// 默认值字面量
    pub fn default_value(&self) -> Option<&str> {
        self.default.as_deref()
    }

    /// 是否自增
    pub fn is_auto_increment(&self) -> bool {
        self.auto_increment
    }

    /// 是否主键
    pub fn is_primary(&self) -> bool {
        self.primary_key
    }

    /// 是否唯一
    pub fn is_unique(&self) -> bool {
        self.unique
    }

    /// 是否非空
    pub fn is_not_null(&self) -> bool {
        self.not_null
    }

    /// 生成该列的 DDL 片段
    pub fn ddl(&self, collation: Option<&str>) -> String {
        // SQLite 的 AUTOINCREMENT 只接受 INTEGER PRIMARY KEY 形式（即 64 位 rowid）
        if self.auto_increment && self.primary_key {
            let mut ddl = format!("{} INTEGER PRIMARY KEY AUTOINCREMENT", self.name);
            if self.not_null {
                ddl.push_str(" NOT NULL");
            }
            if self.unique {
                ddl.push_str(" UNIQUE");
            }
            return ddl;
        }

        let mut ddl = format!("{} {}", self.name, self.data_type.sql());
        if self.data_type.is_text() {
            if let Some(collation) = collation {
                ddl.push_str(&format!(" COLLATE {collation}"));
            }
        }
        if self.not_null {
            ddl.push_str(" NOT NULL");
        }
        if self.unique {
            ddl.push_str(" UNIQUE");
        }
        if self.primary_key {
            ddl.push_str(" PRIMARY KEY");
        }
        if let Some(default) = &self.default {
            ddl.push_str(&format!(" DEFAULT '{}'", default.replace('\'', "''")));
        }
        ddl
    }
}

/// 日志表的固定列集合
///
/// 列结构从不变更；setColumns 级别的覆盖在 Logger 层被拒绝。
pub fn log_columns() -> Vec<Column> {
    vec![
        Column::new("id", DataType::BigInt)
            .auto()
            .primary()
            .unique()
            .not_null(),
        Column::new("level", DataType::Varchar(16)).with_default(DEFAULT_LEVEL),
        Column::new("message", DataType::Text).not_null(),
        Column::new("context", DataType::Text).not_null(),
        Column::new("created_at", DataType::DateTime),
        Column::new("created_by", DataType::BigInt),
    ]
}
