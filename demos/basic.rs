//! 基础用法：对应一次典型的请求日志流程
//!
//! 运行：`cargo run --example basic`（日志输出用 RUST_LOG=debug 打开）

use serde_json::json;
use tablelog::error::Result;
use tablelog::logger::Logger;
use tablelog::table::{Condition, SqliteStore};

fn main() -> Result<()> {
    env_logger::init();

    let store = SqliteStore::open("target/demo/logger_example.db")?;
    let mut logger = Logger::new(Box::new(store));
    logger.set_table("default", None)?;

    let old_logs = logger.get_logs(Condition::new())?;

    logger.notice(
        "Started using logger",
        &json!({
            "Client IP": "127.0.0.1",
            "User-Agent": "tablelog-demo/0.1",
        }),
    );
    logger.debug("Starting new session", &json!({}));

    let last_id = logger.try_log(
        "info",
        "Listed total {{ total }} logs",
        &json!({ "total": old_logs.len() }),
    )?;
    if let Some(entry) = logger.get_log_by_id(last_id)? {
        println!("last log [{}] => {} ({})", entry.id, entry.message, entry.level);
    }

    println!("logs from previous sessions, latest first:");
    for entry in &old_logs {
        println!(
            "  [{}] {} {} {}",
            entry.id, entry.created_at, entry.level, entry.message
        );
    }

    // 带操作者标识的写入
    logger.log_as(
        1,
        "info",
        "Session finished with {{ written }} new logs",
        &json!({ "written": 3 }),
    );

    Ok(())
}
