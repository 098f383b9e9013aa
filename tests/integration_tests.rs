// 端到端工作流测试：配置引导、跨连接复用、哨兵路径
#[cfg(test)]
mod integration_tests {
    use serde_json::json;
    use std::fs;
    use std::path::PathBuf;
    use tablelog::config::Config;
    use tablelog::constants::{CONTEXT_READ_ERROR_KEY, CONTEXT_WRITE_ERROR_KEY};
    use tablelog::logger::Logger;
    use tablelog::table::{Condition, SqliteStore};

    fn setup_test_dir(name: &str) -> PathBuf {
        let test_dir = PathBuf::from("target/test_integration").join(name);
        let _ = fs::remove_dir_all(&test_dir);
        fs::create_dir_all(&test_dir).expect("Failed to create test dir");
        test_dir
    }

    /// 测试配置引导的完整写读流程
    #[test]
    fn test_from_config_workflow() {
        let test_dir = setup_test_dir("from_config");
        let db_path = test_dir.join("app.db");

        let content = format!(
            r#"
[database]
path = "{}"

[logger]
table = "audit"
actor = 5
"#,
            db_path.to_str().unwrap()
        );
        let config = Config::from_str(&content, PathBuf::from("config.toml")).unwrap();

        let logger = Logger::from_config(&config).expect("Failed to bootstrap logger");
        assert_eq!(logger.table_name(), Some("audit_log"));

        let id = logger
            .try_log("notice", "deployed {{ version }}", &json!({ "version": "1.4.2" }))
            .unwrap();
        let entry = logger.get_log_by_id(id).unwrap().unwrap();
        assert_eq!(entry.message, "deployed 1.4.2");
        assert_eq!(entry.created_by, Some(5));
    }

    /// 测试第二个连接复用既有表并看到历史日志
    #[test]
    fn test_second_connection_sees_previous_logs() {
        let test_dir = setup_test_dir("reuse");
        let db_path = test_dir.join("app.db");

        {
            let store = SqliteStore::open(&db_path).unwrap();
            let mut logger = Logger::new(Box::new(store));
            logger.set_table("default", None).unwrap();
            logger.log("info", "from first session", &json!({}));
        }

        let store = SqliteStore::open(&db_path).unwrap();
        let mut logger = Logger::new(Box::new(store));
        logger.set_table("default", None).unwrap();

        let old_logs = logger.get_logs(Condition::new()).unwrap();
        assert_eq!(old_logs.len(), 1);
        assert_eq!(old_logs[0].message, "from first session");

        logger.log(
            "info",
            "listed {{ total }} previous logs",
            &json!({ "total": old_logs.len() }),
        );
        let all = logger.get_logs(Condition::new()).unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].message, "listed 1 previous logs");
    }

    /// 测试存储中被破坏的 context 读回哨兵对象
    #[test]
    fn test_corrupted_context_reads_sentinel() {
        let test_dir = setup_test_dir("corrupted");
        let db_path = test_dir.join("app.db");

        let store = SqliteStore::open(&db_path).unwrap();
        let mut logger = Logger::new(Box::new(store));
        logger.set_table("default", None).unwrap();
        let id = logger
            .try_log("info", "hello {{ name }}", &json!({ "name": "world" }))
            .unwrap();

        // 绕过 Logger 直接破坏存储的 context
        let conn = rusqlite::Connection::open(&db_path).unwrap();
        conn.execute(
            "UPDATE default_log SET context = 'not json {' WHERE id = ?1",
            rusqlite::params![id],
        )
        .unwrap();

        let entry = logger.get_log_by_id(id).unwrap().expect("Entry not found");
        assert!(
            entry.context.get(CONTEXT_READ_ERROR_KEY).is_some(),
            "Context should be the read sentinel"
        );
        // 插值对哨兵对象无键可替换，消息保持模板原样
        assert_eq!(entry.message, "hello {{ name }}");
    }

    /// 序列化必定失败的上下文
    struct BrokenContext;

    impl serde::Serialize for BrokenContext {
        fn serialize<S: serde::Serializer>(
            &self,
            _serializer: S,
        ) -> Result<S::Ok, S::Error> {
            Err(<S::Error as serde::ser::Error>::custom("not representable"))
        }
    }

    /// 测试上下文序列化失败落库写哨兵而不报错
    #[test]
    fn test_unserializable_context_writes_sentinel() {
        let store = SqliteStore::open_in_memory().unwrap();
        let mut logger = Logger::new(Box::new(store));
        logger.set_table("default", None).unwrap();

        let id = logger
            .try_log("error", "payload rejected", &BrokenContext)
            .expect("Write should not fail on context serialization");

        let entry = logger.get_log_by_id(id).unwrap().unwrap();
        let sentinel = entry
            .context
            .get(CONTEXT_WRITE_ERROR_KEY)
            .expect("Context should be the write sentinel");
        assert!(sentinel.as_str().unwrap().contains("not representable"));
    }

    /// 测试 Unicode 消息与上下文的往返
    #[test]
    fn test_unicode_roundtrip() {
        let store = SqliteStore::open_in_memory().unwrap();
        let mut logger = Logger::new(Box::new(store));
        logger.set_table("default", None).unwrap();

        let id = logger
            .try_log(
                "notice",
                "用户 {{ 名字 }} 从 {{ ip }} 登录",
                &json!({ "名字": "张三", "ip": "10.0.0.8" }),
            )
            .unwrap();

        let entry = logger.get_log_by_id(id).unwrap().unwrap();
        assert_eq!(entry.message, "用户 张三 从 10.0.0.8 登录");
        assert_eq!(entry.context["名字"], "张三");
    }

    /// 测试大量写入后的读取顺序与条数
    #[test]
    fn test_many_entries() {
        let store = SqliteStore::open_in_memory().unwrap();
        let mut logger = Logger::new(Box::new(store));
        logger.set_table("default", None).unwrap();

        for i in 0..100 {
            logger.log("info", &format!("entry {i}"), &json!({ "seq": i }));
        }

        let logs = logger.get_logs(Condition::new()).unwrap();
        assert_eq!(logs.len(), 100);
        assert_eq!(logs[0].message, "entry 99");
        assert_eq!(logs[99].message, "entry 0");
        for window in logs.windows(2) {
            assert!(window[0].id > window[1].id, "ids should be descending");
        }
    }

    /// 测试临时目录中建库（父目录自动创建）
    #[test]
    fn test_open_creates_parent_directory() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let db_path = dir.path().join("nested/deep/app.db");

        let store = SqliteStore::open(&db_path).expect("Failed to open with nested path");
        let mut logger = Logger::new(Box::new(store));
        logger.set_table("default", None).unwrap();
        logger.log("info", "nested ok", &json!({}));

        let logs = logger.get_logs(Condition::new()).unwrap();
        assert_eq!(logs.len(), 1);
    }
}
