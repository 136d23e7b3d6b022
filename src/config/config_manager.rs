// ==========================================
// Tracker 导入管道 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、写入
// 存储: config_kv 表 (key-value + scope)
// 缺省或格式错误的配置回落默认值并记录 warn
// ==========================================

use crate::config::settings::{EncryptionStatus, DEFAULT_MAX_ATTRIBUTE_VALUE_LENGTH};
use crate::config::tracker_config_trait::TrackerConfigReader;
use crate::db::{init_config_schema, open_sqlite_connection};
use crate::domain::identifiers::TrackerIdentifierParams;
use crate::domain::types::AtomicMode;
use crate::importer::error::{TrackerImportError, TrackerImportResult};
use async_trait::async_trait;
use rusqlite::{params, Connection};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use tracing::warn;

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径（不存在的 config_kv 表会被创建）
    pub fn new(db_path: &str) -> TrackerImportResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        init_config_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：会对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> TrackerImportResult<Self> {
        {
            let conn_guard = conn
                .lock()
                .map_err(|e| TrackerImportError::LockError(e.to_string()))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
            init_config_schema(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    pub fn get_config_value(&self, key: &str) -> TrackerImportResult<Option<String>> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| TrackerImportError::LockError(e.to_string()))?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(TrackerImportError::ConfigReadError {
                key: key.to_string(),
                message: e.to_string(),
            }),
        }
    }

    fn get_config_or_default(&self, key: &str, default: &str) -> TrackerImportResult<String> {
        Ok(self
            .get_config_value(key)?
            .unwrap_or_else(|| default.to_string()))
    }

    /// 写入 global scope 配置（UPSERT）
    pub fn set_config_value(&self, key: &str, value: &str) -> TrackerImportResult<()> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| TrackerImportError::LockError(e.to_string()))?;

        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2",
            params![key, value],
        )?;
        Ok(())
    }

    /// 获取所有 global 配置的快照
    pub fn get_config_snapshot(&self) -> TrackerImportResult<BTreeMap<String, String>> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| TrackerImportError::LockError(e.to_string()))?;

        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut snapshot = BTreeMap::new();
        for row in rows {
            let (key, value) = row?;
            snapshot.insert(key, value);
        }
        Ok(snapshot)
    }
}

// ==========================================
// TrackerConfigReader Trait 实现
// ==========================================
#[async_trait]
impl TrackerConfigReader for ConfigManager {
    async fn get_atomic_mode(&self) -> TrackerImportResult<AtomicMode> {
        let value = self.get_config_or_default(config_keys::ATOMIC_MODE, "OBJECT")?;
        Ok(AtomicMode::from_str(&value))
    }

    async fn get_encryption_status(&self) -> TrackerImportResult<EncryptionStatus> {
        let value = self.get_config_or_default(config_keys::ENCRYPTION_STATUS, "OK")?;
        Ok(value.parse::<EncryptionStatus>().unwrap_or_else(|e| {
            warn!(
                config_key = config_keys::ENCRYPTION_STATUS,
                raw_value = %value,
                error = %e,
                "加密状态配置格式错误，使用默认值 OK"
            );
            EncryptionStatus::Ok
        }))
    }

    async fn get_max_attribute_value_length(&self) -> TrackerImportResult<usize> {
        let value = self.get_config_or_default(
            config_keys::MAX_ATTRIBUTE_VALUE_LENGTH,
            &DEFAULT_MAX_ATTRIBUTE_VALUE_LENGTH.to_string(),
        )?;
        match value.trim().parse::<usize>() {
            Ok(n) if n > 0 => Ok(n),
            _ => {
                warn!(
                    config_key = config_keys::MAX_ATTRIBUTE_VALUE_LENGTH,
                    raw_value = %value,
                    "属性值最大长度配置格式错误，使用默认值"
                );
                Ok(DEFAULT_MAX_ATTRIBUTE_VALUE_LENGTH)
            }
        }
    }

    async fn get_identifier_params(&self) -> TrackerImportResult<TrackerIdentifierParams> {
        let value = match self.get_config_value(config_keys::IDENTIFIER_PARAMS)? {
            Some(v) => v,
            None => return Ok(TrackerIdentifierParams::default()),
        };
        let params = serde_json::from_str(&value).unwrap_or_else(|e| {
            warn!(
                config_key = config_keys::IDENTIFIER_PARAMS,
                raw_value = %value,
                error = %e,
                "标识方案配置格式错误，全部使用 UID"
            );
            TrackerIdentifierParams::default()
        });
        Ok(params)
    }

    async fn get_preprocess_duplicate_relationships(&self) -> TrackerImportResult<bool> {
        let value =
            self.get_config_or_default(config_keys::PREPROCESS_DUPLICATE_RELATIONSHIPS, "true")?;
        Ok(!matches!(
            value.trim().to_lowercase().as_str(),
            "false" | "0" | "no"
        ))
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    pub const ATOMIC_MODE: &str = "tracker_atomic_mode";
    pub const ENCRYPTION_STATUS: &str = "encryption_status";
    pub const MAX_ATTRIBUTE_VALUE_LENGTH: &str = "max_attribute_value_length";
    pub const IDENTIFIER_PARAMS: &str = "tracker_identifier_params"; // JSON
    pub const PREPROCESS_DUPLICATE_RELATIONSHIPS: &str = "preprocess_duplicate_relationships";
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::identifiers::TrackerIdScheme;

    fn manager() -> ConfigManager {
        let conn = Connection::open_in_memory().unwrap();
        ConfigManager::from_connection(Arc::new(Mutex::new(conn))).unwrap()
    }

    #[tokio::test]
    async fn test_defaults_when_missing() {
        let cm = manager();
        assert_eq!(cm.get_atomic_mode().await.unwrap(), AtomicMode::Object);
        assert_eq!(cm.get_encryption_status().await.unwrap(), EncryptionStatus::Ok);
        assert_eq!(cm.get_max_attribute_value_length().await.unwrap(), 1200);
        assert_eq!(
            cm.get_identifier_params().await.unwrap(),
            TrackerIdentifierParams::default()
        );
        assert!(cm.get_preprocess_duplicate_relationships().await.unwrap());
    }

    #[tokio::test]
    async fn test_reads_stored_values() {
        let cm = manager();
        cm.set_config_value(config_keys::ATOMIC_MODE, "all").unwrap();
        cm.set_config_value(config_keys::MAX_ATTRIBUTE_VALUE_LENGTH, "20")
            .unwrap();
        cm.set_config_value(
            config_keys::ENCRYPTION_STATUS,
            "MISSING_ENCRYPTION_PASSWORD",
        )
        .unwrap();
        cm.set_config_value(
            config_keys::IDENTIFIER_PARAMS,
            r#"{"orgUnitIdScheme":{"idScheme":"CODE"}}"#,
        )
        .unwrap();
        cm.set_config_value(config_keys::PREPROCESS_DUPLICATE_RELATIONSHIPS, "false")
            .unwrap();

        assert_eq!(cm.get_atomic_mode().await.unwrap(), AtomicMode::All);
        assert_eq!(cm.get_max_attribute_value_length().await.unwrap(), 20);
        assert_eq!(
            cm.get_encryption_status().await.unwrap(),
            EncryptionStatus::MissingEncryptionPassword
        );
        assert_eq!(
            cm.get_identifier_params()
                .await
                .unwrap()
                .org_unit_id_scheme
                .id_scheme,
            TrackerIdScheme::Code
        );
        assert!(!cm.get_preprocess_duplicate_relationships().await.unwrap());
    }

    #[tokio::test]
    async fn test_malformed_values_fall_back() {
        let cm = manager();
        cm.set_config_value(config_keys::MAX_ATTRIBUTE_VALUE_LENGTH, "abc")
            .unwrap();
        cm.set_config_value(config_keys::IDENTIFIER_PARAMS, "{not json")
            .unwrap();

        assert_eq!(cm.get_max_attribute_value_length().await.unwrap(), 1200);
        assert_eq!(
            cm.get_identifier_params().await.unwrap(),
            TrackerIdentifierParams::default()
        );
    }

    #[test]
    fn test_snapshot_and_upsert() {
        let cm = manager();
        cm.set_config_value("a", "1").unwrap();
        cm.set_config_value("a", "2").unwrap();
        let snapshot = cm.get_config_snapshot().unwrap();
        assert_eq!(snapshot.get("a").map(String::as_str), Some("2"));
        assert_eq!(snapshot.len(), 1);
    }
}
