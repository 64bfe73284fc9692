// ==========================================
// 仓库订单看板 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写
// 存储: config_kv 表 (scope_id='global')
// 缺失或格式错误的值回退为默认值并记 warn
// ==========================================

use crate::config::dashboard_config::DashboardConfig;
use crate::config::dashboard_config_trait::{ConfigResult, DashboardConfigReader};
use crate::db::{configure_sqlite_connection, ensure_schema, open_sqlite_connection};
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    pub fn new(db_path: &str) -> ConfigResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        ensure_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 会对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> ConfigResult<Self> {
        {
            let guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            configure_sqlite_connection(&guard)?;
            ensure_schema(&guard)?;
        }

        Ok(Self { conn })
    }

    /// 读取 global scope 的配置值
    pub fn get_config_value(&self, key: &str) -> ConfigResult<Option<String>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let value = conn
            .query_row(
                "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;

        Ok(value)
    }

    /// 写入 global scope 的配置值（UPSERT）
    pub fn set_config_value(&self, key: &str, value: &str) -> ConfigResult<()> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2",
            params![key, value],
        )?;

        Ok(())
    }

    /// 获取所有 global 配置的快照
    pub fn get_config_snapshot(&self) -> ConfigResult<HashMap<String, String>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut config_map = HashMap::new();
        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }

        Ok(config_map)
    }

    /// 读取并解析配置值，缺失或解析失败时返回默认值
    fn get_parsed_or_default<T>(&self, key: &str, default: T) -> ConfigResult<T>
    where
        T: FromStr + std::fmt::Display,
    {
        match self.get_config_value(key)? {
            None => Ok(default),
            Some(raw) => match raw.trim().parse::<T>() {
                Ok(v) => Ok(v),
                Err(_) => {
                    tracing::warn!(
                        config_key = key,
                        raw_value = %raw,
                        default = %default,
                        "配置格式错误，使用默认值"
                    );
                    Ok(default)
                }
            },
        }
    }

    /// 读取状态过滤配置：未配置用默认值，空串表示不过滤
    fn get_status_filter(&self, key: &str, default: Option<String>) -> ConfigResult<Option<String>> {
        match self.get_config_value(key)? {
            None => Ok(default),
            Some(raw) => {
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(trimmed.to_string()))
                }
            }
        }
    }
}

// ==========================================
// DashboardConfigReader Trait 实现
// ==========================================
#[async_trait]
impl DashboardConfigReader for ConfigManager {
    async fn get_today_window_back_days(&self) -> ConfigResult<i64> {
        let default = DashboardConfig::default().today_window_back_days;
        self.get_parsed_or_default(config_keys::TODAY_WINDOW_BACK_DAYS, default)
    }

    async fn get_today_window_forward_days(&self) -> ConfigResult<i64> {
        let default = DashboardConfig::default().today_window_forward_days;
        self.get_parsed_or_default(config_keys::TODAY_WINDOW_FORWARD_DAYS, default)
    }

    async fn get_future_horizon_days(&self) -> ConfigResult<i64> {
        let default = DashboardConfig::default().future_horizon_days;
        self.get_parsed_or_default(config_keys::FUTURE_HORIZON_DAYS, default)
    }

    async fn get_today_status_filter(&self) -> ConfigResult<Option<String>> {
        self.get_status_filter(
            config_keys::TODAY_STATUS_FILTER,
            DashboardConfig::default().today_status_filter,
        )
    }

    async fn get_future_status_filter(&self) -> ConfigResult<Option<String>> {
        self.get_status_filter(
            config_keys::FUTURE_STATUS_FILTER,
            DashboardConfig::default().future_status_filter,
        )
    }

    async fn get_today_unassigned_only(&self) -> ConfigResult<bool> {
        let default = DashboardConfig::default().today_unassigned_only;
        self.get_parsed_or_default(config_keys::TODAY_UNASSIGNED_ONLY, default)
    }

    async fn get_retrieval_max_retries(&self) -> ConfigResult<u32> {
        let default = DashboardConfig::default().retrieval_max_retries;
        self.get_parsed_or_default(config_keys::RETRIEVAL_MAX_RETRIES, default)
    }

    async fn get_retrieval_base_delay_ms(&self) -> ConfigResult<u64> {
        let default = DashboardConfig::default().retrieval_base_delay_ms;
        self.get_parsed_or_default(config_keys::RETRIEVAL_BASE_DELAY_MS, default)
    }

    async fn get_poll_interval_secs(&self) -> ConfigResult<u64> {
        let default = DashboardConfig::default().poll_interval_secs;
        self.get_parsed_or_default(config_keys::POLL_INTERVAL_SECS, default)
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 查询窗口
    pub const TODAY_WINDOW_BACK_DAYS: &str = "today_window_back_days";
    pub const TODAY_WINDOW_FORWARD_DAYS: &str = "today_window_forward_days";
    pub const FUTURE_HORIZON_DAYS: &str = "future_horizon_days";

    // 状态过滤
    pub const TODAY_STATUS_FILTER: &str = "today_status_filter";
    pub const FUTURE_STATUS_FILTER: &str = "future_status_filter";
    pub const TODAY_UNASSIGNED_ONLY: &str = "today_unassigned_only";

    // 数据源重试
    pub const RETRIEVAL_MAX_RETRIES: &str = "retrieval_max_retries";
    pub const RETRIEVAL_BASE_DELAY_MS: &str = "retrieval_base_delay_ms";

    // 轮询
    pub const POLL_INTERVAL_SECS: &str = "poll_interval_secs";
}
