// ==========================================
// 仓库订单看板 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为
// - 统一 busy_timeout，减少并发写入时的偶发 busy 错误
// - 建表语句集中在此处（order_line / config_kv）
// ==========================================

use rusqlite::Connection;
use std::path::PathBuf;
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 数据库路径环境变量
pub const DB_PATH_ENV: &str = "WAREHOUSE_ORDERS_DB";

/// 存储中的日期时间格式（毫秒定宽，文本比较与时间顺序一致）
pub const DB_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// SQLite 侧把 delivery_date 规整成与 DB_DATETIME_FORMAT 相同的文本
/// 纯日期、T 分隔、无毫秒的历史数据都能参与范围比较
pub const NORMALIZED_DELIVERY_DATE_SQL: &str = "strftime('%Y-%m-%d %H:%M:%f', delivery_date)";

const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS order_line (
    order_number     TEXT,
    customer_name    TEXT,
    customer_number  TEXT,
    quantity         INTEGER,
    delivery_method  TEXT,
    route            TEXT,
    warehouse_code   TEXT,
    wms_status       TEXT,
    hand_terminal    TEXT,
    order_picker     TEXT,
    notes            TEXT,
    delivery_date    TEXT
);
CREATE INDEX IF NOT EXISTS idx_order_line_delivery_date ON order_line (delivery_date);
CREATE INDEX IF NOT EXISTS idx_order_line_wms_status ON order_line (wms_status);

CREATE TABLE IF NOT EXISTS config_kv (
    scope_id  TEXT NOT NULL,
    key       TEXT NOT NULL,
    value     TEXT NOT NULL,
    PRIMARY KEY (scope_id, key)
);
"#;

/// 配置 SQLite 连接的统一 PRAGMA
///
/// busy_timeout 需要"每个连接"单独配置
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 建表（幂等）
pub fn ensure_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA_SQL)
}

/// 默认数据库路径
///
/// 优先使用环境变量 `WAREHOUSE_ORDERS_DB`，
/// 否则放在用户数据目录下，最后回退到当前目录。
pub fn default_db_path() -> String {
    if let Ok(path) = std::env::var(DB_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./warehouse_orders.db");
    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("warehouse-orders");
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("warehouse_orders.db");
        }
    }

    path.to_string_lossy().to_string()
}
