// ==========================================
// 仓库订单看板 - 订单行数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑（不做日期调整、不做分桶）
// 约束: 所有查询使用参数化,防止 SQL 注入
// ==========================================

use crate::db::{ensure_schema, open_sqlite_connection, DB_DATETIME_FORMAT, NORMALIZED_DELIVERY_DATE_SQL};
use crate::domain::order::{OrderQuery, OrderRow, OrderSort};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::order_source::OrderSource;
use async_trait::async_trait;
use chrono::NaiveDateTime;
use rusqlite::{params, Connection, Row};
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

const SELECT_COLUMNS: &str = r#"
    SELECT
        order_number, customer_name, customer_number, quantity,
        delivery_method, route, warehouse_code, wms_status,
        hand_terminal, order_picker, notes, delivery_date
    FROM order_line
"#;

// ==========================================
// SqliteOrderRepository - 订单行仓储
// ==========================================
/// 订单行仓储
/// 职责: order_line 表的读取与批量写入
pub struct SqliteOrderRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteOrderRepository {
    /// 创建新的仓储实例（自动建表）
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        ensure_schema(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 共享底层连接（供 ConfigManager 复用）
    pub fn connection(&self) -> Arc<Mutex<Connection>> {
        Arc::clone(&self.conn)
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 批量写入订单行（事务）
    ///
    /// # 返回
    /// - Ok(usize): 写入的行数
    pub fn insert_rows(&self, rows: &[OrderRow]) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let tx = conn.unchecked_transaction()?;

        let mut count = 0;
        for row in rows {
            tx.execute(
                r#"
                INSERT INTO order_line (
                    order_number, customer_name, customer_number, quantity,
                    delivery_method, route, warehouse_code, wms_status,
                    hand_terminal, order_picker, notes, delivery_date
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
                "#,
                params![
                    row.order_number,
                    row.customer_name,
                    row.customer_number,
                    row.quantity,
                    row.delivery_method,
                    row.route,
                    row.warehouse_code,
                    row.wms_status,
                    row.hand_terminal,
                    row.order_picker,
                    row.notes,
                    row.delivery_date.map(format_db_datetime),
                ],
            )?;
            count += 1;
        }

        tx.commit()?;
        Ok(count)
    }

    /// 清空订单行
    pub fn delete_all(&self) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        Ok(conn.execute("DELETE FROM order_line", [])?)
    }

    fn query_rows(&self, sql: &str, params: &[&dyn rusqlite::ToSql]) -> RepositoryResult<Vec<OrderRow>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt.query_map(params, map_order_row)?;

        let mut result = Vec::new();
        for row in rows {
            result.push(row?);
        }
        Ok(result)
    }
}

#[async_trait]
impl OrderSource for SqliteOrderRepository {
    async fn fetch_orders_in_range(&self, query: &OrderQuery) -> RepositoryResult<Vec<OrderRow>> {
        let end_op = if query.end_inclusive { "<=" } else { "<" };
        let order_by = match query.sort {
            OrderSort::OrderNumber => "order_number ASC".to_string(),
            OrderSort::DeliveryDate => {
                format!("{} ASC, order_number ASC", NORMALIZED_DELIVERY_DATE_SQL)
            }
        };
        // 比较前先规整存储文本，避免 '2025-07-20' < '2025-07-20 00:00:00.000' 之类的文本序误判
        let sql = format!(
            r#"{select}
            WHERE {date} >= ?1 AND {date} {end_op} ?2
              AND (?3 IS NULL OR TRIM(wms_status) = ?3)
              AND (?4 = 0 OR hand_terminal IS NULL OR TRIM(hand_terminal) = '')
            ORDER BY {order_by}
            "#,
            select = SELECT_COLUMNS,
            date = NORMALIZED_DELIVERY_DATE_SQL,
            end_op = end_op,
            order_by = order_by
        );

        let start = format_db_datetime(query.start);
        let end = format_db_datetime(query.end);
        let unassigned_only = query.unassigned_only as i64;

        let rows = self.query_rows(
            &sql,
            &[&start, &end, &query.status_filter, &unassigned_only],
        )?;

        debug!(
            start = %start,
            end = %end,
            status = query.status_filter.as_deref().unwrap_or(""),
            count = rows.len(),
            "按日期范围查询订单"
        );
        Ok(rows)
    }

    async fn fetch_all_orders(&self) -> RepositoryResult<Vec<OrderRow>> {
        let sql = format!(
            "{} ORDER BY {} ASC, order_number ASC",
            SELECT_COLUMNS, NORMALIZED_DELIVERY_DATE_SQL
        );
        self.query_rows(&sql, &[])
    }

    async fn count_by_status(&self, status: &str) -> RepositoryResult<u64> {
        let conn = self.get_conn()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM order_line WHERE TRIM(wms_status) = ?1",
            params![status],
            |row| row.get(0),
        )?;
        Ok(count.max(0) as u64)
    }

    async fn ping(&self) -> bool {
        let conn = match self.get_conn() {
            Ok(conn) => conn,
            Err(e) => {
                warn!(error = %e, "数据库连通性检查失败");
                return false;
            }
        };
        match conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0)) {
            Ok(_) => true,
            Err(e) => {
                warn!(error = %e, "数据库连通性检查失败");
                false
            }
        }
    }
}

// ==========================================
// 行映射
// ==========================================

/// 存储格式化
pub fn format_db_datetime(value: NaiveDateTime) -> String {
    value.format(DB_DATETIME_FORMAT).to_string()
}

/// 历史数据可能出现的格式（无毫秒 / T 分隔）
const LEGACY_DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

/// 解析存储中的日期时间（兼容 T 分隔与纯日期）
pub fn parse_db_datetime(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    std::iter::once(DB_DATETIME_FORMAT)
        .chain(LEGACY_DATETIME_FORMATS)
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            chrono::NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

fn map_order_row(row: &Row<'_>) -> rusqlite::Result<OrderRow> {
    let order_number: Option<String> = row.get(0)?;
    let raw_date: Option<String> = row.get(11)?;

    let delivery_date = match raw_date.as_deref() {
        Some(raw) => {
            let parsed = parse_db_datetime(raw);
            if parsed.is_none() {
                warn!(
                    order_number = order_number.as_deref().unwrap_or(""),
                    raw_value = raw,
                    "无法解析交货日期"
                );
            }
            parsed
        }
        None => None,
    };

    Ok(OrderRow {
        order_number,
        customer_name: row.get(1)?,
        customer_number: row.get(2)?,
        quantity: row.get(3)?,
        delivery_method: row.get(4)?,
        route: row.get(5)?,
        warehouse_code: row.get(6)?,
        wms_status: row.get(7)?,
        hand_terminal: row.get(8)?,
        order_picker: row.get(9)?,
        notes: row.get(10)?,
        delivery_date,
    })
}
