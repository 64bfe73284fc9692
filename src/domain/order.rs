// ==========================================
// 仓库订单看板 - 订单实体
// ==========================================
// OrderRow        : 存储层返回的原始行（所有列可空）
// RawOrderRecord  : 必填字段已校验的原始订单
// NormalizedOrder : 应用交货规则后的订单（只读快照）
// ==========================================

use crate::domain::types::{DeliveryCategory, DeliveryRule, RouteKind};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ==========================================
// OrderRow - 存储原始行
// ==========================================
/// 订单行（来自 order_line 表或 CSV 导出）
///
/// 所有字段都是 Option：存储层不做任何业务校验，
/// 必填性检查在 `RawOrderRecord::try_from` 中完成。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderRow {
    pub order_number: Option<String>,
    pub customer_name: Option<String>,
    pub customer_number: Option<String>,
    pub quantity: Option<i64>,
    pub delivery_method: Option<String>,
    pub route: Option<String>,
    pub warehouse_code: Option<String>,
    pub wms_status: Option<String>,
    pub hand_terminal: Option<String>,
    pub order_picker: Option<String>,
    pub notes: Option<String>,
    pub delivery_date: Option<NaiveDateTime>,
}

// ==========================================
// MalformedRecord - 缺少必填字段
// ==========================================
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("订单记录缺少必填字段: field={field}, order_number={}", .order_number.as_deref().unwrap_or("<未知>"))]
pub struct MalformedRecord {
    pub order_number: Option<String>,
    pub field: &'static str,
}

// ==========================================
// RawOrderRecord - 原始订单
// ==========================================
/// 原始订单记录（只读输入）
///
/// `delivery_method` 保留存储中的原值（可能带首尾空格），
/// 由日期调整规则自行 trim。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawOrderRecord {
    pub order_number: String,
    pub customer_name: String,
    pub customer_number: String,
    pub quantity: i64,
    pub delivery_method: String,
    pub route: Option<String>,
    pub warehouse_code: String,
    pub wms_status: Option<String>,
    pub hand_terminal: Option<String>,
    pub order_picker: Option<String>,
    pub notes: Option<String>,
    /// 名义交货日期（含时分秒，调整后必须原样保留）
    pub delivery_date: NaiveDateTime,
}

impl TryFrom<OrderRow> for RawOrderRecord {
    type Error = MalformedRecord;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        let order_number = match row.order_number {
            Some(n) if !n.trim().is_empty() => n,
            _ => {
                return Err(MalformedRecord {
                    order_number: None,
                    field: "order_number",
                })
            }
        };

        let missing = |field: &'static str| MalformedRecord {
            order_number: Some(order_number.clone()),
            field,
        };

        let customer_name = row.customer_name.ok_or_else(|| missing("customer_name"))?;
        let customer_number = row
            .customer_number
            .ok_or_else(|| missing("customer_number"))?;
        let quantity = row.quantity.ok_or_else(|| missing("quantity"))?;
        let delivery_method = row
            .delivery_method
            .ok_or_else(|| missing("delivery_method"))?;
        let warehouse_code = row.warehouse_code.ok_or_else(|| missing("warehouse_code"))?;
        let delivery_date = row.delivery_date.ok_or_else(|| missing("delivery_date"))?;

        Ok(Self {
            order_number,
            customer_name,
            customer_number,
            quantity,
            delivery_method,
            route: row.route,
            warehouse_code,
            wms_status: row.wms_status,
            hand_terminal: row.hand_terminal,
            order_picker: row.order_picker,
            notes: row.notes,
            delivery_date,
        })
    }
}

// ==========================================
// NormalizedOrder - 规范化订单
// ==========================================
/// 看板订单
///
/// 不变量: `effective_date.time() == nominal_date.time()`，
/// 调整只改变日历日。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedOrder {
    pub id: String,
    pub name: String,
    pub quantity: i64,
    pub delivery_method: String,
    pub route: Option<String>,
    /// 生效日期（分桶只看这个）
    pub effective_date: NaiveDateTime,
    /// 名义日期（仅供展示/诊断）
    pub nominal_date: NaiveDateTime,
    pub customer_number: String,
    pub notes: Option<String>,
    pub warehouse_code: String,
    pub wms_status: Option<String>,
    pub hand_terminal: Option<String>,
    pub order_picker: Option<String>,
}

impl NormalizedOrder {
    pub fn delivery_rule(&self) -> DeliveryRule {
        DeliveryRule::from_code(&self.delivery_method)
    }

    pub fn delivery_category(&self) -> DeliveryCategory {
        DeliveryCategory::from_code(&self.delivery_method)
    }

    pub fn route_kind(&self) -> RouteKind {
        RouteKind::from_code(self.route.as_deref())
    }
}

// ==========================================
// OrderQuery - 数据访问查询条件
// ==========================================
/// 结果排序方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderSort {
    /// 按订单号升序
    OrderNumber,
    /// 按名义日期升序，再按订单号升序
    DeliveryDate,
}

/// 按名义日期范围查询订单
#[derive(Debug, Clone, PartialEq)]
pub struct OrderQuery {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    /// true: [start, end]；false: [start, end)
    pub end_inclusive: bool,
    /// WMS 状态过滤（None = 不过滤）
    pub status_filter: Option<String>,
    /// 只取尚未分配手持终端的订单（NULL 或空串）
    pub unassigned_only: bool,
    pub sort: OrderSort,
}
