// ==========================================
// 仓库订单看板 - 订单映射
// ==========================================
// 职责: OrderRow → RawOrderRecord → NormalizedOrder
// 红线: 不做额外校验，未知交货方式按"不调整"处理
// ==========================================

use crate::domain::order::{MalformedRecord, NormalizedOrder, OrderRow, RawOrderRecord};
use crate::engine::date_adjuster::adjust_order_date;
use tracing::warn;

/// 原始行解析结果
#[derive(Debug, Default)]
pub struct ParsedRows {
    pub records: Vec<RawOrderRecord>,
    pub malformed: Vec<MalformedRecord>,
}

/// 将一条原始订单映射为看板订单
///
/// 交货方式原值（未 trim）直接交给日期调整规则。
pub fn map_order(raw: &RawOrderRecord) -> NormalizedOrder {
    let effective_date = adjust_order_date(raw.delivery_date, &raw.delivery_method);

    NormalizedOrder {
        id: raw.order_number.clone(),
        name: raw.customer_name.clone(),
        quantity: raw.quantity,
        delivery_method: raw.delivery_method.clone(),
        route: raw.route.clone(),
        effective_date,
        nominal_date: raw.delivery_date,
        customer_number: raw.customer_number.clone(),
        notes: raw.notes.clone(),
        warehouse_code: raw.warehouse_code.clone(),
        wms_status: raw.wms_status.clone(),
        hand_terminal: raw.hand_terminal.clone(),
        order_picker: raw.order_picker.clone(),
    }
}

/// 校验原始行；缺字段的行单独收集，不中断整批
pub fn parse_rows(rows: Vec<OrderRow>) -> ParsedRows {
    let mut parsed = ParsedRows::default();

    for row in rows {
        match RawOrderRecord::try_from(row) {
            Ok(record) => parsed.records.push(record),
            Err(err) => {
                warn!(
                    order_number = err.order_number.as_deref().unwrap_or(""),
                    field = err.field,
                    "跳过无法解析的订单记录"
                );
                parsed.malformed.push(err);
            }
        }
    }

    parsed
}

/// 解析并映射一批原始行（保持输入顺序）
pub fn map_rows(rows: Vec<OrderRow>) -> (Vec<NormalizedOrder>, Vec<MalformedRecord>) {
    let parsed = parse_rows(rows);
    let orders = parsed.records.iter().map(map_order).collect();
    (orders, parsed.malformed)
}
