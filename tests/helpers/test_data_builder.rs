// ==========================================
// 测试数据构建器 - 用于集成测试
// ==========================================

use chrono::{NaiveDate, NaiveDateTime};
use warehouse_orders::config::STATUS_SENT_TO_FILE;
use warehouse_orders::domain::order::OrderRow;

/// 构造日期时间（测试输入固定，直接 unwrap）
pub fn dt(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, min, 0)
        .unwrap()
}

// ==========================================
// OrderRow 构建器
// ==========================================

/// 默认: 待拣货（Sent to file）、未分配手持终端、仓库 200
pub struct OrderRowBuilder {
    row: OrderRow,
}

impl OrderRowBuilder {
    pub fn new(order_number: &str, delivery_method: &str, delivery_date: NaiveDateTime) -> Self {
        Self {
            row: OrderRow {
                order_number: Some(order_number.to_string()),
                customer_name: Some(format!("Klant {}", order_number)),
                customer_number: Some("D10042".to_string()),
                quantity: Some(1),
                delivery_method: Some(delivery_method.to_string()),
                route: Some("PA".to_string()),
                warehouse_code: Some("200".to_string()),
                wms_status: Some(STATUS_SENT_TO_FILE.to_string()),
                hand_terminal: None,
                order_picker: None,
                notes: None,
                delivery_date: Some(delivery_date),
            },
        }
    }

    pub fn status(mut self, status: &str) -> Self {
        self.row.wms_status = Some(status.to_string());
        self
    }

    pub fn hand_terminal(mut self, terminal: &str) -> Self {
        self.row.hand_terminal = Some(terminal.to_string());
        self
    }

    pub fn warehouse(mut self, warehouse: &str) -> Self {
        self.row.warehouse_code = Some(warehouse.to_string());
        self
    }

    pub fn quantity(mut self, quantity: i64) -> Self {
        self.row.quantity = Some(quantity);
        self
    }

    pub fn without_customer_name(mut self) -> Self {
        self.row.customer_name = None;
        self
    }

    pub fn build(self) -> OrderRow {
        self.row
    }
}
