// ==========================================
// 仓库订单看板 - 交货日期调整规则
// ==========================================
// 规则:
// - 10 / 60 / 70 / EXW                         → 回退 1 个工作日
// - 32 / 100 / CIF / 90 / CPT / DAP / DDP / FCA / 50 → 回退 2 个工作日
// - 其他代码（含空串/未知）                      → 不调整
// 红线: 纯函数，不读时钟，不做 I/O，时分秒原样保留
// ==========================================

use crate::domain::types::DeliveryRule;
use chrono::{Datelike, NaiveDate, NaiveDateTime, Weekday};

/// 按交货方式调整订单日期
///
/// 交货方式代码会先 trim，再大小写敏感地匹配规则表。
/// 返回新值，输入不受影响。
pub fn adjust_order_date(base: NaiveDateTime, delivery_code: &str) -> NaiveDateTime {
    let rule = DeliveryRule::from_code(delivery_code);
    subtract_business_days(base, rule.business_days())
}

/// 向前回退 N 个工作日（跳过周六、周日）
///
/// 每次回退一个日历日，只有落在工作日时才计数，
/// 因此结果必然是工作日（N > 0 时）。
pub fn subtract_business_days(base: NaiveDateTime, days: u32) -> NaiveDateTime {
    let mut date = base.date();
    let mut remaining = days;

    while remaining > 0 {
        date = match date.pred_opt() {
            Some(prev) => prev,
            None => break,
        };
        if !is_weekend(date) {
            remaining -= 1;
        }
    }

    date.and_time(base.time())
}

/// 是否为周末
pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}
