// ==========================================
// 仓库订单看板 - 订单分桶
// ==========================================
// 规则（只看生效日期，不看名义日期）:
// - 今日: 生效日期与基准日同一天，或 生效日期 <= 基准日零点（逾期）
// - 未来: 生效日期 >= 基准日零点 + 1 天
// 两个条件互斥且覆盖全部候选；落在查询窗口外的订单是调用方错误
// ==========================================

use crate::domain::order::NormalizedOrder;
use crate::domain::types::Bucket;
use crate::engine::window::RetrievalWindow;
use chrono::{Duration, NaiveDateTime};
use tracing::{error, instrument};

/// 基准时间归一到当天零点
pub fn start_of_day(as_of: NaiveDateTime) -> NaiveDateTime {
    as_of.date().and_hms_opt(0, 0, 0).unwrap_or(as_of)
}

/// 是否属于今日列表（含逾期）
pub fn is_today(effective: NaiveDateTime, as_of: NaiveDateTime) -> bool {
    let today = start_of_day(as_of);
    effective.date() == today.date() || effective <= today
}

/// 是否属于未来列表
pub fn is_future(effective: NaiveDateTime, as_of: NaiveDateTime) -> bool {
    effective >= start_of_day(as_of) + Duration::days(1)
}

/// 按生效日期判定分桶
pub fn bucket_for(effective: NaiveDateTime, as_of: NaiveDateTime) -> Bucket {
    match (is_today(effective, as_of), is_future(effective, as_of)) {
        (true, false) => Bucket::Today,
        (false, true) => Bucket::Future,
        _ => Bucket::Unclassified,
    }
}

/// 分桶结果
#[derive(Debug, Clone, Default)]
pub struct Classification {
    /// 保持输入顺序（检索顺序为订单号升序）
    pub today: Vec<NormalizedOrder>,
    /// 按生效日期升序，同日按订单号升序
    pub future: Vec<NormalizedOrder>,
    /// 名义日期超出查询窗口的订单（调用方错误，正常应为空）
    pub unclassified: Vec<NormalizedOrder>,
}

// ==========================================
// OrderClassifier - 分桶器
// ==========================================
pub struct OrderClassifier;

impl OrderClassifier {
    /// 对候选订单分桶
    #[instrument(skip(orders), fields(count = orders.len()))]
    pub fn classify(orders: Vec<NormalizedOrder>, as_of: NaiveDateTime) -> Classification {
        let mut result = Classification::default();

        for order in orders {
            match bucket_for(order.effective_date, as_of) {
                Bucket::Today => result.today.push(order),
                Bucket::Future => result.future.push(order),
                Bucket::Unclassified => {
                    error!(order_id = %order.id, effective_date = %order.effective_date, "订单无法归入任何分桶");
                    result.unclassified.push(order);
                }
            }
        }

        sort_future(&mut result.future);
        result
    }

    /// 对候选订单分桶，并校验其名义日期位于查询窗口内
    ///
    /// 窗口外的订单放入 `unclassified` 并记 error 日志，不会静默丢弃。
    pub fn classify_within(
        orders: Vec<NormalizedOrder>,
        as_of: NaiveDateTime,
        window: &RetrievalWindow,
    ) -> Classification {
        let (inside, outside): (Vec<_>, Vec<_>) = orders
            .into_iter()
            .partition(|order| window.contains(order.nominal_date));

        for order in &outside {
            error!(
                order_id = %order.id,
                nominal_date = %order.nominal_date,
                window_start = %window.start,
                window_end = %window.end,
                "订单名义日期超出查询窗口"
            );
        }

        let mut result = Self::classify(inside, as_of);
        result.unclassified.extend(outside);
        result
    }
}

fn sort_future(orders: &mut [NormalizedOrder]) {
    orders.sort_by(|a, b| {
        a.effective_date
            .cmp(&b.effective_date)
            .then_with(|| a.id.cmp(&b.id))
    });
}
