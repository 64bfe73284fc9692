// ==========================================
// 仓库订单看板 - 查询窗口计算
// ==========================================
// 职责: 计算向数据源请求的名义日期范围
// 红线: 只圈定候选集，不做分桶
// ==========================================
// 交货规则最多让生效日期比名义日期早 4 个日历日
// （2 个工作日 + 跨一个周末），今日窗口必须覆盖这段漂移
// ==========================================

use crate::config::dashboard_config::DashboardConfig;
use crate::domain::order::{OrderQuery, OrderSort};
use crate::engine::classifier::start_of_day;
use chrono::{Duration, NaiveDateTime};
use tracing::warn;

/// 交货规则可能造成的最大日历日漂移
pub const MAX_ADJUSTMENT_DRIFT_DAYS: i64 = 4;

/// 今日窗口向前最少天数
pub const MIN_TODAY_BACK_DAYS: i64 = 3;

/// 今日窗口向后最少天数（右开区间，需要多留一天）
pub const MIN_TODAY_FORWARD_DAYS: i64 = MAX_ADJUSTMENT_DRIFT_DAYS + 1;

/// 今日窗口单边上限
pub const MAX_TODAY_WINDOW_DAYS: i64 = 31;

/// 未来队列默认展望天数
pub const DEFAULT_FUTURE_HORIZON_DAYS: i64 = 21;

/// 未来队列展望天数上限
pub const MAX_FUTURE_HORIZON_DAYS: i64 = 366;

/// 名义日期查询窗口
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetrievalWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub end_inclusive: bool,
}

impl RetrievalWindow {
    /// 名义日期是否落在窗口内
    pub fn contains(&self, nominal: NaiveDateTime) -> bool {
        if nominal < self.start {
            return false;
        }
        if self.end_inclusive {
            nominal <= self.end
        } else {
            nominal < self.end
        }
    }
}

// ==========================================
// WindowedRetriever - 窗口计算器
// ==========================================
#[derive(Debug, Clone)]
pub struct WindowedRetriever {
    back_days: i64,
    forward_days: i64,
    future_horizon_days: i64,
    today_status_filter: Option<String>,
    future_status_filter: Option<String>,
    today_unassigned_only: bool,
}

impl WindowedRetriever {
    /// 创建窗口计算器
    ///
    /// 今日窗口低于最小值时自动抬升（记 warn），
    /// 否则调整后的订单会被漏掉。
    /// 超过上限的配置值一律压到上限，日期运算不会溢出。
    pub fn new(back_days: i64, forward_days: i64, future_horizon_days: i64) -> Self {
        let back_days = if back_days < MIN_TODAY_BACK_DAYS {
            warn!(
                configured = back_days,
                applied = MIN_TODAY_BACK_DAYS,
                "今日窗口向前天数过小，已抬升到最小值"
            );
            MIN_TODAY_BACK_DAYS
        } else if back_days > MAX_TODAY_WINDOW_DAYS {
            warn!(
                configured = back_days,
                applied = MAX_TODAY_WINDOW_DAYS,
                "今日窗口向前天数过大，已压到上限"
            );
            MAX_TODAY_WINDOW_DAYS
        } else {
            back_days
        };

        let forward_days = if forward_days < MIN_TODAY_FORWARD_DAYS {
            warn!(
                configured = forward_days,
                applied = MIN_TODAY_FORWARD_DAYS,
                "今日窗口向后天数小于最大漂移，已抬升到最小值"
            );
            MIN_TODAY_FORWARD_DAYS
        } else if forward_days > MAX_TODAY_WINDOW_DAYS {
            warn!(
                configured = forward_days,
                applied = MAX_TODAY_WINDOW_DAYS,
                "今日窗口向后天数过大，已压到上限"
            );
            MAX_TODAY_WINDOW_DAYS
        } else {
            forward_days
        };

        let future_horizon_days = if future_horizon_days < 1 {
            warn!(
                configured = future_horizon_days,
                applied = DEFAULT_FUTURE_HORIZON_DAYS,
                "未来展望天数无效，使用默认值"
            );
            DEFAULT_FUTURE_HORIZON_DAYS
        } else if future_horizon_days > MAX_FUTURE_HORIZON_DAYS {
            warn!(
                configured = future_horizon_days,
                applied = MAX_FUTURE_HORIZON_DAYS,
                "未来展望天数过大，已压到上限"
            );
            MAX_FUTURE_HORIZON_DAYS
        } else {
            future_horizon_days
        };

        Self {
            back_days,
            forward_days,
            future_horizon_days,
            today_status_filter: None,
            future_status_filter: None,
            today_unassigned_only: false,
        }
    }

    /// 按看板配置创建
    pub fn from_config(config: &DashboardConfig) -> Self {
        let mut retriever = Self::new(
            config.today_window_back_days,
            config.today_window_forward_days,
            config.future_horizon_days,
        );
        retriever.today_status_filter = config.today_status_filter.clone();
        retriever.future_status_filter = config.future_status_filter.clone();
        retriever.today_unassigned_only = config.today_unassigned_only;
        retriever
    }

    pub fn back_days(&self) -> i64 {
        self.back_days
    }

    pub fn forward_days(&self) -> i64 {
        self.forward_days
    }

    pub fn future_horizon_days(&self) -> i64 {
        self.future_horizon_days
    }

    /// 今日窗口: [今天 - back, 今天 + forward)
    pub fn today_window(&self, as_of: NaiveDateTime) -> RetrievalWindow {
        let today = start_of_day(as_of);
        RetrievalWindow {
            start: shift_days(today, -self.back_days),
            end: shift_days(today, self.forward_days),
            end_inclusive: false,
        }
    }

    /// 未来窗口: [今天, 今天 + horizon]
    pub fn future_window(&self, as_of: NaiveDateTime) -> RetrievalWindow {
        let today = start_of_day(as_of);
        RetrievalWindow {
            start: today,
            end: shift_days(today, self.future_horizon_days),
            end_inclusive: true,
        }
    }

    /// 今日查询（结果按订单号排序）
    pub fn today_query(&self, as_of: NaiveDateTime) -> OrderQuery {
        let window = self.today_window(as_of);
        OrderQuery {
            start: window.start,
            end: window.end,
            end_inclusive: window.end_inclusive,
            status_filter: self.today_status_filter.clone(),
            unassigned_only: self.today_unassigned_only,
            sort: OrderSort::OrderNumber,
        }
    }

    /// 未来查询（结果按名义日期、订单号排序）
    pub fn future_query(&self, as_of: NaiveDateTime) -> OrderQuery {
        let window = self.future_window(as_of);
        OrderQuery {
            start: window.start,
            end: window.end,
            end_inclusive: window.end_inclusive,
            status_filter: self.future_status_filter.clone(),
            unassigned_only: false,
            sort: OrderSort::DeliveryDate,
        }
    }
}

/// 日期平移，越过 chrono 可表示范围时停在边界
fn shift_days(base: NaiveDateTime, days: i64) -> NaiveDateTime {
    let fallback = if days < 0 {
        NaiveDateTime::MIN
    } else {
        NaiveDateTime::MAX
    };
    Duration::try_days(days)
        .and_then(|delta| base.checked_add_signed(delta))
        .unwrap_or(fallback)
}

impl Default for WindowedRetriever {
    fn default() -> Self {
        Self::from_config(&DashboardConfig::default())
    }
}
