// ==========================================
// 仓库订单看板 - 看板配置
// ==========================================
// 默认值与 config_kv 缺省值保持一致
// ==========================================

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// 今日列表的 WMS 状态
pub const STATUS_SENT_TO_FILE: &str = "Sent to file";
/// 已回读状态（看板计数）
pub const STATUS_READ_BACK: &str = "Read Back";
/// 已校验状态（看板计数）
pub const STATUS_VALIDATED: &str = "Validated";

/// 看板配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// 今日窗口向前天数
    pub today_window_back_days: i64,
    /// 今日窗口向后天数（右开）
    pub today_window_forward_days: i64,
    /// 未来队列展望天数（右闭）
    pub future_horizon_days: i64,
    /// 今日查询的 WMS 状态过滤
    pub today_status_filter: Option<String>,
    /// 未来查询的 WMS 状态过滤
    pub future_status_filter: Option<String>,
    /// 今日查询只取未分配手持终端的订单
    pub today_unassigned_only: bool,
    /// 数据源失败后的最大重试次数
    pub retrieval_max_retries: u32,
    /// 重试基础延迟（毫秒），按 2^n 递增
    pub retrieval_base_delay_ms: u64,
    /// 看板轮询间隔（秒）
    pub poll_interval_secs: u64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            today_window_back_days: 3,
            today_window_forward_days: 5,
            future_horizon_days: 21,
            today_status_filter: Some(STATUS_SENT_TO_FILE.to_string()),
            future_status_filter: Some(STATUS_SENT_TO_FILE.to_string()),
            today_unassigned_only: true,
            retrieval_max_retries: 2,
            retrieval_base_delay_ms: 1_000,
            poll_interval_secs: 10,
        }
    }
}

impl DashboardConfig {
    pub fn retrieval_base_delay(&self) -> Duration {
        Duration::from_millis(self.retrieval_base_delay_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.max(1))
    }
}
