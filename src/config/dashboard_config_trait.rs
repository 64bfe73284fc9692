// ==========================================
// 仓库订单看板 - 看板配置读取 Trait
// ==========================================
// 职责: 定义看板所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use crate::config::dashboard_config::DashboardConfig;
use async_trait::async_trait;
use std::error::Error;

pub type ConfigResult<T> = Result<T, Box<dyn Error + Send + Sync>>;

// ==========================================
// DashboardConfigReader Trait
// ==========================================
// 实现者: ConfigManager（从 config_kv 表读取）
#[async_trait]
pub trait DashboardConfigReader: Send + Sync {
    // ===== 查询窗口 =====

    /// 今日窗口向前天数（默认 3）
    async fn get_today_window_back_days(&self) -> ConfigResult<i64>;

    /// 今日窗口向后天数（默认 5，右开区间）
    async fn get_today_window_forward_days(&self) -> ConfigResult<i64>;

    /// 未来队列展望天数（默认 21）
    async fn get_future_horizon_days(&self) -> ConfigResult<i64>;

    // ===== 状态过滤 =====

    /// 今日查询的 WMS 状态（空值 = 不过滤）
    async fn get_today_status_filter(&self) -> ConfigResult<Option<String>>;

    /// 未来查询的 WMS 状态（空值 = 不过滤）
    async fn get_future_status_filter(&self) -> ConfigResult<Option<String>>;

    /// 今日查询是否只取未分配手持终端的订单（默认 true）
    async fn get_today_unassigned_only(&self) -> ConfigResult<bool>;

    // ===== 数据源重试 =====

    /// 最大重试次数（默认 2）
    async fn get_retrieval_max_retries(&self) -> ConfigResult<u32>;

    /// 重试基础延迟毫秒（默认 1000）
    async fn get_retrieval_base_delay_ms(&self) -> ConfigResult<u64>;

    // ===== 轮询 =====

    /// 看板轮询间隔秒（默认 10）
    async fn get_poll_interval_secs(&self) -> ConfigResult<u64>;

    /// 一次性读取完整配置
    async fn load_dashboard_config(&self) -> ConfigResult<DashboardConfig> {
        Ok(DashboardConfig {
            today_window_back_days: self.get_today_window_back_days().await?,
            today_window_forward_days: self.get_today_window_forward_days().await?,
            future_horizon_days: self.get_future_horizon_days().await?,
            today_status_filter: self.get_today_status_filter().await?,
            future_status_filter: self.get_future_status_filter().await?,
            today_unassigned_only: self.get_today_unassigned_only().await?,
            retrieval_max_retries: self.get_retrieval_max_retries().await?,
            retrieval_base_delay_ms: self.get_retrieval_base_delay_ms().await?,
            poll_interval_secs: self.get_poll_interval_secs().await?,
        })
    }
}
