// ==========================================
// 仓库订单看板 - 配置层
// ==========================================
// 职责: 看板配置管理（查询窗口、状态过滤、重试、轮询）
// 存储: config_kv 表
// ==========================================

pub mod config_manager;
pub mod dashboard_config;
pub mod dashboard_config_trait;

// 重导出核心配置管理器
pub use config_manager::{config_keys, ConfigManager};
pub use dashboard_config::{
    DashboardConfig, STATUS_READ_BACK, STATUS_SENT_TO_FILE, STATUS_VALIDATED,
};
pub use dashboard_config_trait::{ConfigResult, DashboardConfigReader};
