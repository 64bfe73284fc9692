// ==========================================
// 仓库订单看板 - API 层
// ==========================================
// 职责: 提供看板调用方接口（轮询程序 / 展示层）
// ==========================================

pub mod error;
pub mod order_api;
pub mod poller;

// 重导出核心类型
pub use error::{ApiError, ApiResult};
pub use order_api::{load_dashboard_config, DashboardData, OrderDashboardApi, StatusCounts};
pub use poller::{run_cycle, run_polling};
