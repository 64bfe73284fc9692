// ==========================================
// 仓库订单看板 - 核心库
// ==========================================
// 职责: 按交货方式调整交货日期，并把订单分入今日列表 / 未来队列
// 技术栈: Rust + SQLite + tokio
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与规则表
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 业务规则
pub mod engine;

// 导入层 - CSV 订单
pub mod importer;

// 配置层 - 看板配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一/建表）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 看板接口
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{Bucket, DeliveryCategory, DeliveryRule, RouteKind, RuleAttribution};

// 领域实体
pub use domain::{MalformedRecord, NormalizedOrder, OrderQuery, OrderRow, OrderSort, RawOrderRecord};

// 引擎
pub use engine::{
    adjust_order_date, Classification, DiagnosticReport, OrderClassifier, StatsAggregator,
    WindowedRetriever,
};

// 数据访问
pub use repository::{OrderSource, RetryPolicy, RetryingOrderSource, SqliteOrderRepository};

// API
pub use api::{ApiError, ApiResult, DashboardData, OrderDashboardApi, StatusCounts};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "仓库订单看板";
