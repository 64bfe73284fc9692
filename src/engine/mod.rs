// ==========================================
// 仓库订单看板 - 引擎层
// ==========================================
// 职责: 交货日期调整、订单映射、窗口计算、分桶、诊断统计
// 红线: Engine 不拼 SQL, 不读系统时钟（基准时间由调用方传入）
// ==========================================

pub mod classifier;
pub mod date_adjuster;
pub mod date_label;
pub mod order_mapper;
pub mod stats;
pub mod window;

// 重导出核心引擎
pub use classifier::{bucket_for, is_future, is_today, start_of_day, Classification, OrderClassifier};
pub use date_adjuster::{adjust_order_date, subtract_business_days};
pub use date_label::{format_display_date, format_order_date};
pub use order_mapper::{map_order, map_rows, parse_rows, ParsedRows};
pub use stats::{BusinessRuleAdjustments, DiagnosticReport, DiagnosticRow, StatsAggregator};
pub use window::{RetrievalWindow, WindowedRetriever, MAX_ADJUSTMENT_DRIFT_DAYS};
