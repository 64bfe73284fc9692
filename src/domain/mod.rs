// ==========================================
// 仓库订单看板 - 领域模型层
// ==========================================
// 职责: 定义订单实体、规则表、分桶类型
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod order;
pub mod types;

// 重导出核心类型
pub use order::{
    MalformedRecord, NormalizedOrder, OrderQuery, OrderRow, OrderSort, RawOrderRecord,
};
pub use types::{Bucket, DeliveryCategory, DeliveryRule, RouteKind, RuleAttribution};
