// ==========================================
// 仓库订单看板 - 订单看板 API
// ==========================================
// 职责: 看板调用方入口（今日列表 / 未来队列 / 诊断 / 状态计数）
// 架构: API 层 → Engine 层（纯规则） + OrderSource（数据访问）
// 红线: 不自行重试；数据源错误原样包装为 RetrievalFailed
// ==========================================

use std::sync::Arc;

use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::api::error::{ApiError, ApiResult};
use crate::config::dashboard_config::{DashboardConfig, STATUS_READ_BACK, STATUS_VALIDATED};
use crate::config::dashboard_config_trait::DashboardConfigReader;
use crate::domain::order::{NormalizedOrder, OrderQuery, OrderSort};
use crate::engine::classifier::OrderClassifier;
use crate::engine::order_mapper::map_rows;
use crate::engine::stats::{DiagnosticReport, StatsAggregator};
use crate::engine::window::WindowedRetriever;
use crate::repository::order_source::OrderSource;

/// 看板状态计数
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub read_back: u64,
    pub validated: u64,
}

/// 一次轮询的看板数据
#[derive(Debug, Clone, Serialize)]
pub struct DashboardData {
    pub as_of: NaiveDateTime,
    pub today_orders: Vec<NormalizedOrder>,
    pub future_orders: Vec<NormalizedOrder>,
    pub read_back_count: u64,
    pub validated_count: u64,
}

/// 读取看板配置
///
/// # 返回
/// - Err(ApiError::ConfigError): config_kv 不可读
pub async fn load_dashboard_config(reader: &dyn DashboardConfigReader) -> ApiResult<DashboardConfig> {
    reader
        .load_dashboard_config()
        .await
        .map_err(|e| ApiError::ConfigError(format!("读取看板配置失败: {}", e)))
}

// ==========================================
// OrderDashboardApi - 订单看板 API
// ==========================================

/// 订单看板 API
///
/// 每次调用都是独立的一轮: 查询 → 映射 → 分桶，不跨轮缓存。
/// `as_of` 为空时取本地当前时间，测试中显式传入。
pub struct OrderDashboardApi {
    source: Arc<dyn OrderSource>,
    retriever: WindowedRetriever,
}

impl OrderDashboardApi {
    /// 创建新的 OrderDashboardApi 实例
    ///
    /// # 参数
    /// - source: 数据源（通常是带重试的 SQLite 仓储）
    /// - config: 看板配置（窗口天数、状态过滤）
    pub fn new(source: Arc<dyn OrderSource>, config: &DashboardConfig) -> Self {
        Self {
            source,
            retriever: WindowedRetriever::from_config(config),
        }
    }

    fn resolve_as_of(as_of: Option<NaiveDateTime>) -> NaiveDateTime {
        as_of.unwrap_or_else(|| chrono::Local::now().naive_local())
    }

    // ==========================================
    // 今日 / 未来
    // ==========================================

    /// 今日列表（含逾期），按订单号排序
    ///
    /// # 返回
    /// - Ok(Vec<NormalizedOrder>): 生效日期为今天或更早的订单
    /// - Err(ApiError::RetrievalFailed): 数据源不可用
    #[instrument(skip(self))]
    pub async fn get_today_orders(
        &self,
        as_of: Option<NaiveDateTime>,
    ) -> ApiResult<Vec<NormalizedOrder>> {
        let as_of = Self::resolve_as_of(as_of);
        self.fetch_today(as_of).await
    }

    /// 未来队列，按生效日期、订单号排序
    #[instrument(skip(self))]
    pub async fn get_future_orders(
        &self,
        as_of: Option<NaiveDateTime>,
    ) -> ApiResult<Vec<NormalizedOrder>> {
        let as_of = Self::resolve_as_of(as_of);
        self.fetch_future(as_of).await
    }

    async fn fetch_today(&self, as_of: NaiveDateTime) -> ApiResult<Vec<NormalizedOrder>> {
        let query = self.retriever.today_query(as_of);
        let window = self.retriever.today_window(as_of);

        let rows = self.source.fetch_orders_in_range(&query).await?;
        let (orders, malformed) = map_rows(rows);
        let classification = OrderClassifier::classify_within(orders, as_of, &window);

        info!(
            today = classification.today.len(),
            skipped_future = classification.future.len(),
            malformed = malformed.len(),
            unclassified = classification.unclassified.len(),
            "今日列表已生成"
        );
        Ok(classification.today)
    }

    async fn fetch_future(&self, as_of: NaiveDateTime) -> ApiResult<Vec<NormalizedOrder>> {
        let query = self.retriever.future_query(as_of);
        let window = self.retriever.future_window(as_of);

        let rows = self.source.fetch_orders_in_range(&query).await?;
        let (orders, malformed) = map_rows(rows);
        let classification = OrderClassifier::classify_within(orders, as_of, &window);

        info!(
            future = classification.future.len(),
            skipped_today = classification.today.len(),
            malformed = malformed.len(),
            unclassified = classification.unclassified.len(),
            "未来队列已生成"
        );
        Ok(classification.future)
    }

    // ==========================================
    // 诊断
    // ==========================================

    /// 全量诊断报告（不限窗口、不限状态）
    #[instrument(skip(self))]
    pub async fn get_diagnostics(&self, as_of: Option<NaiveDateTime>) -> ApiResult<DiagnosticReport> {
        let as_of = Self::resolve_as_of(as_of);
        let rows = self.source.fetch_all_orders().await?;
        let report = StatsAggregator::aggregate_rows(rows, as_of);

        if report.unparsed_orders > 0 {
            warn!(unparsed = report.unparsed_orders, "诊断中存在无法解析的订单");
        }
        Ok(report)
    }

    // ==========================================
    // 状态计数 / 聚合
    // ==========================================

    /// "Read Back" 与 "Validated" 订单数
    pub async fn get_status_counts(&self) -> ApiResult<StatusCounts> {
        let (read_back, validated) = futures::try_join!(
            self.count_status(STATUS_READ_BACK),
            self.count_status(STATUS_VALIDATED),
        )?;
        Ok(StatusCounts {
            read_back,
            validated,
        })
    }

    async fn count_status(&self, status: &str) -> ApiResult<u64> {
        Ok(self.source.count_by_status(status).await?)
    }

    /// 一次轮询所需的全部看板数据
    ///
    /// 四个查询并发执行，任一失败则整轮失败（下一轮轮询重试）。
    #[instrument(skip(self))]
    pub async fn get_dashboard_data(&self, as_of: Option<NaiveDateTime>) -> ApiResult<DashboardData> {
        let as_of = Self::resolve_as_of(as_of);

        let (today_orders, future_orders, read_back_count, validated_count) = futures::try_join!(
            self.fetch_today(as_of),
            self.fetch_future(as_of),
            self.count_status(STATUS_READ_BACK),
            self.count_status(STATUS_VALIDATED),
        )?;

        Ok(DashboardData {
            as_of,
            today_orders,
            future_orders,
            read_back_count,
            validated_count,
        })
    }

    // ==========================================
    // 其他查询
    // ==========================================

    /// 按名义日期范围查询（两端包含，不分桶、不过滤状态）
    pub async fn get_orders_by_date_range(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> ApiResult<Vec<NormalizedOrder>> {
        if start > end {
            return Err(ApiError::InvalidInput(format!(
                "开始时间晚于结束时间: start={}, end={}",
                start, end
            )));
        }

        let query = OrderQuery {
            start,
            end,
            end_inclusive: true,
            status_filter: None,
            unassigned_only: false,
            sort: OrderSort::DeliveryDate,
        };
        let rows = self.source.fetch_orders_in_range(&query).await?;
        let (orders, _malformed) = map_rows(rows);
        Ok(orders)
    }

    /// 全部订单（已应用交货规则）
    pub async fn get_all_orders(&self) -> ApiResult<Vec<NormalizedOrder>> {
        let rows = self.source.fetch_all_orders().await?;
        let (orders, _malformed) = map_rows(rows);
        Ok(orders)
    }

    /// 数据源连通性检查
    pub async fn test_connection(&self) -> bool {
        self.source.ping().await
    }
}
