// ==========================================
// 仓库订单看板 - 订单数据源接口
// ==========================================
// 职责: 定义数据访问协作方接口 + 带退避的重试装饰器
// 红线: 核心层不自行重试；重试只在数据源这一层完成
// ==========================================

use crate::domain::order::{OrderQuery, OrderRow};
use crate::repository::error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, warn};

// ==========================================
// OrderSource Trait
// ==========================================
// 实现者: SqliteOrderRepository / RetryingOrderSource
#[async_trait]
pub trait OrderSource: Send + Sync {
    /// 按名义日期范围查询订单行
    async fn fetch_orders_in_range(&self, query: &OrderQuery) -> RepositoryResult<Vec<OrderRow>>;

    /// 查询全部订单行（按名义日期、订单号排序）
    async fn fetch_all_orders(&self) -> RepositoryResult<Vec<OrderRow>>;

    /// 统计指定 WMS 状态的订单数
    async fn count_by_status(&self, status: &str) -> RepositoryResult<u64>;

    /// 连通性检查，失败返回 false
    async fn ping(&self) -> bool;
}

#[async_trait]
impl<T: OrderSource + ?Sized> OrderSource for Arc<T> {
    async fn fetch_orders_in_range(&self, query: &OrderQuery) -> RepositoryResult<Vec<OrderRow>> {
        (**self).fetch_orders_in_range(query).await
    }

    async fn fetch_all_orders(&self) -> RepositoryResult<Vec<OrderRow>> {
        (**self).fetch_all_orders().await
    }

    async fn count_by_status(&self, status: &str) -> RepositoryResult<u64> {
        (**self).count_by_status(status).await
    }

    async fn ping(&self) -> bool {
        (**self).ping().await
    }
}

// ==========================================
// RetryPolicy - 重试策略
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// 首次失败后的额外尝试次数
    pub max_retries: u32,
    /// 第 n 次重试前等待 base_delay * 2^n
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, base_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
        }
    }

    /// 第 attempt 次失败后的等待时间（attempt 从 0 开始）
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 1u32.checked_shl(attempt.min(16)).unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(factor)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(2, Duration::from_millis(1_000))
    }
}

/// 按策略执行操作，重试耗尽后返回 RetryExhausted
pub async fn with_retry<T, F, Fut>(
    policy: &RetryPolicy,
    operation: &str,
    mut op: F,
) -> RepositoryResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = RepositoryResult<T>>,
{
    let mut attempt: u32 = 0;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if attempt >= policy.max_retries {
                    error!(
                        operation,
                        attempts = attempt + 1,
                        error = %err,
                        "数据读取失败，重试已耗尽"
                    );
                    return Err(RepositoryError::RetryExhausted {
                        operation: operation.to_string(),
                        attempts: attempt + 1,
                        last: Box::new(err),
                    });
                }

                let delay = policy.delay_for(attempt);
                warn!(
                    operation,
                    attempt = attempt + 1,
                    delay_ms = delay.as_millis() as u64,
                    error = %err,
                    "数据读取失败，稍后重试"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}

// ==========================================
// RetryingOrderSource - 重试装饰器
// ==========================================
pub struct RetryingOrderSource<S> {
    inner: S,
    policy: RetryPolicy,
}

impl<S: OrderSource> RetryingOrderSource<S> {
    pub fn new(inner: S, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

#[async_trait]
impl<S: OrderSource> OrderSource for RetryingOrderSource<S> {
    async fn fetch_orders_in_range(&self, query: &OrderQuery) -> RepositoryResult<Vec<OrderRow>> {
        with_retry(&self.policy, "fetch_orders_in_range", move || {
            self.inner.fetch_orders_in_range(query)
        })
        .await
    }

    async fn fetch_all_orders(&self) -> RepositoryResult<Vec<OrderRow>> {
        with_retry(&self.policy, "fetch_all_orders", move || self.inner.fetch_all_orders()).await
    }

    async fn count_by_status(&self, status: &str) -> RepositoryResult<u64> {
        with_retry(&self.policy, "count_by_status", move || self.inner.count_by_status(status)).await
    }

    async fn ping(&self) -> bool {
        self.inner.ping().await
    }
}
