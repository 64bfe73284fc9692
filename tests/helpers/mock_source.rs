// ==========================================
// 假数据源 - 用于失败路径测试
// ==========================================

use async_trait::async_trait;
use std::sync::atomic::{AtomicU32, Ordering};
use warehouse_orders::domain::order::{OrderQuery, OrderRow};
use warehouse_orders::repository::{OrderSource, RepositoryError, RepositoryResult};

/// 始终失败的数据源（记录调用次数）
#[derive(Default)]
pub struct UnavailableSource {
    pub calls: AtomicU32,
}

impl UnavailableSource {
    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    fn fail<T>(&self) -> RepositoryResult<T> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(RepositoryError::DatabaseConnectionError(
            "server not reachable".to_string(),
        ))
    }
}

#[async_trait]
impl OrderSource for UnavailableSource {
    async fn fetch_orders_in_range(&self, _query: &OrderQuery) -> RepositoryResult<Vec<OrderRow>> {
        self.fail()
    }

    async fn fetch_all_orders(&self) -> RepositoryResult<Vec<OrderRow>> {
        self.fail()
    }

    async fn count_by_status(&self, _status: &str) -> RepositoryResult<u64> {
        self.fail()
    }

    async fn ping(&self) -> bool {
        false
    }
}

/// 固定返回给定行的数据源（忽略查询条件）
pub struct StaticSource {
    pub rows: Vec<OrderRow>,
}

#[async_trait]
impl OrderSource for StaticSource {
    async fn fetch_orders_in_range(&self, _query: &OrderQuery) -> RepositoryResult<Vec<OrderRow>> {
        Ok(self.rows.clone())
    }

    async fn fetch_all_orders(&self) -> RepositoryResult<Vec<OrderRow>> {
        Ok(self.rows.clone())
    }

    async fn count_by_status(&self, status: &str) -> RepositoryResult<u64> {
        let count = self
            .rows
            .iter()
            .filter(|r| r.wms_status.as_deref().map(str::trim) == Some(status))
            .count();
        Ok(count as u64)
    }

    async fn ping(&self) -> bool {
        true
    }
}

/// 每次查询都要等很久的数据源（模拟卡住的数据库）
pub struct SlowSource {
    pub delay: std::time::Duration,
    pub calls: AtomicU32,
}

impl SlowSource {
    pub fn new(delay: std::time::Duration) -> Self {
        Self {
            delay,
            calls: AtomicU32::new(0),
        }
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    async fn wait(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
    }
}

#[async_trait]
impl OrderSource for SlowSource {
    async fn fetch_orders_in_range(&self, _query: &OrderQuery) -> RepositoryResult<Vec<OrderRow>> {
        self.wait().await;
        Ok(Vec::new())
    }

    async fn fetch_all_orders(&self) -> RepositoryResult<Vec<OrderRow>> {
        self.wait().await;
        Ok(Vec::new())
    }

    async fn count_by_status(&self, _status: &str) -> RepositoryResult<u64> {
        self.wait().await;
        Ok(0)
    }

    async fn ping(&self) -> bool {
        true
    }
}
