// ==========================================
// API集成测试辅助工具
// ==========================================
// 职责: 临时 SQLite 数据库 + 仓储 + 看板 API
// ==========================================

use std::sync::Arc;
use tempfile::NamedTempFile;

use warehouse_orders::api::OrderDashboardApi;
use warehouse_orders::config::DashboardConfig;
use warehouse_orders::domain::order::OrderRow;
use warehouse_orders::repository::{OrderSource, SqliteOrderRepository};

/// API测试环境
pub struct ApiTestEnv {
    pub _temp_file: NamedTempFile,
    pub db_path: String,
    pub repo: Arc<SqliteOrderRepository>,
    pub api: OrderDashboardApi,
}

impl ApiTestEnv {
    /// 使用默认看板配置创建测试环境
    pub fn new() -> Result<Self, Box<dyn std::error::Error>> {
        Self::with_config(&DashboardConfig::default())
    }

    pub fn with_config(config: &DashboardConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let temp_file = NamedTempFile::new()?;
        let db_path = temp_file
            .path()
            .to_str()
            .ok_or("临时文件路径不是 UTF-8")?
            .to_string();

        let repo = Arc::new(SqliteOrderRepository::new(&db_path)?);
        let source: Arc<dyn OrderSource> = repo.clone();
        let api = OrderDashboardApi::new(source, config);

        Ok(Self {
            _temp_file: temp_file,
            db_path,
            repo,
            api,
        })
    }

    /// 写入订单行
    pub fn seed(&self, rows: &[OrderRow]) {
        self.repo.insert_rows(rows).expect("写入测试订单失败");
    }
}
