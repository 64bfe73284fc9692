// ==========================================
// 仓库订单看板 - 轮询主入口
// ==========================================
// 用法:
//   warehouse-orders           按 poll_interval_secs 持续轮询并记录摘要
//   warehouse-orders --once    拉取一次看板数据，以 JSON 输出到 stdout
// 数据库路径: 环境变量 WAREHOUSE_ORDERS_DB，否则使用用户数据目录
// ==========================================

use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};

use warehouse_orders::api::{load_dashboard_config, run_polling, ApiError};
use warehouse_orders::config::ConfigManager;
use warehouse_orders::db::default_db_path;
use warehouse_orders::logging;
use warehouse_orders::repository::{RetryPolicy, RetryingOrderSource, SqliteOrderRepository};
use warehouse_orders::OrderDashboardApi;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();

    info!("==================================================");
    info!("{} - 系统版本: {}", warehouse_orders::APP_NAME, warehouse_orders::VERSION);
    info!("==================================================");

    let once = std::env::args().skip(1).any(|arg| arg == "--once");

    let db_path = default_db_path();
    info!("使用数据库: {}", db_path);

    let repo = SqliteOrderRepository::new(&db_path)
        .with_context(|| format!("无法打开订单数据库: {}", db_path))?;
    let config_manager = ConfigManager::from_connection(repo.connection())
        .map_err(|e| ApiError::ConfigError(format!("初始化配置表失败: {}", e)))?;
    let config = load_dashboard_config(&config_manager).await?;
    info!(?config, "看板配置已加载");

    let policy = RetryPolicy::new(config.retrieval_max_retries, config.retrieval_base_delay());
    let source = RetryingOrderSource::new(repo, policy);
    let api = OrderDashboardApi::new(Arc::new(source), &config);

    if !api.test_connection().await {
        warn!("数据库连通性检查失败，将在轮询中继续重试");
    }

    if once {
        let data = api.get_dashboard_data(None).await?;
        println!("{}", serde_json::to_string_pretty(&data)?);
        return Ok(());
    }

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            // 监听失败时不能当作退出信号，继续轮询
            warn!(error = %e, "无法监听退出信号");
            std::future::pending::<()>().await;
        }
    };
    run_polling(&api, config.poll_interval(), shutdown).await;

    Ok(())
}
