// ==========================================
// 仓库订单看板 - 轮询循环
// ==========================================
// 职责: 按固定间隔刷新看板数据，直到收到退出信号
// 红线: 单轮失败只记日志，不中断循环
// ==========================================

use std::future::Future;
use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tracing::{error, info};

use crate::api::order_api::OrderDashboardApi;

/// 持续轮询，直到 shutdown 完成
///
/// shutdown 只创建一次并在整个循环中保持挂起，
/// 正在进行中的一轮也会被退出信号打断。
///
/// # 返回
/// 成功刷新的轮数
pub async fn run_polling<F>(api: &OrderDashboardApi, interval: Duration, shutdown: F) -> u64
where
    F: Future,
{
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    tokio::pin!(shutdown);
    let mut refreshed = 0u64;

    loop {
        tokio::select! {
            biased;
            _ = &mut shutdown => {
                info!(refreshed, "收到退出信号，停止轮询");
                break;
            }
            ok = async {
                ticker.tick().await;
                run_cycle(api).await
            } => {
                if ok {
                    refreshed += 1;
                }
            }
        }
    }

    refreshed
}

/// 一轮轮询；失败只记日志，下一轮自动重试
pub async fn run_cycle(api: &OrderDashboardApi) -> bool {
    match api.get_dashboard_data(None).await {
        Ok(data) => {
            let overdue = data
                .today_orders
                .iter()
                .filter(|o| o.effective_date.date() < data.as_of.date())
                .count();
            info!(
                as_of = %data.as_of,
                today = data.today_orders.len(),
                overdue,
                future = data.future_orders.len(),
                read_back = data.read_back_count,
                validated = data.validated_count,
                "看板数据已刷新"
            );
            true
        }
        Err(e) => {
            error!(error = %e, "看板数据刷新失败，等待下一轮");
            false
        }
    }
}
