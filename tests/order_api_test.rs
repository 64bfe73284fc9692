// ==========================================
// OrderDashboardApi 集成测试
// ==========================================
// 测试范围:
// 1. 今日列表: 规则提前、逾期、手持终端/状态过滤、坏记录跳过
// 2. 未来队列: 排序、今日订单不重复出现、窗口边界
// 3. 看板聚合 / 状态计数 / 诊断
// 4. 数据源不可用: RetrievalFailed 整轮失败
// 基准时间: 2025-07-23 (周三) 10:00
// ==========================================

mod helpers;

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDateTime;
use helpers::api_test_helper::ApiTestEnv;
use helpers::mock_source::{StaticSource, UnavailableSource};
use helpers::test_data_builder::{dt, OrderRowBuilder};
use warehouse_orders::api::{ApiError, OrderDashboardApi};
use warehouse_orders::config::{DashboardConfig, STATUS_READ_BACK, STATUS_VALIDATED};
use warehouse_orders::domain::order::{NormalizedOrder, OrderRow};
use warehouse_orders::repository::{OrderSource, RepositoryError, RetryPolicy, RetryingOrderSource};

fn as_of() -> NaiveDateTime {
    dt(2025, 7, 23, 10, 0)
}

fn ids(orders: &[NormalizedOrder]) -> Vec<&str> {
    orders.iter().map(|o| o.id.as_str()).collect()
}

/// 固定场景
fn scenario() -> Vec<OrderRow> {
    vec![
        // 今日: 周四 → 周三
        OrderRowBuilder::new("SO-003", "10", dt(2025, 7, 24, 8, 0)).build(),
        // 今日: 周五 -2 → 周三
        OrderRowBuilder::new("SO-001", "32", dt(2025, 7, 25, 0, 0)).build(),
        // 今日: 未知代码不调整
        OrderRowBuilder::new("SO-004", "XYZ", dt(2025, 7, 23, 14, 0)).build(),
        // 逾期: 周一 → 上周五
        OrderRowBuilder::new("SO-002", "EXW", dt(2025, 7, 21, 0, 0)).build(),
        // 未来: 下周一 09:00 -2 → 周四 09:00
        OrderRowBuilder::new("SO-005", "50", dt(2025, 7, 28, 9, 0)).build(),
        // 未来: 下周一 -1 → 周五（名义日期落在今日窗口右开边界上）
        OrderRowBuilder::new("SO-006", "60", dt(2025, 7, 28, 0, 0)).build(),
        // 未来: 周五 → 周四
        OrderRowBuilder::new("SO-010", "10", dt(2025, 7, 25, 0, 0)).build(),
        // 未来: 下周二 -2 → 周五
        OrderRowBuilder::new("SO-011", "DAP", dt(2025, 7, 29, 0, 0)).build(),
        // 已分配手持终端，不进今日列表
        OrderRowBuilder::new("SO-020", "10", dt(2025, 7, 24, 8, 0))
            .hand_terminal("HT-07")
            .build(),
        // 其他状态
        OrderRowBuilder::new("SO-030", "10", dt(2025, 7, 24, 8, 0))
            .status(STATUS_VALIDATED)
            .build(),
        OrderRowBuilder::new("SO-031", "10", dt(2025, 7, 1, 8, 0))
            .status(STATUS_READ_BACK)
            .build(),
        OrderRowBuilder::new("SO-032", "32", dt(2025, 7, 2, 8, 0))
            .status(STATUS_READ_BACK)
            .build(),
        // 缺少客户名称
        OrderRowBuilder::new("SO-099", "10", dt(2025, 7, 24, 8, 0))
            .without_customer_name()
            .build(),
    ]
}

fn seeded_env() -> ApiTestEnv {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    env.seed(&scenario());
    env
}

// ==========================================
// 今日列表
// ==========================================

#[tokio::test]
async fn test_get_today_orders_sorted_by_id_with_overdue() {
    let env = seeded_env();

    let today = env.api.get_today_orders(Some(as_of())).await.expect("查询失败");

    assert_eq!(ids(&today), vec!["SO-001", "SO-002", "SO-003", "SO-004"]);

    let overdue = today.iter().find(|o| o.id == "SO-002").unwrap();
    assert_eq!(overdue.effective_date, dt(2025, 7, 18, 0, 0));
    assert_eq!(overdue.nominal_date, dt(2025, 7, 21, 0, 0));

    let adjusted = today.iter().find(|o| o.id == "SO-003").unwrap();
    assert_eq!(adjusted.effective_date, dt(2025, 7, 23, 8, 0));
}

#[tokio::test]
async fn test_get_today_orders_empty() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let today = env.api.get_today_orders(Some(as_of())).await.expect("查询失败");
    assert!(today.is_empty());
}

#[tokio::test]
async fn test_get_today_orders_without_terminal_filter() {
    let config = DashboardConfig {
        today_unassigned_only: false,
        ..DashboardConfig::default()
    };
    let env = ApiTestEnv::with_config(&config).expect("无法创建测试环境");
    env.seed(&scenario());

    let today = env.api.get_today_orders(Some(as_of())).await.expect("查询失败");
    assert!(ids(&today).contains(&"SO-020"));
}

// ==========================================
// 未来队列
// ==========================================

#[tokio::test]
async fn test_get_future_orders_sorted_by_effective_date() {
    let env = seeded_env();

    let future = env.api.get_future_orders(Some(as_of())).await.expect("查询失败");

    assert_eq!(ids(&future), vec!["SO-010", "SO-005", "SO-006", "SO-011"]);
    for order in &future {
        assert!(order.effective_date >= dt(2025, 7, 24, 0, 0));
    }
}

#[tokio::test]
async fn test_today_and_future_disjoint() {
    let env = seeded_env();

    let today = env.api.get_today_orders(Some(as_of())).await.unwrap();
    let future = env.api.get_future_orders(Some(as_of())).await.unwrap();

    for order in &today {
        assert!(
            !future.iter().any(|f| f.id == order.id),
            "订单 {} 同时出现在两个列表",
            order.id
        );
    }
    // 名义日期周五、生效日期今天: 只在今日列表
    assert!(ids(&today).contains(&"SO-001"));
    assert!(!ids(&future).contains(&"SO-001"));
}

#[tokio::test]
async fn test_future_window_end_inclusive() {
    let env = ApiTestEnv::new().unwrap();
    env.seed(&[
        OrderRowBuilder::new("SO-100", "XYZ", dt(2025, 8, 13, 0, 0)).build(),
        OrderRowBuilder::new("SO-101", "XYZ", dt(2025, 8, 13, 0, 1)).build(),
    ]);

    let future = env.api.get_future_orders(Some(as_of())).await.unwrap();
    assert_eq!(ids(&future), vec!["SO-100"]);
}

// ==========================================
// 存储格式
// ==========================================

#[tokio::test]
async fn test_today_orders_keep_millisecond_nominal() {
    let env = ApiTestEnv::new().unwrap();
    let nominal = dt(2025, 7, 24, 8, 0) + chrono::Duration::milliseconds(500);
    env.seed(&[OrderRowBuilder::new("SO-500", "10", nominal).build()]);

    let today = env.api.get_today_orders(Some(as_of())).await.unwrap();

    assert_eq!(ids(&today), vec!["SO-500"]);
    assert_eq!(today[0].nominal_date, nominal);
    assert_eq!(
        today[0].effective_date,
        dt(2025, 7, 23, 8, 0) + chrono::Duration::milliseconds(500)
    );
}

#[tokio::test]
async fn test_externally_written_dates_are_fetched() {
    let env = ApiTestEnv::new().unwrap();
    {
        let conn = env.repo.connection();
        let conn = conn.lock().unwrap();
        conn.execute_batch(
            r#"
            INSERT INTO order_line (order_number, customer_name, customer_number, quantity,
                                    delivery_method, warehouse_code, wms_status, delivery_date)
                VALUES ('OD-1', 'Bakker BV', 'D100', 1, 'XYZ', '200', 'Sent to file', '2025-07-20');
            INSERT INTO order_line (order_number, customer_name, customer_number, quantity,
                                    delivery_method, warehouse_code, wms_status, delivery_date)
                VALUES ('OD-2', 'Bakker BV', 'D100', 1, 'XYZ', '200', 'Sent to file', '2025-08-13T00:00:00');
            "#,
        )
        .unwrap();
    }

    // 今日窗口第一天的纯日期记录（逾期）
    let today = env.api.get_today_orders(Some(as_of())).await.unwrap();
    assert_eq!(ids(&today), vec!["OD-1"]);

    // 未来窗口右闭端点上的 T 分隔记录
    let future = env.api.get_future_orders(Some(as_of())).await.unwrap();
    assert_eq!(ids(&future), vec!["OD-2"]);
}

// ==========================================
// 看板聚合 / 状态计数
// ==========================================

#[tokio::test]
async fn test_get_dashboard_data() {
    let env = seeded_env();

    let data = env.api.get_dashboard_data(Some(as_of())).await.expect("查询失败");

    assert_eq!(data.as_of, as_of());
    assert_eq!(data.today_orders.len(), 4);
    assert_eq!(data.future_orders.len(), 4);
    assert_eq!(data.read_back_count, 2);
    assert_eq!(data.validated_count, 1);
}

#[tokio::test]
async fn test_get_status_counts() {
    let env = seeded_env();
    let counts = env.api.get_status_counts().await.unwrap();
    assert_eq!(counts.read_back, 2);
    assert_eq!(counts.validated, 1);
}

// ==========================================
// 诊断
// ==========================================

#[tokio::test]
async fn test_get_diagnostics_counts_malformed() {
    let env = seeded_env();

    let report = env.api.get_diagnostics(Some(as_of())).await.expect("查询失败");

    assert_eq!(report.total_orders, 12);
    assert_eq!(report.unparsed_orders, 1);
    assert_eq!(report.all_orders_data.len(), 12);
    assert_eq!(
        report.orders_by_wms_status.get(STATUS_READ_BACK).copied(),
        Some(2)
    );
    // SO-002 / SO-031 / SO-032 的生效日期早于今天
    assert_eq!(report.orders_in_past, 3);

    let row = report
        .all_orders_data
        .iter()
        .find(|r| r.order_number == "SO-002")
        .unwrap();
    assert_eq!(row.original_date, "21-7-2025");
    assert_eq!(row.adjusted_date, "18-7-2025");
    assert_eq!(row.days_difference, 3);
    assert!(row.in_today_list);
}

// ==========================================
// 其他查询
// ==========================================

#[tokio::test]
async fn test_get_orders_by_date_range() {
    let env = seeded_env();

    let orders = env
        .api
        .get_orders_by_date_range(dt(2025, 7, 28, 0, 0), dt(2025, 7, 29, 0, 0))
        .await
        .unwrap();
    assert_eq!(ids(&orders), vec!["SO-006", "SO-005", "SO-011"]);

    let err = env
        .api
        .get_orders_by_date_range(dt(2025, 7, 29, 0, 0), dt(2025, 7, 28, 0, 0))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput(_)));
}

#[tokio::test]
async fn test_get_all_orders_skips_malformed() {
    let env = seeded_env();
    let orders = env.api.get_all_orders().await.unwrap();
    assert_eq!(orders.len(), 12);
    assert!(env.api.test_connection().await);
}

#[tokio::test]
async fn test_static_source_out_of_window_excluded() {
    // 忽略查询条件的数据源: 窗口外的订单进入 unclassified，不出现在今日列表
    let source = StaticSource {
        rows: vec![
            OrderRowBuilder::new("SO-001", "10", dt(2025, 7, 24, 8, 0)).build(),
            OrderRowBuilder::new("SO-900", "XYZ", dt(2025, 6, 1, 8, 0)).build(),
        ],
    };
    let api = OrderDashboardApi::new(Arc::new(source), &DashboardConfig::default());

    let today = api.get_today_orders(Some(as_of())).await.unwrap();
    assert_eq!(ids(&today), vec!["SO-001"]);
}

// ==========================================
// 数据源不可用
// ==========================================

#[tokio::test]
async fn test_unavailable_source_exhausts_retries() {
    let unavailable = Arc::new(UnavailableSource::default());
    let policy = RetryPolicy::new(2, Duration::from_millis(1));
    let source = RetryingOrderSource::new(Arc::clone(&unavailable), policy);
    let api = OrderDashboardApi::new(Arc::new(source), &DashboardConfig::default());

    let err = api.get_today_orders(Some(as_of())).await.unwrap_err();

    match err {
        ApiError::RetrievalFailed(RepositoryError::RetryExhausted { attempts, .. }) => {
            assert_eq!(attempts, 3);
        }
        other => panic!("Expected RetrievalFailed, got {:?}", other),
    }
    assert_eq!(unavailable.calls(), 3);
    assert!(!api.test_connection().await);
}

#[tokio::test]
async fn test_unavailable_source_fails_whole_cycle() {
    let api = OrderDashboardApi::new(
        Arc::new(UnavailableSource::default()),
        &DashboardConfig::default(),
    );

    let err = api.get_dashboard_data(Some(as_of())).await.unwrap_err();
    assert!(err.is_retrieval_failure());

    let err = api.get_diagnostics(Some(as_of())).await.unwrap_err();
    assert!(err.is_retrieval_failure());
}

#[tokio::test]
async fn test_as_of_defaults_to_now() {
    let source: Arc<dyn OrderSource> = Arc::new(StaticSource { rows: Vec::new() });
    let api = OrderDashboardApi::new(source, &DashboardConfig::default());
    let data = api.get_dashboard_data(None).await.unwrap();
    assert!(data.today_orders.is_empty());
}
