// ==========================================
// 仓库订单看板 - 诊断统计
// ==========================================
// 职责: 扫描全部订单，输出分组计数、规则归因与逐单诊断行
// 红线: 只读报表，结果不反向影响分桶
// ==========================================

use crate::domain::order::{OrderRow, RawOrderRecord};
use crate::domain::types::{Bucket, RuleAttribution};
use crate::engine::classifier::{bucket_for, start_of_day};
use crate::engine::date_label::format_display_date;
use crate::engine::order_mapper::{map_order, parse_rows};
use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, instrument};

const UNKNOWN_KEY: &str = "Unknown";
const EMPTY_STATUS_KEY: &str = "Empty";

/// 规则归因明细（每单一条，不去重）
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BusinessRuleAdjustments {
    pub minus1_day: Vec<String>,
    pub minus2_days: Vec<String>,
    pub no_adjustment: Vec<String>,
}

/// 逐单诊断行
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiagnosticRow {
    pub order_number: String,
    pub customer_name: String,
    pub customer_number: String,
    pub quantity: i64,
    pub delivery_method: String,
    pub route: Option<String>,
    pub warehouse_code: String,
    pub wms_status: String,
    pub hand_terminal: Option<String>,
    pub order_picker: Option<String>,
    pub notes: Option<String>,
    pub original_date: String,
    pub adjusted_date: String,
    pub days_difference: i64,
    pub attribution: RuleAttribution,
    pub in_today_list: bool,
    pub in_future_list: bool,
}

/// 诊断报告
#[derive(Debug, Clone, Default, Serialize)]
pub struct DiagnosticReport {
    pub total_orders: usize,
    /// 缺少必填字段而未计入统计的记录数
    pub unparsed_orders: usize,
    pub orders_with_minus1_day: usize,
    pub orders_with_minus2_days: usize,
    pub orders_in_past: usize,
    pub orders_in_today_list: usize,
    pub orders_in_future_list: usize,
    pub orders_in_today_list_by_minus1_day: usize,
    pub orders_in_today_list_by_minus2_days: usize,
    pub orders_by_delivery_method: HashMap<String, usize>,
    pub orders_by_warehouse: HashMap<String, usize>,
    pub orders_by_wms_status: HashMap<String, usize>,
    pub orders_by_original_date: BTreeMap<NaiveDate, usize>,
    pub orders_by_adjusted_date: BTreeMap<NaiveDate, usize>,
    pub business_rule_adjustments: BusinessRuleAdjustments,
    pub all_orders_data: Vec<DiagnosticRow>,
}

impl DiagnosticReport {
    /// 占总订单数的百分比；无订单时返回 0
    pub fn share_pct(&self, count: usize) -> f64 {
        if self.total_orders == 0 {
            return 0.0;
        }
        count as f64 * 100.0 / self.total_orders as f64
    }
}

// ==========================================
// StatsAggregator - 诊断统计器
// ==========================================
pub struct StatsAggregator;

impl StatsAggregator {
    /// 从存储原始行统计（坏记录计入 unparsed_orders）
    pub fn aggregate_rows(rows: Vec<OrderRow>, as_of: NaiveDateTime) -> DiagnosticReport {
        let parsed = parse_rows(rows);
        let mut report = Self::aggregate(&parsed.records, as_of);
        report.unparsed_orders = parsed.malformed.len();
        report
    }

    /// 统计全部订单
    #[instrument(skip(records), fields(count = records.len()))]
    pub fn aggregate(records: &[RawOrderRecord], as_of: NaiveDateTime) -> DiagnosticReport {
        let today = start_of_day(as_of);
        let mut report = DiagnosticReport {
            total_orders: records.len(),
            ..Default::default()
        };

        for record in records {
            let order = map_order(record);
            let nominal = order.nominal_date;
            let effective = order.effective_date;

            let delivery_method = key_or(&record.delivery_method, UNKNOWN_KEY);
            let warehouse = key_or(&record.warehouse_code, UNKNOWN_KEY);
            let wms_status = key_or(record.wms_status.as_deref().unwrap_or(""), EMPTY_STATUS_KEY);

            *report
                .orders_by_delivery_method
                .entry(delivery_method.clone())
                .or_insert(0) += 1;
            *report.orders_by_warehouse.entry(warehouse.clone()).or_insert(0) += 1;
            *report.orders_by_wms_status.entry(wms_status.clone()).or_insert(0) += 1;
            *report.orders_by_original_date.entry(nominal.date()).or_insert(0) += 1;
            *report.orders_by_adjusted_date.entry(effective.date()).or_insert(0) += 1;

            let days_difference = (nominal.date() - effective.date()).num_days();
            let attribution = RuleAttribution::from_day_delta(days_difference);
            match attribution {
                RuleAttribution::Minus1 => {
                    report.orders_with_minus1_day += 1;
                    report.business_rule_adjustments.minus1_day.push(delivery_method.clone());
                }
                RuleAttribution::Minus2 => {
                    report.orders_with_minus2_days += 1;
                    report.business_rule_adjustments.minus2_days.push(delivery_method.clone());
                }
                RuleAttribution::NoAdjustment => {
                    report.business_rule_adjustments.no_adjustment.push(delivery_method.clone());
                }
            }

            if effective < today {
                report.orders_in_past += 1;
            }

            let bucket = bucket_for(effective, as_of);
            let in_today_list = bucket == Bucket::Today;
            let in_future_list = bucket == Bucket::Future;

            if in_today_list {
                report.orders_in_today_list += 1;
                match attribution {
                    RuleAttribution::Minus1 => report.orders_in_today_list_by_minus1_day += 1,
                    RuleAttribution::Minus2 => report.orders_in_today_list_by_minus2_days += 1,
                    RuleAttribution::NoAdjustment => {}
                }
            } else if in_future_list {
                report.orders_in_future_list += 1;
            }

            report.all_orders_data.push(DiagnosticRow {
                order_number: record.order_number.clone(),
                customer_name: record.customer_name.clone(),
                customer_number: record.customer_number.clone(),
                quantity: record.quantity,
                delivery_method,
                route: record.route.clone(),
                warehouse_code: warehouse,
                wms_status,
                hand_terminal: record.hand_terminal.clone(),
                order_picker: record.order_picker.clone(),
                notes: record.notes.clone(),
                original_date: format_display_date(nominal.date()),
                adjusted_date: format_display_date(effective.date()),
                days_difference,
                attribution,
                in_today_list,
                in_future_list,
            });
        }

        debug!(
            total = report.total_orders,
            today = report.orders_in_today_list,
            future = report.orders_in_future_list,
            "诊断统计完成"
        );

        report
    }
}

fn key_or(value: &str, fallback: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        fallback.to_string()
    } else {
        trimmed.to_string()
    }
}
