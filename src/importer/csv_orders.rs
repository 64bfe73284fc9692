// ==========================================
// 仓库订单看板 - CSV 订单导入
// ==========================================
// 表头: 与 order_line 列名一致（顺序不限，多余列忽略）
// 空白单元格 → NULL；数量/日期有值但无法解析 → 整行跳过并报告
// ==========================================

use crate::domain::order::OrderRow;
use crate::importer::error::{ImportError, ImportResult};
use crate::repository::order_repo::SqliteOrderRepository;
use chrono::{NaiveDate, NaiveDateTime};
use csv::ReaderBuilder;
use serde::Serialize;
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};

/// 必需列
const REQUIRED_COLUMNS: [&str; 2] = ["order_number", "delivery_date"];

const DATETIME_FORMATS: [&str; 7] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    // SQL Server DATETIME 导出带毫秒
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%d-%m-%Y %H:%M:%S",
    "%d-%m-%Y %H:%M",
];

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%d-%m-%Y", "%Y%m%d"];

/// 跳过行的说明
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowWarning {
    /// CSV 行号（表头为第 1 行）
    pub line: usize,
    pub order_number: Option<String>,
    pub message: String,
}

/// 导入结果
#[derive(Debug, Clone, Default)]
pub struct CsvImportReport {
    pub rows: Vec<OrderRow>,
    pub warnings: Vec<RowWarning>,
    /// 实际写入数据库的行数（仅 import_csv 填写）
    pub inserted: usize,
}

// ==========================================
// 解析
// ==========================================

/// 解析 CSV 文件
pub fn parse_csv_file(path: &Path) -> ImportResult<CsvImportReport> {
    if !path.exists() {
        return Err(ImportError::FileNotFound(path.display().to_string()));
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    if ext != "csv" {
        return Err(ImportError::UnsupportedFormat(ext));
    }

    let file = File::open(path)?;
    parse_csv_reader(file)
}

/// 从任意输入流解析 CSV
pub fn parse_csv_reader<R: Read>(input: R) -> ImportResult<CsvImportReport> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(input);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().trim_start_matches('\u{feff}').to_string())
        .collect();

    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(ImportError::MissingColumn(column.to_string()));
        }
    }

    let mut report = CsvImportReport::default();
    for (idx, result) in reader.records().enumerate() {
        let line = idx + 2;
        let record = result?;

        let mut cells: HashMap<&str, &str> = HashMap::new();
        for (col_idx, value) in record.iter().enumerate() {
            if let Some(header) = headers.get(col_idx) {
                cells.insert(header.as_str(), value);
            }
        }

        // 跳过完全空白的行
        if cells.values().all(|v| v.trim().is_empty()) {
            continue;
        }

        match build_row(&cells) {
            Ok(row) => report.rows.push(row),
            Err(message) => {
                let order_number = text(&cells, "order_number");
                warn!(
                    line,
                    order_number = order_number.as_deref().unwrap_or(""),
                    message = %message,
                    "跳过无法解析的 CSV 行"
                );
                report.warnings.push(RowWarning {
                    line,
                    order_number,
                    message,
                });
            }
        }
    }

    Ok(report)
}

/// 解析 CSV 并写入 order_line
pub fn import_csv(repo: &SqliteOrderRepository, path: &Path) -> ImportResult<CsvImportReport> {
    let mut report = parse_csv_file(path)?;
    report.inserted = repo.insert_rows(&report.rows)?;

    info!(
        path = %path.display(),
        inserted = report.inserted,
        skipped = report.warnings.len(),
        "CSV 订单导入完成"
    );
    Ok(report)
}

// ==========================================
// 单元格转换
// ==========================================

fn build_row(cells: &HashMap<&str, &str>) -> Result<OrderRow, String> {
    let quantity = match text(cells, "quantity") {
        None => None,
        Some(raw) => Some(parse_quantity(&raw).ok_or_else(|| format!("数量格式错误: {}", raw))?),
    };

    let delivery_date = match text(cells, "delivery_date") {
        None => None,
        Some(raw) => {
            Some(parse_delivery_date(&raw).ok_or_else(|| format!("交货日期格式错误: {}", raw))?)
        }
    };

    Ok(OrderRow {
        order_number: text(cells, "order_number"),
        customer_name: text(cells, "customer_name"),
        customer_number: text(cells, "customer_number"),
        quantity,
        // 交货方式保留原值，由规则表自行 trim
        delivery_method: raw_text(cells, "delivery_method"),
        route: text(cells, "route"),
        warehouse_code: text(cells, "warehouse_code"),
        wms_status: text(cells, "wms_status"),
        hand_terminal: text(cells, "hand_terminal"),
        order_picker: text(cells, "order_picker"),
        notes: text(cells, "notes"),
        delivery_date,
    })
}

fn text(cells: &HashMap<&str, &str>, column: &str) -> Option<String> {
    cells
        .get(column)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn raw_text(cells: &HashMap<&str, &str>, column: &str) -> Option<String> {
    cells
        .get(column)
        .filter(|v| !v.trim().is_empty())
        .map(|v| v.to_string())
}

fn parse_quantity(raw: &str) -> Option<i64> {
    if let Ok(v) = raw.parse::<i64>() {
        return Some(v);
    }
    // Excel 导出的 "12.0"
    raw.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && v.fract() == 0.0)
        .map(|v| v as i64)
}

/// 解析交货日期（纯日期按零点处理）
pub fn parse_delivery_date(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    for fmt in DATETIME_FORMATS {
        if let Ok(v) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(v);
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(raw, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }
    None
}
