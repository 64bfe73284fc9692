// CSV 订单导入工具：把 WMS 导出的订单行写入看板数据库。
//
// Usage:
//   cargo run --bin import_orders -- <orders.csv> [db_path] [--replace]
//
// 表头需与 order_line 列名一致；无法解析的行会被报告并跳过。

use anyhow::{bail, Context};
use std::path::PathBuf;
use warehouse_orders::db::default_db_path;
use warehouse_orders::importer::import_csv;
use warehouse_orders::logging;
use warehouse_orders::repository::SqliteOrderRepository;

fn main() -> anyhow::Result<()> {
    logging::init();

    let mut replace = false;
    let mut positional = Vec::new();
    for arg in std::env::args().skip(1) {
        if arg == "--replace" {
            replace = true;
        } else {
            positional.push(arg);
        }
    }

    let mut positional = positional.into_iter();
    let csv_path = match positional.next() {
        Some(p) => PathBuf::from(p),
        None => bail!("usage: import_orders <orders.csv> [db_path] [--replace]"),
    };
    let db_path = positional.next().unwrap_or_else(default_db_path);

    let repo = SqliteOrderRepository::new(&db_path)
        .with_context(|| format!("无法打开订单数据库: {}", db_path))?;

    if replace {
        let removed = repo.delete_all()?;
        println!("removed={}", removed);
    }

    let report = import_csv(&repo, &csv_path)
        .with_context(|| format!("导入失败: {}", csv_path.display()))?;

    for warning in &report.warnings {
        eprintln!(
            "line {}: {} ({})",
            warning.line,
            warning.message,
            warning.order_number.as_deref().unwrap_or("-")
        );
    }
    println!("inserted={} skipped={}", report.inserted, report.warnings.len());
    Ok(())
}
