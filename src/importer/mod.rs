// ==========================================
// 仓库订单看板 - 导入层
// ==========================================
// 职责: 从 CSV 导出文件加载订单行（种子数据 / 离线快照）
// ==========================================

pub mod csv_orders;
pub mod error;

pub use csv_orders::{import_csv, parse_csv_file, parse_csv_reader, CsvImportReport, RowWarning};
pub use error::{ImportError, ImportResult};
