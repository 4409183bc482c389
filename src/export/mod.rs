//! 导出模块：CSV / JSON / 终端表格
pub mod csv;
pub mod json;
pub mod report;

pub use self::csv::{save_csv, write_csv, CSV_HEADER};
pub use self::json::to_pretty_json;
pub use self::report::render_table;
