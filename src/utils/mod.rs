//! 工具模块
pub mod signal_tally;
pub mod url_normalizer;

pub use self::signal_tally::SignalTally;
pub use self::url_normalizer::{normalize_url, parse_url_list};
