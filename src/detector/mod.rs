//! 检测模块：信号匹配核心逻辑
pub mod global;
pub mod analyzer;
pub mod detector;

// 导出核心接口
pub use self::global::{init_global_matcher, global_matcher, scan, score};
pub use self::analyzer::EvidenceAnalyzer;
pub use self::detector::SignalMatcher;
