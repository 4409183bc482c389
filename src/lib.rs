//! signaliq - 网站营销技术栈信号评分引擎
//! 在页面的 script/link 标签中识别广告像素、统计与电商指纹，并计算加权线索分数

// 导出全局错误类型
pub use self::error::{FetchError, SignalError, SigResult};

// 导出配置模块
pub use self::config::{ConfigManager, CustomConfigBuilder, MatchMode, RetryPolicy, ScanConfig};

// 导出规则模块核心接口
pub use self::rule::{
    ScanResult, ScanStatus, SignalCategory, SignalScore, Signature, SignatureDef, SignatureRule,
    SignatureRegistry, RegistryBuilder, RuleLoader, MAX_SCORE,
};

// 导出提取模块核心接口
pub use self::extractor::{HtmlExtractor, MarkupGuard, TagEvidence};

// 导出工具模块核心接口
pub use self::utils::{normalize_url, parse_url_list, SignalTally};

// 导出编译模块核心接口
pub use self::compiler::{CompiledRuleLibrary, CompiledSignature, RuleCompiler};

// 导出检测模块核心接口
pub use self::detector::{global_matcher, init_global_matcher, scan, score, SignalMatcher};

// 导出拉取与批量扫描接口
pub use self::fetcher::{HttpFetcher, PageFetcher};
pub use self::batch::{AbortTrigger, BatchReport, BatchScanner, ScanAbort};

// 声明所有子模块
pub mod config;
pub mod error;
pub mod rule;
pub mod extractor;
pub mod utils;
pub mod compiler;
pub mod detector;
pub mod fetcher;
pub mod batch;
pub mod export;
