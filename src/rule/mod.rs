//! 规则模块：签名数据模型、注册表与加载
pub mod model;
pub mod detect_result;
pub mod registry;
pub mod loader;

// 导出核心接口
pub use self::model::{SignalCategory, Signature, SignatureDef, SignatureRule};
pub use self::detect_result::{ScanResult, ScanStatus, SignalScore, MAX_SCORE};
pub use self::registry::{builtin_signatures, web_stack_signatures, RegistryBuilder, SignatureRegistry};
pub use self::loader::RuleLoader;
