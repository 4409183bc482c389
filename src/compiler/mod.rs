//! 编译模块：将签名规则编译为可执行的匹配器
pub mod pattern;
pub mod compiler;

pub use self::pattern::{CompiledRuleLibrary, CompiledSignature, Matcher};
pub use self::compiler::{CompileStats, RuleCompiler};
