//! 检测分析器：负责在证据文本上逐条执行签名
use tracing::debug;

use crate::compiler::CompiledRuleLibrary;
use crate::utils::SignalTally;

/// 证据分析器
pub struct EvidenceAnalyzer;

impl EvidenceAnalyzer {
    /// 按注册表顺序匹配全部签名，命中结果写入计分器
    pub fn analyze(compiled_lib: &CompiledRuleLibrary, text: &str, tally: &mut SignalTally) {
        if text.is_empty() {
            return;
        }
        let lowered = text.to_ascii_lowercase();

        for (index, compiled) in compiled_lib.signatures.iter().enumerate() {
            // 跳过已命中的签名
            if tally.contains(index) {
                continue;
            }

            if let Some(matcher) = compiled.first_match(text, &lowered) {
                debug!(
                    "签名匹配成功：技术={}，分值={}，规则={}",
                    compiled.name,
                    compiled.points,
                    matcher.describe()
                );
                tally.record(index, &compiled.name, compiled.points);
            }
        }
    }
}
