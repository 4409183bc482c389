//! 规则编译器核心
//! 仅负责将签名规则编译为可执行的匹配器

use std::time::Instant;
use regex::RegexBuilder;
use tracing::debug;

use super::pattern::{CompiledRuleLibrary, CompiledSignature, Matcher};
use crate::error::{SigResult, SignalError};
use crate::rule::{Signature, SignatureRule};

/// 单条正则的编译体积上限
const REGEX_SIZE_LIMIT: usize = 1 << 20;

/// 规则编译器
pub struct RuleCompiler;

impl RuleCompiler {
    /// 编译签名列表（保持输入顺序）
    pub fn compile(signatures: &[Signature]) -> SigResult<CompiledRuleLibrary> {
        let start = Instant::now();
        let mut stats = CompileStats::default();
        let mut compiled = Vec::with_capacity(signatures.len());

        for signature in signatures {
            compiled.push(Self::compile_signature(signature, &mut stats)?);
        }

        debug!("✅ 签名编译完成，总耗时{:?}", start.elapsed());
        debug!(
            "📊 编译统计：签名{}条、正则{}条、关键字{}条",
            compiled.len(),
            stats.regex_count,
            stats.keyword_count
        );

        Ok(CompiledRuleLibrary { signatures: compiled })
    }

    /// 编译单个签名
    pub fn compile_signature(signature: &Signature, stats: &mut CompileStats) -> SigResult<CompiledSignature> {
        let matchers = match &signature.rule {
            SignatureRule::Regex(pattern) => {
                if pattern.trim().is_empty() {
                    return Err(SignalError::InvalidSignature(format!("{}：正则为空", signature.name)));
                }
                stats.regex_count += 1;
                vec![Self::compile_regex(pattern)?]
            }
            SignatureRule::Keywords(keywords) => {
                if keywords.is_empty() {
                    return Err(SignalError::InvalidSignature(format!("{}：关键字列表为空", signature.name)));
                }
                let mut matchers = Vec::with_capacity(keywords.len());
                for keyword in keywords {
                    let keyword = keyword.trim();
                    if keyword.is_empty() {
                        return Err(SignalError::InvalidSignature(format!("{}：存在空关键字", signature.name)));
                    }
                    stats.keyword_count += 1;
                    matchers.push(Matcher::Contains(keyword.to_ascii_lowercase()));
                }
                matchers
            }
        };

        Ok(CompiledSignature {
            name: signature.name.clone(),
            points: signature.points,
            category: signature.category,
            matchers,
        })
    }

    /// 编译忽略大小写的正则
    fn compile_regex(pattern: &str) -> SigResult<Matcher> {
        let regex = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .size_limit(REGEX_SIZE_LIMIT)
            .build()?;
        Ok(Matcher::Regex(regex))
    }
}

/// 编译统计信息
#[derive(Debug, Clone, Default)]
pub struct CompileStats {
    regex_count: usize,
    keyword_count: usize,
}
