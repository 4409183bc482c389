//! 检测器核心：整合证据提取与签名分析，输出扫描结果
use std::sync::Arc;

use tracing::debug;

use super::analyzer::EvidenceAnalyzer;
use crate::config::MatchMode;
use crate::error::FetchError;
use crate::extractor::{HtmlExtractor, MarkupGuard};
use crate::rule::{ScanResult, SignalScore, SignatureRegistry};
use crate::utils::SignalTally;

/// 信号匹配器（只读，可跨任务共享）
#[derive(Debug, Clone)]
pub struct SignalMatcher {
    registry: Arc<SignatureRegistry>,
    mode: MatchMode,
}

impl Default for SignalMatcher {
    fn default() -> Self {
        Self::new(SignatureRegistry::builtin(), MatchMode::TagScoped)
    }
}

impl SignalMatcher {
    /// 创建匹配器
    pub fn new(registry: Arc<SignatureRegistry>, mode: MatchMode) -> Self {
        Self { registry, mode }
    }

    pub fn registry(&self) -> &SignatureRegistry {
        &self.registry
    }

    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    /// 核心计分接口（纯函数，不会失败）
    pub fn score(&self, markup: &str) -> SignalScore {
        let markup = MarkupGuard::guard(markup);
        if markup.trim().is_empty() {
            return SignalScore::default();
        }

        let compiled_lib = self.registry.compiled();
        let mut tally = SignalTally::new();

        match self.mode {
            MatchMode::FullText => {
                EvidenceAnalyzer::analyze(compiled_lib, markup, &mut tally);
            }
            MatchMode::TagScoped => {
                let evidence = HtmlExtractor::new().extract(markup);
                if evidence.has_markup() {
                    debug!(
                        "标签证据提取完成：script={}，link={}，片段数={}",
                        evidence.script_count,
                        evidence.link_count,
                        evidence.segments.len()
                    );
                    EvidenceAnalyzer::analyze(compiled_lib, &evidence.text(), &mut tally);
                } else {
                    // 未识别到HTML元素时按平铺文本匹配
                    debug!("输入不含HTML元素，按平铺文本匹配");
                    EvidenceAnalyzer::analyze(compiled_lib, markup, &mut tally);
                }
            }
        }

        tally.finish()
    }

    /// 扫描接口（URL + 已获取的标记）
    pub fn scan(&self, url: &str, markup: &str) -> ScanResult {
        ScanResult::success(url, self.score(markup))
    }

    /// 扫描接口（拉取结果），拉取失败记录为错误结果
    pub fn scan_fetched(&self, url: &str, fetched: Result<String, FetchError>) -> ScanResult {
        match fetched {
            Ok(markup) => self.scan(url, &markup),
            Err(e) => ScanResult::failure(url, e.to_string()),
        }
    }
}
