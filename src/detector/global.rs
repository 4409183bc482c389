//! 全局匹配器单例管理
use once_cell::sync::{Lazy, OnceCell};

use super::detector::SignalMatcher;
use crate::error::{SigResult, SignalError};
use crate::rule::{ScanResult, SignalScore};

/// 全局匹配器实例
static GLOBAL_MATCHER: OnceCell<SignalMatcher> = OnceCell::new();

/// 未初始化时使用的默认匹配器
static DEFAULT_MATCHER: Lazy<SignalMatcher> = Lazy::new(SignalMatcher::default);

/// 初始化全局匹配器（只能初始化一次）
pub fn init_global_matcher(matcher: SignalMatcher) -> SigResult<()> {
    GLOBAL_MATCHER
        .set(matcher)
        .map_err(|_| SignalError::InvalidInput("全局匹配器已初始化".to_string()))
}

/// 获取全局匹配器（未初始化时回退到内置签名表）
pub fn global_matcher() -> &'static SignalMatcher {
    GLOBAL_MATCHER.get().unwrap_or(&*DEFAULT_MATCHER)
}

/// 使用全局匹配器扫描
pub fn scan(url: &str, markup: &str) -> ScanResult {
    global_matcher().scan(url, markup)
}

/// 使用全局匹配器计分
pub fn score(markup: &str) -> SignalScore {
    global_matcher().score(markup)
}
