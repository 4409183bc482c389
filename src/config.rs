//! 全局配置管理，存储所有可配置项
//! 拉取器与批量扫描只从这里读取参数，不存在全局可变状态

use std::time::Duration;

use tokio::sync::Semaphore;

/// 默认浏览器UA（模拟桌面Chrome）
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// 重试策略
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryPolicy {
    Never,     // 不重试
    Times(u8), // 固定次数重试（不含第一次）
}

impl RetryPolicy {
    /// 最大重试次数
    pub fn max_retries(&self) -> usize {
        match self {
            RetryPolicy::Never => 0,
            RetryPolicy::Times(n) => *n as usize,
        }
    }
}

/// 匹配范围
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchMode {
    /// 仅匹配 script/link 标签属性与内联脚本
    #[default]
    TagScoped,
    /// 全文匹配（低置信度，需显式开启）
    FullText,
}

/// 全局扫描配置
#[derive(Debug, Clone)]
pub struct ScanConfig {
    // 单次请求超时
    pub timeout: Duration,
    // 重试策略
    pub retry: RetryPolicy,
    // 请求UA
    pub user_agent: String,
    // 最大重定向次数
    pub max_redirects: usize,
    // 批量扫描并发度
    pub concurrency: usize,
    // 重试间隔
    pub retry_backoff: Duration,
    // 匹配范围
    pub match_mode: MatchMode,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            retry: RetryPolicy::Times(1),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_redirects: 10,
            concurrency: 8,
            retry_backoff: Duration::from_millis(500),
            match_mode: MatchMode::TagScoped,
        }
    }
}

/// 配置管理器
pub struct ConfigManager;

impl ConfigManager {
    /// 获取默认配置
    pub fn get_default() -> ScanConfig {
        ScanConfig::default()
    }

    /// 自定义配置
    pub fn custom() -> CustomConfigBuilder {
        CustomConfigBuilder::new()
    }
}

/// 配置构建器（便于自定义配置）
#[derive(Debug, Clone, Default)]
pub struct CustomConfigBuilder {
    config: ScanConfig,
}

impl CustomConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: ScanConfig::default(),
        }
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    pub fn retry(mut self, retry: RetryPolicy) -> Self {
        self.config.retry = retry;
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    pub fn max_redirects(mut self, max_redirects: usize) -> Self {
        self.config.max_redirects = max_redirects;
        self
    }

    /// 并发度限制在 [1, Semaphore::MAX_PERMITS]
    pub fn concurrency(mut self, concurrency: usize) -> Self {
        self.config.concurrency = concurrency.clamp(1, Semaphore::MAX_PERMITS);
        self
    }

    pub fn retry_backoff(mut self, backoff: Duration) -> Self {
        self.config.retry_backoff = backoff;
        self
    }

    pub fn match_mode(mut self, mode: MatchMode) -> Self {
        self.config.match_mode = mode;
        self
    }

    pub fn build(self) -> ScanConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ConfigManager::get_default();
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.retry.max_retries(), 1);
        assert_eq!(config.match_mode, MatchMode::TagScoped);
        assert!(config.user_agent.starts_with("Mozilla/5.0"));
    }

    #[test]
    fn test_builder_overrides() {
        let config = ConfigManager::custom()
            .timeout(Duration::from_secs(5))
            .retry(RetryPolicy::Never)
            .concurrency(0)
            .user_agent("probe/1.0")
            .match_mode(MatchMode::FullText)
            .build();

        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.retry.max_retries(), 0);
        assert_eq!(config.concurrency, 1);
        assert_eq!(config.user_agent, "probe/1.0");
        assert_eq!(config.match_mode, MatchMode::FullText);
    }

    #[test]
    fn test_concurrency_clamped_to_permit_limit() {
        let config = ConfigManager::custom().concurrency(usize::MAX).build();
        assert_eq!(config.concurrency, Semaphore::MAX_PERMITS);
    }
}
