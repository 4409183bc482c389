//! 拉取模块：页面获取协作者
//! 匹配核心不关心页面来源，任何实现 `PageFetcher` 的类型都可以接入批量扫描

pub mod http_fetcher;
pub mod retry;

use async_trait::async_trait;

use crate::error::FetchError;

pub use self::http_fetcher::HttpFetcher;
pub use self::retry::retry_fetch;

/// 页面拉取接口
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// 获取页面标记文本
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}
