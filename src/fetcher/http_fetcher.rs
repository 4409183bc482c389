//! 基于 reqwest 的页面拉取器
use async_trait::async_trait;
use reqwest::{redirect, Client, Response};
use tracing::debug;

use super::retry::retry_fetch;
use super::PageFetcher;
use crate::config::ScanConfig;
use crate::error::{FetchError, SigResult, SignalError};
use crate::extractor::MarkupGuard;
use crate::utils::normalize_url;

/// HTTP页面拉取器（内部 Client 可安全跨任务共享）
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    config: ScanConfig,
}

impl HttpFetcher {
    /// 按扫描配置构建拉取器
    pub fn new(config: &ScanConfig) -> SigResult<Self> {
        let redirect_policy = if config.max_redirects == 0 {
            redirect::Policy::none()
        } else {
            redirect::Policy::limited(config.max_redirects)
        };

        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .redirect(redirect_policy)
            .gzip(true)
            .build()
            .map_err(|e| SignalError::HttpClientError(e.to_string()))?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// 单次请求（不含重试）
    async fn fetch_once(&self, url: &str) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "text/html,application/xhtml+xml,*/*;q=0.8")
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(&e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = Self::read_body_capped(response, MarkupGuard::MAX_MARKUP_LEN).await?;
        debug!("页面拉取成功：URL={}，状态码={}，长度={}", url, status.as_u16(), body.len());
        Ok(body)
    }

    /// 分块读取响应体，超过上限后停止读取
    async fn read_body_capped(mut response: Response, limit: usize) -> Result<String, FetchError> {
        let mut buf: Vec<u8> = Vec::new();
        while let Some(chunk) = response.chunk().await.map_err(|e| FetchError::from_reqwest(&e))? {
            let remaining = limit - buf.len();
            if chunk.len() >= remaining {
                buf.extend_from_slice(&chunk[..remaining]);
                debug!("响应体超过上限，已截断：{} 字节", limit);
                break;
            }
            buf.extend_from_slice(&chunk);
        }
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let target = normalize_url(url)?;
        retry_fetch(self.config.retry, self.config.retry_backoff, &target, || {
            self.fetch_once(&target)
        })
        .await
    }
}
