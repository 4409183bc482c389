//! 拉取重试工具
//! 仅对可重试错误（超时、连接、5xx、429）重试，其余错误立即返回

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::config::RetryPolicy;
use crate::error::FetchError;

/// 通用异步重试逻辑
/// - policy: 重试策略（不含第一次请求）
/// - backoff: 两次尝试之间的固定间隔
/// - func: 每次调用返回一次新的请求 Future
pub async fn retry_fetch<F, Fut, T>(
    policy: RetryPolicy,
    backoff: Duration,
    url: &str,
    mut func: F,
) -> Result<T, FetchError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, FetchError>>,
{
    let max_retries = policy.max_retries();
    let mut attempt = 0;

    loop {
        match func().await {
            Ok(res) => return Ok(res),
            Err(e) if e.is_retriable() && attempt < max_retries => {
                attempt += 1;
                warn!(
                    "请求失败，准备重试（{}/{}）：URL={}，错误={}",
                    attempt, max_retries, url, e
                );
                if !backoff.is_zero() {
                    tokio::time::sleep(backoff).await;
                }
            }
            Err(e) => return Err(e),
        }
    }
}
