//! 批量扫描模块
//! 每个URL一个 tokio 任务，由信号量限制同时进行的拉取数；结果始终按输入顺序返回

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::{watch, Semaphore};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::detector::SignalMatcher;
use crate::error::SignalError;
use crate::fetcher::PageFetcher;
use crate::rule::ScanResult;

/// 批量扫描报告
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    /// 已完成的结果（输入顺序）
    pub results: Vec<ScanResult>,
    /// 输入URL总数
    pub total: usize,
    /// 是否被中止
    pub aborted: bool,
}

/// 中止信号（接收端）
#[derive(Debug, Clone)]
pub struct ScanAbort {
    rx: Option<watch::Receiver<bool>>,
}

/// 中止触发器（发送端）
#[derive(Debug)]
pub struct AbortTrigger {
    tx: watch::Sender<bool>,
}

impl ScanAbort {
    /// 创建一对中止触发器与中止信号
    pub fn new() -> (AbortTrigger, ScanAbort) {
        let (tx, rx) = watch::channel(false);
        (AbortTrigger { tx }, ScanAbort { rx: Some(rx) })
    }

    /// 永不中止
    pub fn never() -> Self {
        Self { rx: None }
    }

    pub fn is_aborted(&self) -> bool {
        self.rx.as_ref().is_some_and(|rx| *rx.borrow())
    }

    /// 等待中止信号；触发器被丢弃时永远挂起
    pub async fn wait(&mut self) {
        let Some(rx) = self.rx.as_mut() else {
            return std::future::pending().await;
        };
        loop {
            if *rx.borrow_and_update() {
                return;
            }
            if rx.changed().await.is_err() {
                return std::future::pending().await;
            }
        }
    }
}

impl AbortTrigger {
    /// 触发中止
    pub fn abort(&self) {
        let _ = self.tx.send(true);
    }
}

/// 批量扫描器
pub struct BatchScanner<F: PageFetcher + 'static> {
    fetcher: Arc<F>,
    matcher: Arc<SignalMatcher>,
    concurrency: usize,
}

impl<F: PageFetcher + 'static> Clone for BatchScanner<F> {
    fn clone(&self) -> Self {
        Self {
            fetcher: Arc::clone(&self.fetcher),
            matcher: Arc::clone(&self.matcher),
            concurrency: self.concurrency,
        }
    }
}

impl<F: PageFetcher + 'static> BatchScanner<F> {
    /// 创建批量扫描器（并发度限制在 [1, Semaphore::MAX_PERMITS]）
    pub fn new(fetcher: Arc<F>, matcher: Arc<SignalMatcher>, concurrency: usize) -> Self {
        Self {
            fetcher,
            matcher,
            concurrency: concurrency.clamp(1, Semaphore::MAX_PERMITS),
        }
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// 批量扫描，结果与输入一一对应
    pub async fn scan_many<S: AsRef<str>>(&self, urls: &[S]) -> Vec<ScanResult> {
        self.scan_many_abortable(urls, ScanAbort::never()).await.results
    }

    /// 可中止的批量扫描
    /// 中止后未完成的任务被取消，已完成的结果按输入顺序保留
    pub async fn scan_many_abortable<S: AsRef<str>>(&self, urls: &[S], mut abort: ScanAbort) -> BatchReport {
        let total = urls.len();
        info!("开始批量扫描：URL数={}，并发度={}", total, self.concurrency);

        let handles = self.spawn_all(urls);
        let mut results = Vec::with_capacity(total);
        let mut pending = handles.into_iter();
        let mut aborted = false;

        for (url, mut handle) in pending.by_ref() {
            let joined = tokio::select! {
                biased;
                joined = &mut handle => Some(joined),
                _ = abort.wait() => None,
            };

            match joined {
                Some(joined) => results.push(Self::join_result(url, joined)),
                None => {
                    aborted = true;
                    // 当前任务可能恰好已完成，先回收
                    if handle.is_finished() {
                        results.push(Self::join_result(url, handle.await));
                    } else {
                        handle.abort();
                    }
                    break;
                }
            }
        }

        if aborted {
            // 保留已完成的结果，取消其余任务
            for (url, handle) in pending {
                if handle.is_finished() {
                    results.push(Self::join_result(url, handle.await));
                } else {
                    handle.abort();
                }
            }
            warn!("批量扫描已中止：完成 {}/{}", results.len(), total);
        } else {
            info!("批量扫描完成：URL数={}", total);
        }

        BatchReport { results, total, aborted }
    }

    fn spawn_all<S: AsRef<str>>(&self, urls: &[S]) -> Vec<(String, JoinHandle<ScanResult>)> {
        let semaphore = Arc::new(Semaphore::new(self.concurrency));

        urls.iter()
            .map(|url| {
                let url = url.as_ref().to_string();
                let fetcher = Arc::clone(&self.fetcher);
                let matcher = Arc::clone(&self.matcher);
                let semaphore = Arc::clone(&semaphore);
                let task_url = url.clone();

                let handle = tokio::spawn(async move {
                    let _permit = match semaphore.acquire_owned().await {
                        Ok(permit) => permit,
                        Err(e) => return ScanResult::failure(task_url, e.to_string()),
                    };
                    let fetched = fetcher.fetch(&task_url).await;
                    if let Err(e) = &fetched {
                        debug!("页面拉取失败：URL={}，错误={}", task_url, e);
                    }
                    matcher.scan_fetched(&task_url, fetched)
                });
                (url, handle)
            })
            .collect()
    }

    fn join_result(url: String, joined: Result<ScanResult, tokio::task::JoinError>) -> ScanResult {
        match joined {
            Ok(result) => result,
            Err(e) => {
                let err = SignalError::AsyncTaskError(e.to_string());
                warn!("扫描任务异常：URL={}，错误={}", url, err);
                ScanResult::failure(url, err.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use crate::error::FetchError;

    /// 记录同时在途请求数的拉取器
    struct CountingFetcher {
        in_flight: AtomicUsize,
        peak: AtomicUsize,
    }

    #[async_trait]
    impl PageFetcher for CountingFetcher {
        async fn fetch(&self, url: &str) -> Result<String, FetchError> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(20)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            Ok(format!(r#"<script src="https://{}/cdn.shopify.com/x.js"></script>"#, url))
        }
    }

    #[tokio::test]
    async fn test_concurrency_is_bounded() {
        let fetcher = Arc::new(CountingFetcher {
            in_flight: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        });
        let scanner = BatchScanner::new(Arc::clone(&fetcher), Arc::new(SignalMatcher::default()), 2);
        let urls: Vec<String> = (0..8).map(|i| format!("site{}.example", i)).collect();

        let results = scanner.scan_many(&urls).await;

        assert_eq!(results.len(), 8);
        assert!(results.iter().all(|r| r.detected == vec!["Shopify"]));
        assert!(fetcher.peak.load(Ordering::SeqCst) <= 2);
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let fetcher = Arc::new(CountingFetcher {
            in_flight: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        });
        let scanner = BatchScanner::new(fetcher, Arc::new(SignalMatcher::default()), 0);
        assert_eq!(scanner.concurrency(), 1);
        let urls: Vec<&str> = Vec::new();
        assert!(scanner.scan_many(&urls).await.is_empty());
    }

    #[tokio::test]
    async fn test_huge_concurrency_is_clamped() {
        let fetcher = Arc::new(CountingFetcher {
            in_flight: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        });
        let scanner = BatchScanner::new(fetcher, Arc::new(SignalMatcher::default()), usize::MAX);
        assert_eq!(scanner.concurrency(), Semaphore::MAX_PERMITS);
        let results = scanner.scan_many(&["a.example", "b.example"]).await;
        assert_eq!(results.len(), 2);
    }

    #[tokio::test]
    async fn test_never_abort_is_not_aborted() {
        assert!(!ScanAbort::never().is_aborted());
        let (trigger, abort) = ScanAbort::new();
        assert!(!abort.is_aborted());
        trigger.abort();
        assert!(abort.is_aborted());
    }
}
