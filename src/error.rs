//! 全局错误类型定义

use thiserror::Error;
use regex::Error as RegexError;
use serde_json::Error as SerdeJsonError;
use std::error::Error as StdError;
use std::io::Error as IoError;

/// 页面拉取错误（单个URL级别，批量扫描时降级为错误记录）
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("无效URL：{0}")]
    InvalidUrl(String),
    #[error("请求超时：{0}")]
    Timeout(String),
    #[error("DNS解析失败：{0}")]
    Dns(String),
    #[error("连接失败：{0}")]
    Connect(String),
    #[error("HTTP状态码异常：{0}")]
    Status(u16),
    #[error("读取响应体失败：{0}")]
    Body(String),
    #[error("网络请求失败：{0}")]
    Request(String),
}

impl FetchError {
    /// 是否值得重试（超时、连接、DNS、5xx、429）
    pub fn is_retriable(&self) -> bool {
        match self {
            FetchError::Timeout(_) | FetchError::Dns(_) | FetchError::Connect(_) => true,
            FetchError::Status(code) => *code == 429 || (500..600).contains(code),
            FetchError::InvalidUrl(_) | FetchError::Body(_) | FetchError::Request(_) => false,
        }
    }

    /// 将reqwest错误归类
    pub fn from_reqwest(err: &reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return FetchError::Status(status.as_u16());
        }
        if err.is_timeout() {
            return FetchError::Timeout(err.to_string());
        }
        if err.is_connect() {
            // reqwest不单独暴露DNS错误，沿错误链查找解析失败的描述
            let mut source = StdError::source(err);
            while let Some(cause) = source {
                let text = cause.to_string().to_ascii_lowercase();
                if text.contains("dns") || text.contains("lookup") || text.contains("resolve") {
                    return FetchError::Dns(cause.to_string());
                }
                source = StdError::source(cause);
            }
            return FetchError::Connect(err.to_string());
        }
        if err.is_body() || err.is_decode() {
            return FetchError::Body(err.to_string());
        }
        FetchError::Request(err.to_string())
    }
}

#[derive(Error, Debug)]
pub enum SignalError {
    // 规则相关错误
    #[error("签名定义无效：{0}")]
    InvalidSignature(String),
    #[error("规则加载失败：{0}")]
    RuleLoadError(String),

    // 编译相关错误
    #[error("正则编译失败：{0}")]
    RegexCompileError(#[from] RegexError),

    // 网络相关错误
    #[error("页面拉取失败：{0}")]
    Fetch(#[from] FetchError),
    #[error("HTTP客户端初始化失败：{0}")]
    HttpClientError(String),

    // 序列化/导出错误
    #[error("JSON解析失败：{0}")]
    JsonError(#[from] SerdeJsonError),
    #[error("CSV写入失败：{0}")]
    CsvError(#[from] csv::Error),

    // 基础错误
    #[error("IO操作失败：{0}")]
    IoError(#[from] IoError),
    #[error("无效输入：{0}")]
    InvalidInput(String),
    #[error("异步任务执行失败：{0}")]
    AsyncTaskError(String),
}

// 全局Result类型
pub type SigResult<T> = Result<T, SignalError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retriable_classification() {
        assert!(FetchError::Timeout("10s".into()).is_retriable());
        assert!(FetchError::Dns("no such host".into()).is_retriable());
        assert!(FetchError::Status(503).is_retriable());
        assert!(FetchError::Status(429).is_retriable());
        assert!(!FetchError::Status(404).is_retriable());
        assert!(!FetchError::InvalidUrl("::".into()).is_retriable());
    }

    #[test]
    fn test_fetch_error_converts_into_signal_error() {
        let err: SignalError = FetchError::Status(500).into();
        assert!(matches!(err, SignalError::Fetch(FetchError::Status(500))));
        assert!(err.to_string().contains("500"));
    }
}
