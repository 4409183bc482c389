//! 检测结果模型

use serde::{Deserialize, Serialize};

/// 归一化分数上限
pub const MAX_SCORE: u32 = 100;

/// 单次匹配得分（纯匹配结果，不含URL）
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SignalScore {
    /// 命中的技术名称（注册表顺序，无重复）
    pub detected: Vec<String>,
    pub raw_score: u32,
    pub normalized_score: u32,
}

impl SignalScore {
    /// 按原始分计算归一化分数
    pub fn new(detected: Vec<String>, raw_score: u32) -> Self {
        Self {
            detected,
            raw_score,
            normalized_score: raw_score.min(MAX_SCORE),
        }
    }
}

/// 扫描状态
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "message", rename_all = "lowercase")]
pub enum ScanStatus {
    Success,
    Error(String),
}

/// 单个URL的扫描结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanResult {
    pub url: String,
    pub detected: Vec<String>,
    pub raw_score: u32,
    pub normalized_score: u32,
    #[serde(flatten)]
    pub status: ScanStatus,
}

impl ScanResult {
    /// 成功结果
    pub fn success(url: impl Into<String>, score: SignalScore) -> Self {
        Self {
            url: url.into(),
            detected: score.detected,
            raw_score: score.raw_score,
            normalized_score: score.normalized_score,
            status: ScanStatus::Success,
        }
    }

    /// 失败结果（拉取失败，分数为0）
    pub fn failure(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            detected: Vec::new(),
            raw_score: 0,
            normalized_score: 0,
            status: ScanStatus::Error(message.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.status, ScanStatus::Success)
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.status {
            ScanStatus::Error(msg) => Some(msg),
            ScanStatus::Success => None,
        }
    }

    /// 技术栈展示字符串，如 "Meta Ads, Shopify"
    pub fn tech_stack(&self) -> String {
        self.detected.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized_score_is_capped() {
        let score = SignalScore::new(vec!["A".into()], 135);
        assert_eq!(score.raw_score, 135);
        assert_eq!(score.normalized_score, MAX_SCORE);

        let score = SignalScore::new(vec![], 0);
        assert_eq!(score.normalized_score, 0);
    }

    #[test]
    fn test_failure_has_zero_score() {
        let result = ScanResult::failure("https://a.example", "请求超时");
        assert!(!result.is_success());
        assert_eq!(result.error_message(), Some("请求超时"));
        assert_eq!(result.normalized_score, 0);
        assert!(result.detected.is_empty());
    }

    #[test]
    fn test_status_serialization_shape() {
        let ok = ScanResult::success(
            "https://shop.example",
            SignalScore::new(vec!["Meta Ads".into(), "Shopify".into()], 30),
        );
        let json = serde_json::to_value(&ok).unwrap();
        assert_eq!(json["status"], "success");
        assert_eq!(json["normalized_score"], 30);

        let err = ScanResult::failure("https://down.example", "DNS解析失败");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["status"], "error");
        assert_eq!(json["message"], "DNS解析失败");

        let back: ScanResult = serde_json::from_value(json).unwrap();
        assert_eq!(back, err);
    }

    #[test]
    fn test_tech_stack_join() {
        let ok = ScanResult::success(
            "https://shop.example",
            SignalScore::new(vec!["Meta Ads".into(), "Shopify".into()], 30),
        );
        assert_eq!(ok.tech_stack(), "Meta Ads, Shopify");
    }
}
