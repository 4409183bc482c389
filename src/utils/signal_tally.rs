//! 信号计分工具
//! 负责记录命中的签名并累加分值（同一签名只计一次）

use crate::rule::SignalScore;

/// 命中计分器
#[derive(Debug, Default)]
pub struct SignalTally {
    // (注册表下标, 名称, 分值)
    hits: Vec<(usize, String, u32)>,
}

impl SignalTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录一次命中，重复命中同一签名时返回 false
    pub fn record(&mut self, index: usize, name: &str, points: u32) -> bool {
        if self.contains(index) {
            return false;
        }
        self.hits.push((index, name.to_string(), points));
        true
    }

    pub fn contains(&self, index: usize) -> bool {
        self.hits.iter().any(|(i, _, _)| *i == index)
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    /// 生成得分（按注册表顺序输出名称）
    pub fn finish(mut self) -> SignalScore {
        self.hits.sort_by_key(|(index, _, _)| *index);
        let raw_score = self
            .hits
            .iter()
            .fold(0u32, |acc, (_, _, points)| acc.saturating_add(*points));
        let detected = self.hits.into_iter().map(|(_, name, _)| name).collect();
        SignalScore::new(detected, raw_score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tally_counts_once_in_registry_order() {
        let mut tally = SignalTally::new();
        assert!(tally.record(3, "Shopify", 20));
        assert!(tally.record(1, "Meta Ads", 10));
        assert!(!tally.record(3, "Shopify", 20));

        let score = tally.finish();
        assert_eq!(score.detected, vec!["Meta Ads", "Shopify"]);
        assert_eq!(score.raw_score, 30);
        assert_eq!(score.normalized_score, 30);
    }

    #[test]
    fn test_tally_saturates() {
        let mut tally = SignalTally::new();
        tally.record(0, "A", u32::MAX);
        tally.record(1, "B", 5);
        let score = tally.finish();
        assert_eq!(score.raw_score, u32::MAX);
        assert_eq!(score.normalized_score, 100);
    }

    #[test]
    fn test_empty_tally() {
        let score = SignalTally::new().finish();
        assert!(score.detected.is_empty());
        assert_eq!(score.raw_score, 0);
    }
}
