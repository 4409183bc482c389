//! JSON导出
use crate::error::SigResult;
use crate::rule::ScanResult;

/// 格式化输出扫描结果数组
pub fn to_pretty_json(results: &[ScanResult]) -> SigResult<String> {
    Ok(serde_json::to_string_pretty(results)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::SignalScore;

    #[test]
    fn test_json_shape() {
        let results = vec![
            ScanResult::success("https://shop.example", SignalScore::new(vec!["Shopify".to_string()], 20)),
            ScanResult::failure("https://down.example", "连接失败"),
        ];
        let value: serde_json::Value = serde_json::from_str(&to_pretty_json(&results).unwrap()).unwrap();

        assert_eq!(value[0]["status"], "success");
        assert_eq!(value[0]["normalized_score"], 20);
        assert_eq!(value[1]["status"], "error");
        assert_eq!(value[1]["message"], "连接失败");
    }
}
