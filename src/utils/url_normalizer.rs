//! URL规范化工具
//! 补全缺失的协议前缀，并校验URL能否被请求

use url::Url;

use crate::error::FetchError;

/// 规范化单个URL
/// 未携带 http(s) 协议时补全为 https://，其余协议视为无效输入
pub fn normalize_url(raw: &str) -> Result<String, FetchError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(FetchError::InvalidUrl("URL为空".to_string()));
    }

    let lower = trimmed.to_ascii_lowercase();
    let candidate = if lower.starts_with("http://") || lower.starts_with("https://") {
        trimmed.to_string()
    } else if trimmed.contains("://") {
        return Err(FetchError::InvalidUrl(format!("不支持的协议：{}", trimmed)));
    } else {
        format!("https://{}", trimmed)
    };

    let parsed = Url::parse(&candidate)
        .map_err(|e| FetchError::InvalidUrl(format!("{}：{}", trimmed, e)))?;
    match parsed.host_str() {
        Some(host) if !host.is_empty() => Ok(candidate),
        _ => Err(FetchError::InvalidUrl(format!("缺少主机名：{}", trimmed))),
    }
}

/// 解析URL列表文本（每行一个，忽略空行与 # 注释行）
pub fn parse_url_list(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scheme_added_when_missing() {
        assert_eq!(normalize_url("example.com").unwrap(), "https://example.com");
        assert_eq!(normalize_url("  shop.example.com/path ").unwrap(), "https://shop.example.com/path");
    }

    #[test]
    fn test_existing_scheme_kept() {
        assert_eq!(normalize_url("http://example.com").unwrap(), "http://example.com");
        assert_eq!(normalize_url("HTTPS://Example.com/a").unwrap(), "HTTPS://Example.com/a");
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(matches!(normalize_url(""), Err(FetchError::InvalidUrl(_))));
        assert!(matches!(normalize_url("   "), Err(FetchError::InvalidUrl(_))));
        assert!(matches!(normalize_url("ftp://example.com"), Err(FetchError::InvalidUrl(_))));
        assert!(matches!(normalize_url("https://"), Err(FetchError::InvalidUrl(_))));
        assert!(matches!(normalize_url("exa mple.com"), Err(FetchError::InvalidUrl(_))));
    }

    #[test]
    fn test_parse_url_list() {
        let text = "# 待扫描站点\nexample.com\n\n  shop.example.com  \n#skip.com\n";
        assert_eq!(parse_url_list(text), vec!["example.com", "shop.example.com"]);
    }
}
