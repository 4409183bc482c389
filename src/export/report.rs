//! 终端文本表格
use crate::rule::ScanResult;

/// 渲染扫描结果表格（URL / 分数 / 技术栈 / 状态）
pub fn render_table(results: &[ScanResult]) -> String {
    let url_width = results
        .iter()
        .map(|r| r.url.chars().count())
        .chain(std::iter::once("URL".len()))
        .max()
        .unwrap_or(3);

    let mut out = format!("{:<width$}  {:>5}  {:<8}  {}\n", "URL", "SCORE", "STATUS", "TECH STACK", width = url_width);
    for result in results {
        let (status, detail) = match result.error_message() {
            None => ("ok", result.tech_stack()),
            Some(msg) => ("error", msg.to_string()),
        };
        out.push_str(&format!(
            "{:<width$}  {:>5}  {:<8}  {}\n",
            result.url,
            result.normalized_score,
            status,
            detail,
            width = url_width
        ));
    }
    out
}
