//! HTML标签证据提取器
//! 负责从HTML中提取 script/link 标签的属性值与内联脚本内容
//! 页面正文文本不会进入证据

use std::cell::{Cell, RefCell};
use html5ever::tokenizer::{
    BufferQueue, Tag, TagKind, Token, TokenSink, TokenSinkResult, Tokenizer, TokenizerOpts
};
use html5ever::tokenizer::states::RawKind;
use markup5ever::interface::Attribute;
use tendril::StrTendril;

/// 提取结果
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TagEvidence {
    /// 证据片段（属性 name="value" 或内联脚本正文）
    pub segments: Vec<String>,
    /// 已识别的HTML元素标签数（含起止标签与DOCTYPE）
    pub element_count: usize,
    pub script_count: usize,
    pub link_count: usize,
}

impl TagEvidence {
    /// 拼接后的证据文本
    pub fn text(&self) -> String {
        self.segments.join("\n")
    }

    /// 输入是否为HTML（压缩JS中的 `i<n.length>` 之类不算）
    pub fn has_markup(&self) -> bool {
        self.element_count > 0
    }
}

/// 用于判定输入为HTML的常见元素
const KNOWN_ELEMENTS: &[&str] = &[
    "html", "head", "body", "title", "meta", "link", "script", "style", "noscript", "base",
    "div", "span", "p", "a", "img", "br", "hr", "ul", "ol", "li", "table", "tr", "td", "th",
    "form", "input", "button", "select", "option", "textarea", "label", "iframe", "svg",
    "header", "footer", "nav", "main", "section", "article", "aside", "template",
    "h1", "h2", "h3", "h4", "h5", "h6", "pre", "code", "em", "strong", "b", "i", "small",
];

/// 内容按原始文本处理的元素
fn raw_kind(name: &str) -> Option<RawKind> {
    match name {
        "script" => Some(RawKind::ScriptData),
        "title" | "textarea" => Some(RawKind::Rcdata),
        "style" | "xmp" | "iframe" | "noembed" | "noframes" => Some(RawKind::Rawtext),
        _ => None,
    }
}

/// 分词器回调
#[derive(Debug, Default)]
struct EvidenceSink {
    segments: RefCell<Vec<String>>,
    script_body: RefCell<String>,
    in_script: Cell<bool>,
    element_count: Cell<usize>,
    script_count: Cell<usize>,
    link_count: Cell<usize>,
}

impl TokenSink for EvidenceSink {
    type Handle = ();

    fn process_token(&self, token: Token, _line: u64) -> TokenSinkResult<()> {
        match token {
            Token::TagToken(Tag { kind: TagKind::StartTag, name, attrs, .. }) => {
                let name: &str = name.as_ref();
                self.count_element(name);
                match name {
                    "script" => {
                        self.script_count.set(self.script_count.get() + 1);
                        self.push_attributes(&attrs);
                        self.in_script.set(true);
                    }
                    "link" => {
                        self.link_count.set(self.link_count.get() + 1);
                        self.push_attributes(&attrs);
                    }
                    _ => {}
                }
                // 脚本正文、title/textarea 与 style 等内容按原始文本处理，内部的 "<" 不会产生标签
                if let Some(kind) = raw_kind(name) {
                    return TokenSinkResult::RawData(kind);
                }
            }
            Token::TagToken(Tag { kind: TagKind::EndTag, name, .. }) => {
                let name: &str = name.as_ref();
                self.count_element(name);
                if name == "script" {
                    self.flush_script();
                }
            }
            Token::DoctypeToken(_) => self.element_count.set(self.element_count.get() + 1),
            Token::CharacterTokens(text) => {
                if self.in_script.get() {
                    self.script_body.borrow_mut().push_str(&text);
                }
            }
            Token::EOFToken => self.flush_script(),
            _ => {}
        }
        TokenSinkResult::Continue
    }
}

impl EvidenceSink {
    fn count_element(&self, name: &str) {
        if KNOWN_ELEMENTS.contains(&name) {
            self.element_count.set(self.element_count.get() + 1);
        }
    }

    fn push_attributes(&self, attrs: &[Attribute]) {
        let mut segments = self.segments.borrow_mut();
        for attr in attrs {
            if attr.value.is_empty() {
                continue;
            }
            segments.push(format!("{}=\"{}\"", attr.name.local.as_ref(), &*attr.value));
        }
    }

    fn flush_script(&self) {
        if !self.in_script.replace(false) {
            return;
        }
        let body = std::mem::take(&mut *self.script_body.borrow_mut());
        if !body.trim().is_empty() {
            self.segments.borrow_mut().push(body);
        }
    }

    fn into_evidence(self) -> TagEvidence {
        TagEvidence {
            segments: self.segments.into_inner(),
            element_count: self.element_count.get(),
            script_count: self.script_count.get(),
            link_count: self.link_count.get(),
        }
    }
}

/// HTML标签证据提取器
#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlExtractor;

impl HtmlExtractor {
    /// 创建新的提取器
    pub fn new() -> Self {
        Self
    }

    /// 从HTML字符串提取标签证据（畸形HTML不会报错）
    pub fn extract(&self, html: &str) -> TagEvidence {
        let tokenizer = Tokenizer::new(EvidenceSink::default(), TokenizerOpts::default());
        let queue = BufferQueue::default();
        queue.push_back(StrTendril::from(html));

        let _ = tokenizer.feed(&queue);
        tokenizer.end();

        tokenizer.sink.into_evidence()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_extractor() {
        let html = r#"
            <html><head>
            <script src="https://cdn.myshopify.com/s/files/1/test.js"></script>
            <link rel="stylesheet" href="/assets/theme.css">
            <script>fbq('init', '123');</script>
            </head>
            <body><h1>How to run TikTok Ads</h1></body></html>
        "#;

        let evidence = HtmlExtractor::new().extract(html);

        assert_eq!(evidence.script_count, 2);
        assert_eq!(evidence.link_count, 1);
        assert!(evidence.has_markup());
        assert_eq!(
            evidence.segments,
            vec![
                r#"src="https://cdn.myshopify.com/s/files/1/test.js""#.to_string(),
                r#"rel="stylesheet""#.to_string(),
                r#"href="/assets/theme.css""#.to_string(),
                "fbq('init', '123');".to_string(),
            ]
        );
        assert!(!evidence.text().contains("TikTok"));
    }

    #[test]
    fn test_script_body_with_angle_brackets() {
        // 测试场景：内联脚本中包含 "<" 与类标签字符串，不应截断或产生新标签
        let html = r#"<script>if (a < b) { document.write("<p>tiktok-pixel</p>"); }</script><p>after</p>"#;
        let evidence = HtmlExtractor::new().extract(html);
        assert_eq!(evidence.segments.len(), 1);
        assert!(evidence.segments[0].contains("tiktok-pixel"));
        assert!(!evidence.text().contains("after"));
    }

    #[test]
    fn test_unclosed_script_is_flushed() {
        let html = r#"<SCRIPT SRC="/react.js"></SCRIPT><script>gtag('config')"#;
        let evidence = HtmlExtractor::new().extract(html);
        assert_eq!(
            evidence.segments,
            vec![r#"src="/react.js""#.to_string(), "gtag('config')".to_string()]
        );
    }

    #[test]
    fn test_rcdata_and_rawtext_content_is_not_evidence() {
        // 测试场景：教程页把像素代码放在 textarea / title / style 中
        let html = r#"<html><head><title>Why <script src=tiktok-pixel> is slow</title>
            <style>/* <link href="https://cdn.shopify.com/x.css"> */</style></head>
            <body><textarea readonly><script src="https://analytics.tiktok.com/i18n/pixel/events.js"></script></textarea>
            <noembed><script>fbq('init')</script></noembed>
            <script src="/app.js"></script></body></html>"#;
        let evidence = HtmlExtractor::new().extract(html);
        assert_eq!(evidence.script_count, 1);
        assert_eq!(evidence.link_count, 0);
        assert_eq!(evidence.segments, vec![r#"src="/app.js""#.to_string()]);
    }

    #[test]
    fn test_minified_js_is_not_markup() {
        let js = "for(var i=0;i<n.length;i++){x=i>2};fbq('init','1');";
        let evidence = HtmlExtractor::new().extract(js);
        assert!(!evidence.has_markup());
        assert!(evidence.segments.is_empty());
    }

    #[test]
    fn test_doctype_counts_as_markup() {
        assert!(HtmlExtractor::new().extract("<!DOCTYPE html>").has_markup());
    }

    #[test]
    fn test_plain_text_has_no_markup() {
        let evidence = HtmlExtractor::new().extract("Error: connection refused");
        assert!(!evidence.has_markup());
        assert!(evidence.segments.is_empty());
    }
}
