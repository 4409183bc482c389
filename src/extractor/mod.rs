//! 提取模块：从原始标记中提取匹配所需证据
pub mod html_extractor;
pub mod html_input_guard;

pub use self::html_extractor::{HtmlExtractor, TagEvidence};
pub use self::html_input_guard::MarkupGuard;
