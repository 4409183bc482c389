/// 标记输入守卫：在进入分词/匹配前保证输入不会拖垮引擎

pub struct MarkupGuard;

impl MarkupGuard {
    /// 最大标记长度（2MB）
    pub const MAX_MARKUP_LEN: usize = 2 * 1024 * 1024;

    /// 超长输入按UTF-8边界截断（零拷贝）
    #[inline]
    pub fn guard(markup: &str) -> &str {
        if markup.len() <= Self::MAX_MARKUP_LEN {
            return markup;
        }
        let mut cut = Self::MAX_MARKUP_LEN;
        while !markup.is_char_boundary(cut) {
            cut -= 1;
        }
        &markup[..cut]
    }
}
