//! 编译后模式模型

use regex::Regex;

use crate::rule::SignalCategory;

#[derive(Debug, Clone)]
pub enum Matcher {
    Contains(String), // 包含匹配（关键字已转ASCII小写）
    Regex(Regex),     // 正则匹配（编译时开启忽略大小写）
}

impl Matcher {
    /// 匹配判断
    /// `lowered` 为证据文本的ASCII小写副本，仅供 Contains 使用
    pub fn is_match(&self, text: &str, lowered: &str) -> bool {
        match self {
            Matcher::Contains(keyword) => lowered.contains(keyword.as_str()),
            Matcher::Regex(regex) => regex.is_match(text),
        }
    }

    /// 规则描述
    pub fn describe(&self) -> &str {
        match self {
            Matcher::Contains(keyword) => keyword,
            Matcher::Regex(r) => r.as_str(),
        }
    }
}

/// 编译后的签名
#[derive(Debug, Clone)]
pub struct CompiledSignature {
    pub name: String,
    pub points: u32,
    pub category: SignalCategory,
    // 同一技术的多个变体，逻辑或
    pub matchers: Vec<Matcher>,
}

impl CompiledSignature {
    /// 返回首个命中的变体
    pub fn first_match(&self, text: &str, lowered: &str) -> Option<&Matcher> {
        self.matchers.iter().find(|m| m.is_match(text, lowered))
    }
}

/// 编译后的签名库（与注册表顺序一致）
#[derive(Debug, Clone, Default)]
pub struct CompiledRuleLibrary {
    pub signatures: Vec<CompiledSignature>,
}

impl CompiledRuleLibrary {
    pub fn len(&self) -> usize {
        self.signatures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signatures.is_empty()
    }
}
