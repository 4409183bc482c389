//! 签名数据模型定义
//! 仅存储签名数据，无任何匹配逻辑，支持序列化/反序列化

use std::fmt;
use serde::{Deserialize, Serialize};

use crate::error::{SigResult, SignalError};

/// 信号分类（仅用于展示，不参与计分）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SignalCategory {
    Advertising,
    Analytics,
    Ecommerce,
    Crm,
    Security,
    WebStack,
    #[default]
    Other,
}

impl fmt::Display for SignalCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SignalCategory::Advertising => "Advertising",
            SignalCategory::Analytics => "Analytics",
            SignalCategory::Ecommerce => "Ecommerce",
            SignalCategory::Crm => "CRM",
            SignalCategory::Security => "Security",
            SignalCategory::WebStack => "Web Stack",
            SignalCategory::Other => "Other",
        };
        f.write_str(label)
    }
}

/// 检测规则：正则 或 字面量关键字列表（任一命中即成立）
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignatureRule {
    Regex(String),
    Keywords(Vec<String>),
}

impl SignatureRule {
    /// 规则描述（日志/列表输出用）
    pub fn describe(&self) -> String {
        match self {
            SignatureRule::Regex(pattern) => format!("regex:{}", pattern),
            SignatureRule::Keywords(keywords) => format!("keywords:{}", keywords.join("|")),
        }
    }
}

/// 技术签名
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub name: String,
    pub rule: SignatureRule,
    pub points: u32,
    pub category: SignalCategory,
}

impl Signature {
    /// 正则签名
    pub fn regex(name: impl Into<String>, pattern: impl Into<String>, points: u32, category: SignalCategory) -> Self {
        Self {
            name: name.into(),
            rule: SignatureRule::Regex(pattern.into()),
            points,
            category,
        }
    }

    /// 关键字签名
    pub fn keywords<I, S>(name: impl Into<String>, keywords: I, points: u32, category: SignalCategory) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            rule: SignatureRule::Keywords(keywords.into_iter().map(Into::into).collect()),
            points,
            category,
        }
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (+{}, {})", self.name, self.points, self.category)
    }
}

/// 签名定义（从 JSON 规则表解析）
/// pattern 与 keywords 必须且只能提供一个
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SignatureDef {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<String>>,
    pub points: u32,
    #[serde(default)]
    pub category: SignalCategory,
}

impl TryFrom<SignatureDef> for Signature {
    type Error = SignalError;

    fn try_from(def: SignatureDef) -> SigResult<Self> {
        let rule = match (def.pattern, def.keywords) {
            (Some(pattern), None) => SignatureRule::Regex(pattern),
            (None, Some(keywords)) => SignatureRule::Keywords(keywords),
            (Some(_), Some(_)) => {
                return Err(SignalError::InvalidSignature(format!(
                    "{}：pattern 与 keywords 不能同时出现",
                    def.name
                )));
            }
            (None, None) => {
                return Err(SignalError::InvalidSignature(format!(
                    "{}：缺少 pattern 或 keywords",
                    def.name
                )));
            }
        };

        Ok(Signature {
            name: def.name,
            rule,
            points: def.points,
            category: def.category,
        })
    }
}

impl From<&Signature> for SignatureDef {
    fn from(sig: &Signature) -> Self {
        let (pattern, keywords) = match &sig.rule {
            SignatureRule::Regex(p) => (Some(p.clone()), None),
            SignatureRule::Keywords(k) => (None, Some(k.clone())),
        };
        Self {
            name: sig.name.clone(),
            pattern,
            keywords,
            points: sig.points,
            category: sig.category,
        }
    }
}
