//! 签名注册表
//! 全进程唯一的技术签名来源：构建期只追加，运行期只读

use std::collections::HashSet;
use std::sync::Arc;
use once_cell::sync::Lazy;
use tracing::debug;

use super::model::{SignalCategory, Signature};
use crate::compiler::{CompiledRuleLibrary, RuleCompiler};
use crate::error::{SigResult, SignalError};

/// 内置营销信号签名表（注册表顺序即展示顺序）
pub fn builtin_signatures() -> Vec<Signature> {
    vec![
        Signature::regex(
            "TikTok Ads",
            r"analytics\.tiktok\.com|tiktok-pixel|ttq\.load\(",
            15,
            SignalCategory::Advertising,
        ),
        Signature::regex(
            "Meta Ads",
            r"connect\.facebook\.net|fbevents\.js|fbq\(|facebook\.com/tr[/?]",
            10,
            SignalCategory::Advertising,
        ),
        Signature::regex(
            "Google Analytics",
            r"googletagmanager\.com|google-analytics\.com|gtm\.js|gtag\(|\bua-\d{4,}-\d+",
            5,
            SignalCategory::Analytics,
        ),
        Signature::regex(
            "Shopify",
            r"myshopify\.com|cdn\.shopify\.com|shopify\.cdn|shopify\.checkout",
            20,
            SignalCategory::Ecommerce,
        ),
        Signature::keywords(
            "HubSpot",
            ["hs-scripts.com", "hs-analytics.net", "js.hsforms.net", "hubspot.js"],
            30,
            SignalCategory::Crm,
        ),
        Signature::keywords(
            "Google reCAPTCHA",
            ["google.com/recaptcha", "recaptcha/api.js", "gstatic.com/recaptcha"],
            5,
            SignalCategory::Security,
        ),
    ]
}

/// 前端技术栈签名（每项1分，追加在营销信号之后）
pub fn web_stack_signatures() -> Vec<Signature> {
    let stack = |name: &str, pattern: &str| Signature::regex(name, pattern, 1, SignalCategory::WebStack);
    vec![
        stack("React", r"react(?:-dom)?(?:\.production|\.development)?(?:\.min)?\.js|data-reactroot|__react"),
        stack("Vue.js", r"vue(?:\.global|\.runtime)?(?:\.prod)?(?:\.min)?\.js|__vue__"),
        stack("Angular", r"angular(?:\.min)?\.js|@angular/|ng-version"),
        stack("Next.js", r"/_next/static/|__next_data__"),
        stack("WordPress", r"/wp-content/|/wp-includes/"),
        stack("Bootstrap", r"bootstrap(?:\.bundle)?(?:\.min)?\.(?:js|css)"),
        stack("Tailwind CSS", r"cdn\.tailwindcss\.com|tailwind(?:css)?(?:\.min)?\.(?:js|css)"),
        stack("jQuery", r"code\.jquery\.com|jquery(?:-\d+(?:\.\d+)*)?(?:\.min)?\.js"),
    ]
}

static BUILTIN_REGISTRY: Lazy<Arc<SignatureRegistry>> = Lazy::new(|| {
    let registry = SignatureRegistry::builder()
        .signatures(builtin_signatures())
        .build()
        .unwrap_or_else(|e| panic!("内置签名表无效：{}", e));
    Arc::new(registry)
});

static WEB_STACK_REGISTRY: Lazy<Arc<SignatureRegistry>> = Lazy::new(|| {
    let registry = SignatureRegistry::builder()
        .signatures(builtin_signatures())
        .signatures(web_stack_signatures())
        .build()
        .unwrap_or_else(|e| panic!("内置技术栈签名表无效：{}", e));
    Arc::new(registry)
});

/// 只读签名注册表（原始签名 + 编译结果，顺序一致）
#[derive(Debug, Clone)]
pub struct SignatureRegistry {
    signatures: Vec<Signature>,
    compiled: CompiledRuleLibrary,
}

impl SignatureRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// 内置营销信号注册表（进程级共享）
    pub fn builtin() -> Arc<SignatureRegistry> {
        Arc::clone(&BUILTIN_REGISTRY)
    }

    /// 内置营销信号 + 前端技术栈
    pub fn web_stack() -> Arc<SignatureRegistry> {
        Arc::clone(&WEB_STACK_REGISTRY)
    }

    /// 全部签名（注册表顺序）
    pub fn all_signatures(&self) -> &[Signature] {
        &self.signatures
    }

    pub fn get(&self, name: &str) -> Option<&Signature> {
        self.signatures.iter().find(|s| s.name == name)
    }

    pub fn len(&self) -> usize {
        self.signatures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signatures.is_empty()
    }

    pub(crate) fn compiled(&self) -> &CompiledRuleLibrary {
        &self.compiled
    }
}

/// 注册表构建器（只追加）
#[derive(Debug, Clone, Default)]
pub struct RegistryBuilder {
    signatures: Vec<Signature>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn signature(mut self, signature: Signature) -> Self {
        self.signatures.push(signature);
        self
    }

    pub fn signatures(mut self, signatures: impl IntoIterator<Item = Signature>) -> Self {
        self.signatures.extend(signatures);
        self
    }

    /// 校验并编译，生成只读注册表
    pub fn build(self) -> SigResult<SignatureRegistry> {
        let mut seen = HashSet::with_capacity(self.signatures.len());
        for signature in &self.signatures {
            if signature.name.trim().is_empty() {
                return Err(SignalError::InvalidSignature("签名名称不能为空".to_string()));
            }
            if signature.points == 0 {
                return Err(SignalError::InvalidSignature(format!("{}：分值必须为正整数", signature.name)));
            }
            if !seen.insert(signature.name.as_str()) {
                return Err(SignalError::InvalidSignature(format!("{}：签名名称重复", signature.name)));
            }
        }

        let compiled = RuleCompiler::compile(&self.signatures)?;
        debug!("签名注册表构建完成，签名数：{}", self.signatures.len());

        Ok(SignatureRegistry {
            signatures: self.signatures,
            compiled,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_order_and_points() {
        let registry = SignatureRegistry::builtin();
        let names: Vec<&str> = registry.all_signatures().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["TikTok Ads", "Meta Ads", "Google Analytics", "Shopify", "HubSpot", "Google reCAPTCHA"]
        );
        assert_eq!(registry.get("Shopify").map(|s| s.points), Some(20));
        assert_eq!(registry.get("Meta Ads").map(|s| s.points), Some(10));
        assert_eq!(registry.get("TikTok Ads").map(|s| s.points), Some(15));
        assert_eq!(registry.get("Google Analytics").map(|s| s.points), Some(5));
        assert_eq!(registry.compiled().len(), registry.len());
    }

    #[test]
    fn test_web_stack_extends_builtin() {
        let registry = SignatureRegistry::web_stack();
        assert_eq!(registry.len(), builtin_signatures().len() + web_stack_signatures().len());
        assert_eq!(registry.all_signatures()[0].name, "TikTok Ads");
        assert!(registry.get("jQuery").is_some());
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let result = SignatureRegistry::builder()
            .signature(Signature::keywords("Shopify", ["myshopify.com"], 20, SignalCategory::Ecommerce))
            .signature(Signature::keywords("Shopify", ["shopify"], 20, SignalCategory::Ecommerce))
            .build();
        assert!(matches!(result, Err(SignalError::InvalidSignature(_))));
    }

    #[test]
    fn test_zero_points_rejected() {
        let result = SignatureRegistry::builder()
            .signature(Signature::keywords("Free", ["free.js"], 0, SignalCategory::Other))
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_builtin_is_shared() {
        assert!(Arc::ptr_eq(&SignatureRegistry::builtin(), &SignatureRegistry::builtin()));
    }
}
