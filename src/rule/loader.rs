//! 签名表加载器
//! 负责从 JSON 规则表构建注册表，新增签名无需修改匹配逻辑

use std::path::Path;
use tracing::debug;

use super::model::{Signature, SignatureDef};
use super::registry::SignatureRegistry;
use crate::error::{SigResult, SignalError};

/// 签名表加载器
pub struct RuleLoader;

impl RuleLoader {
    /// 从 JSON 字符串加载（顶层为签名数组）
    pub fn from_json_str(json: &str) -> SigResult<SignatureRegistry> {
        let defs: Vec<SignatureDef> = serde_json::from_str(json)?;
        let signatures = defs
            .into_iter()
            .map(Signature::try_from)
            .collect::<SigResult<Vec<_>>>()?;

        debug!("JSON签名表解析成功，签名数：{}", signatures.len());
        SignatureRegistry::builder().signatures(signatures).build()
    }

    /// 从本地 JSON 文件加载
    pub async fn from_json_file(path: impl AsRef<Path>) -> SigResult<SignatureRegistry> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            SignalError::RuleLoadError(format!("读取签名文件失败：{} - {}", path.display(), e))
        })?;
        Self::from_json_str(&content)
    }

    /// 导出注册表为 JSON（与加载格式一致）
    pub fn to_json(registry: &SignatureRegistry) -> SigResult<String> {
        let defs: Vec<SignatureDef> = registry.all_signatures().iter().map(SignatureDef::from).collect();
        Ok(serde_json::to_string_pretty(&defs)?)
    }
}
