//! 逐条翻译适配器
//!
//! 免鉴权的逐条后端：每个片段发起一次GET。响应是嵌套JSON数组，
//! 首元素是 `[译文块, ...]` 元组列表，译文为各元组首元素的拼接。
//! 任何错误（网络、解析、空结果）都折算为空串，从不产生批次级失败。

use futures::future::BoxFuture;
use reqwest::Client;
use serde_json::Value;

use crate::error::{TranslateError, TranslateResult};
use crate::providers::{simple_lang, SimpleTranslate};

/// 逐条提供方客户端
pub struct SimpleProvider {
    http: Client,
    endpoint: String,
}

impl SimpleProvider {
    pub fn new(http: Client, endpoint: impl Into<String>) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
        }
    }

    async fn request(
        &self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> TranslateResult<String> {
        let response = self
            .http
            .get(&self.endpoint)
            .query(&[
                ("client", "gtx"),
                ("sl", simple_lang(source_lang)),
                ("tl", simple_lang(target_lang)),
                ("dt", "t"),
                ("q", text),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(TranslateError::Provider(format!(
                "逐条翻译返回非成功状态: {}",
                response.status()
            )));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| TranslateError::Parse(format!("逐条翻译响应解析失败: {}", e)))?;

        extract_translation(&payload)
            .ok_or_else(|| TranslateError::Parse("逐条翻译响应中没有译文".to_string()))
    }
}

impl SimpleTranslate for SimpleProvider {
    fn translate_one<'a>(
        &'a self,
        text: &'a str,
        source_lang: &'a str,
        target_lang: &'a str,
    ) -> BoxFuture<'a, String> {
        Box::pin(async move {
            match self.request(text, source_lang, target_lang).await {
                Ok(translated) => translated,
                Err(e) => {
                    tracing::debug!("逐条翻译失败，折算为空译文: {}", e);
                    String::new()
                }
            }
        })
    }
}

/// 从嵌套数组响应中提取译文
///
/// 结构为 `[[["译文块", "原文块", ...], ...], ...]`，
/// 取首元素数组中每个元组的首元素拼接。
fn extract_translation(payload: &Value) -> Option<String> {
    let chunks = payload.get(0)?.as_array()?;
    let mut out = String::new();
    for chunk in chunks {
        if let Some(part) = chunk.get(0).and_then(Value::as_str) {
            out.push_str(part);
        }
    }
    if out.is_empty() {
        None
    } else {
        Some(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_single_chunk() {
        let payload = json!([[["你好", "Hello", null]], null, "en"]);
        assert_eq!(extract_translation(&payload), Some("你好".to_string()));
    }

    #[test]
    fn test_extract_concatenates_chunks() {
        let payload = json!([
            [["第一句。", "First sentence.", null], ["第二句。", "Second sentence.", null]],
            null,
            "en"
        ]);
        assert_eq!(
            extract_translation(&payload),
            Some("第一句。第二句。".to_string())
        );
    }

    #[test]
    fn test_extract_rejects_unexpected_shapes() {
        assert_eq!(extract_translation(&json!({})), None);
        assert_eq!(extract_translation(&json!([])), None);
        assert_eq!(extract_translation(&json!([null])), None);
        assert_eq!(extract_translation(&json!([[]])), None);
        assert_eq!(extract_translation(&json!([[["", "Hello", null]]])), None);
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_yields_empty_string() {
        let provider = SimpleProvider::new(Client::new(), "http://127.0.0.1:1/translate");
        let out = provider.translate_one("Hello", "en", "zh").await;
        assert_eq!(out, "");
    }
}
