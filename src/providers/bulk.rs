//! 批量翻译适配器
//!
//! 带鉴权的批量后端：一次POST携带整个工作列表，响应数组与请求数组
//! 按位置严格对应。单条缺失或畸形只让该片段从返回映射中缺席
//! （部分成功），整体失败（令牌、网络、状态码、非数组响应体）
//! 才向上抛错触发降级。

use std::collections::HashMap;
use std::sync::Arc;

use futures::future::BoxFuture;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::constants;
use crate::error::{TranslateError, TranslateResult};
use crate::providers::{bulk_lang, BulkTranslate, TokenManager};
use crate::types::Fragment;

/// 出站请求体元素：`[{ "Text": "..." }, ...]`，按请求顺序排列
#[derive(Debug, Serialize)]
struct OutboundItem<'a> {
    #[serde(rename = "Text")]
    text: &'a str,
}

/// 响应数组元素：取 `translations` 数组首个元素的 `text` 字段
#[derive(Debug, Deserialize)]
struct InboundItem {
    #[serde(default)]
    translations: Vec<InboundTranslation>,
}

#[derive(Debug, Deserialize)]
struct InboundTranslation {
    text: String,
}

/// 批量提供方客户端
pub struct BulkProvider {
    http: Client,
    endpoint: String,
    tokens: Arc<TokenManager>,
}

impl BulkProvider {
    pub fn new(http: Client, endpoint: impl Into<String>, tokens: Arc<TokenManager>) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
            tokens,
        }
    }

    async fn request(
        &self,
        items: &[Fragment],
        source_lang: &str,
        target_lang: &str,
    ) -> TranslateResult<HashMap<String, String>> {
        let token = self.tokens.bearer().await?;

        let body: Vec<OutboundItem> = items
            .iter()
            .map(|item| OutboundItem { text: &item.text })
            .collect();

        let response = self
            .http
            .post(&self.endpoint)
            .query(&[
                ("api-version", constants::BULK_API_VERSION),
                ("from", bulk_lang(source_lang)),
                ("to", bulk_lang(target_lang)),
                ("includeSentenceLength", "true"),
            ])
            .bearer_auth(&token)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(TranslateError::Provider(format!(
                "批量翻译返回非成功状态: {}",
                response.status()
            )));
        }

        // 响应体必须是数组，否则视为整体失败
        let entries: Vec<Value> = response
            .json()
            .await
            .map_err(|e| TranslateError::Parse(format!("批量翻译响应不是数组: {}", e)))?;

        Ok(map_positional(items, entries))
    }
}

impl BulkTranslate for BulkProvider {
    fn translate_many<'a>(
        &'a self,
        items: &'a [Fragment],
        source_lang: &'a str,
        target_lang: &'a str,
    ) -> BoxFuture<'a, TranslateResult<HashMap<String, String>>> {
        Box::pin(async move {
            let mapping = self.request(items, source_lang, target_lang).await?;
            tracing::debug!(
                "批量翻译完成: 请求 {} 条，返回 {} 条",
                items.len(),
                mapping.len()
            );
            Ok(mapping)
        })
    }
}

/// 按位置对应关系把响应数组映射回片段id
///
/// `entries[i]` 对应 `items[i]`。单条为null、畸形或缺少 `translations`
/// 时，该片段从映射中省略；响应比请求长的多余部分忽略。
fn map_positional(items: &[Fragment], entries: Vec<Value>) -> HashMap<String, String> {
    let mut out = HashMap::with_capacity(items.len());
    for (item, entry) in items.iter().zip(entries) {
        if let Ok(parsed) = serde_json::from_value::<InboundItem>(entry) {
            if let Some(first) = parsed.translations.into_iter().next() {
                out.insert(item.id.clone(), first.text);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fragments() -> Vec<Fragment> {
        vec![
            Fragment::new("a", "Hello"),
            Fragment::new("b", "World"),
            Fragment::new("c", "Rust"),
        ]
    }

    fn entry(text: &str) -> Value {
        json!({ "translations": [{ "text": text }] })
    }

    #[test]
    fn test_positional_mapping() {
        let out = map_positional(
            &fragments(),
            vec![entry("你好"), entry("世界"), entry("铁锈")],
        );

        assert_eq!(out.get("a"), Some(&"你好".to_string()));
        assert_eq!(out.get("b"), Some(&"世界".to_string()));
        assert_eq!(out.get("c"), Some(&"铁锈".to_string()));
    }

    #[test]
    fn test_reordered_response_reorders_mapping() {
        // 响应数组换序后，映射必须跟着换序：对应关系只看位置
        let out = map_positional(
            &fragments(),
            vec![entry("世界"), entry("你好"), entry("铁锈")],
        );

        assert_eq!(out.get("a"), Some(&"世界".to_string()));
        assert_eq!(out.get("b"), Some(&"你好".to_string()));
    }

    #[test]
    fn test_malformed_entries_are_omitted() {
        let out = map_positional(
            &fragments(),
            vec![entry("你好"), Value::Null, json!({ "translations": [] })],
        );

        assert_eq!(out.len(), 1);
        assert_eq!(out.get("a"), Some(&"你好".to_string()));
        assert!(!out.contains_key("b"));
        assert!(!out.contains_key("c"));
    }

    #[test]
    fn test_short_response_omits_tail() {
        let out = map_positional(&fragments(), vec![entry("你好")]);
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn test_outbound_body_shape() {
        let body = vec![OutboundItem { text: "Hello" }];
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json, json!([{ "Text": "Hello" }]));
    }
}
