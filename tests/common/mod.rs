//! 测试公共设施
//!
//! 提供合成的提供方适配器：可编程的译文词表、失败开关和调用计数，
//! 用于在无网络环境下驱动调度器与请求边界。

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use futures::future::BoxFuture;

use dualtrans::providers::{BulkTranslate, SimpleTranslate};
use dualtrans::{Fragment, ServiceConfig, TranslateError, TranslateResult, TranslationService};

/// 合成批量适配器
///
/// `fail` 打开时模拟整体失败；否则按 `mapping`（id到译文）返回，
/// 词表里没有的id从映射中缺席（部分成功）。
pub struct StubBulk {
    pub mapping: HashMap<String, String>,
    pub fail: bool,
    pub calls: Arc<AtomicU64>,
}

impl StubBulk {
    pub fn answering(pairs: &[(&str, &str)]) -> Self {
        Self {
            mapping: to_map(pairs),
            fail: false,
            calls: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn failing() -> Self {
        Self {
            mapping: HashMap::new(),
            fail: true,
            calls: Arc::new(AtomicU64::new(0)),
        }
    }
}

impl BulkTranslate for StubBulk {
    fn translate_many<'a>(
        &'a self,
        items: &'a [Fragment],
        _source_lang: &'a str,
        _target_lang: &'a str,
    ) -> BoxFuture<'a, TranslateResult<HashMap<String, String>>> {
        Box::pin(async move {
            self.calls.fetch_add(1, Ordering::Relaxed);
            if self.fail {
                return Err(TranslateError::Provider("合成整体失败".to_string()));
            }
            Ok(items
                .iter()
                .filter_map(|item| {
                    self.mapping
                        .get(&item.id)
                        .map(|text| (item.id.clone(), text.clone()))
                })
                .collect())
        })
    }
}

/// 合成逐条适配器
///
/// 按 `glossary`（原文到译文）应答，词表里没有的原文折算为空串。
/// `seen` 记录每次调用的 (原文, 源语言, 目标语言)。
pub struct StubSimple {
    pub glossary: HashMap<String, String>,
    pub calls: Arc<AtomicU64>,
    pub seen: Arc<Mutex<Vec<(String, String, String)>>>,
}

impl StubSimple {
    pub fn answering(pairs: &[(&str, &str)]) -> Self {
        Self {
            glossary: to_map(pairs),
            calls: Arc::new(AtomicU64::new(0)),
            seen: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn empty() -> Self {
        Self::answering(&[])
    }
}

impl SimpleTranslate for StubSimple {
    fn translate_one<'a>(
        &'a self,
        text: &'a str,
        source_lang: &'a str,
        target_lang: &'a str,
    ) -> BoxFuture<'a, String> {
        Box::pin(async move {
            self.calls.fetch_add(1, Ordering::Relaxed);
            self.seen.lock().unwrap().push((
                text.to_string(),
                source_lang.to_string(),
                target_lang.to_string(),
            ));
            self.glossary.get(text).cloned().unwrap_or_default()
        })
    }
}

/// 用合成适配器装配服务
pub fn service_with(bulk: StubBulk, simple: StubSimple) -> TranslationService {
    TranslationService::with_providers(ServiceConfig::default(), Box::new(bulk), Box::new(simple))
}

pub fn to_map(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// 构造 `{id -> 文本}` 的片段列表
pub fn fragments(pairs: &[(&str, &str)]) -> Vec<Fragment> {
    pairs
        .iter()
        .map(|(id, text)| Fragment::new(*id, *text))
        .collect()
}
