//! 翻译服务
//!
//! 对外的统一门面：装配缓存、令牌管理器、两个提供方和调度器，
//! 提供批次翻译、单文本翻译和回译校对三个入口。
//!
//! ## 设计要点
//!
//! - 缓存与令牌状态不是全局单例，而是随服务实例构造的显式上下文对象，
//!   测试中用新实例即可彼此隔离
//! - 所有方法只需要 `&self`，实例用 `Arc` 包装后可被并发批次共享
//! - 错误从不越过服务边界：失败折算为空译文，调用方把空串解释为
//!   "翻译不可用"；缓存命中与新鲜结果在边界上不可区分

use std::sync::Arc;

use crate::config::ServiceConfig;
use crate::dispatch::{BatchDispatcher, DispatchStatsSnapshot};
use crate::error::TranslateResult;
use crate::providers::{
    BulkProvider, BulkTranslate, SimpleProvider, SimpleTranslate, TokenManager,
};
use crate::storage::{CacheStatsSnapshot, FragmentCache};
use crate::types::{BatchRequest, BatchResult, Engine, Fragment};

/// 单文本请求在内部批次中使用的片段id
const SINGLE_ID: &str = "single";

/// 翻译服务
pub struct TranslationService {
    config: ServiceConfig,
    dispatcher: BatchDispatcher,
}

impl TranslationService {
    /// 按配置装配真实提供方
    ///
    /// 进程内共享一个 `reqwest::Client`，令牌管理器被批量适配器持有。
    pub fn new(config: ServiceConfig) -> TranslateResult<Self> {
        let http = reqwest::Client::builder().build()?;
        let tokens = Arc::new(TokenManager::new(http.clone(), config.token_endpoint.clone()));
        let bulk = BulkProvider::new(http.clone(), config.bulk_endpoint.clone(), tokens);
        let simple = SimpleProvider::new(http, config.simple_endpoint.clone());
        Ok(Self::with_providers(config, Box::new(bulk), Box::new(simple)))
    }

    /// 用给定的提供方装配服务（测试注入合成适配器的入口）
    pub fn with_providers(
        config: ServiceConfig,
        bulk: Box<dyn BulkTranslate>,
        simple: Box<dyn SimpleTranslate>,
    ) -> Self {
        let cache = Arc::new(FragmentCache::new(config.cache_capacity));
        let dispatcher = BatchDispatcher::new(cache, bulk, simple, config.pool_size);
        Self { config, dispatcher }
    }

    /// 翻译一个批次
    ///
    /// 结果映射覆盖请求中的全部id；空批次得到空映射。
    pub async fn translate_batch(&self, request: BatchRequest) -> BatchResult {
        if request.items.is_empty() {
            return BatchResult::new();
        }
        self.dispatcher.dispatch(&request).await
    }

    /// 翻译单段文本（内部包装为单元素批次）
    pub async fn translate_text(
        &self,
        engine: Engine,
        source_lang: &str,
        target_lang: &str,
        text: &str,
    ) -> String {
        let request = BatchRequest::new(
            engine,
            source_lang,
            target_lang,
            vec![Fragment::new(SINGLE_ID, text)],
        );
        let mut out = self.translate_batch(request).await;
        out.remove(SINGLE_ID).unwrap_or_default()
    }

    /// 翻译并回译
    ///
    /// 先正向翻译，再把译文翻回源侧语言用于核对意思。回译语言对
    /// 取目标语言为新源，新目标在中英之间取另一侧。
    pub async fn translate_round_trip(
        &self,
        engine: Engine,
        source_lang: &str,
        target_lang: &str,
        text: &str,
    ) -> RoundTrip {
        let translated = self
            .translate_text(engine, source_lang, target_lang, text)
            .await;

        if translated.is_empty() {
            return RoundTrip {
                text: translated,
                back: String::new(),
            };
        }

        let back_from = target_lang;
        let back_to = if back_from == "zh" || back_from == "zh-CN" {
            "en"
        } else {
            "zh"
        };
        let back = self
            .translate_text(engine, back_from, back_to, &translated)
            .await;

        RoundTrip {
            text: translated,
            back,
        }
    }

    /// 把可能缺省的边界入参解析为完整请求
    ///
    /// 引擎与语言对的缺省值来自配置（原始偏好存储的对应物）。
    pub fn resolve_request(
        &self,
        engine: Option<Engine>,
        source_lang: Option<String>,
        target_lang: Option<String>,
        items: Vec<Fragment>,
    ) -> BatchRequest {
        BatchRequest {
            engine: engine.unwrap_or(self.config.default_engine),
            source_lang: source_lang.unwrap_or_else(|| self.config.default_source_lang.clone()),
            target_lang: target_lang.unwrap_or_else(|| self.config.default_target_lang.clone()),
            items,
        }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// 片段缓存的只读访问（检视与测试）
    pub fn cache(&self) -> &FragmentCache {
        self.dispatcher.cache()
    }

    pub fn cache_stats(&self) -> CacheStatsSnapshot {
        self.dispatcher.cache().stats()
    }

    pub fn dispatch_stats(&self) -> DispatchStatsSnapshot {
        self.dispatcher.stats()
    }
}

/// 回译结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundTrip {
    /// 正向译文
    pub text: String,
    /// 译文翻回源侧语言的结果，用于人工核对
    pub back: String,
}
