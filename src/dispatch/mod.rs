//! 批次调度器
//!
//! 翻译系统的协调核心。一次调度按状态机推进：
//!
//! ```text
//! 查缓存 ─全命中─▶ 完成
//!    │未命中
//!    ▼
//! （引擎=bulk）批量请求 ─成功(可部分)─▶ 合并回填 ─▶ 完成
//!    │整体失败                     （部分结果不触发降级）
//!    ▼
//! 逐条工作者池（固定并发）─▶ 合并回填 ─▶ 完成
//! ```
//!
//! 关键约束：
//! - 结果映射对请求中的每个id做全覆盖，单条失败以空串占位
//! - 批量整体失败后，同一份未修改的工作列表转入逐条提供方
//! - 降级后缓存写入仍使用调用方请求的引擎作为键分量
//! - 工作者通过共享游标认领片段：不重复、不遗漏，全部收尾后才返回

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use futures::future::join_all;

use crate::providers::{BulkTranslate, SimpleTranslate};
use crate::storage::{CacheKey, FragmentCache};
use crate::types::{BatchRequest, BatchResult, Engine, Fragment};

/// 批次调度器
///
/// 持有片段缓存和两个提供方适配器。缓存以 `Arc` 共享，
/// 并发批次之间的缓存变更由缓存内部串行化。
pub struct BatchDispatcher {
    cache: Arc<FragmentCache>,
    bulk: Box<dyn BulkTranslate>,
    simple: Box<dyn SimpleTranslate>,
    pool_size: usize,
    stats: DispatchStats,
}

impl BatchDispatcher {
    pub fn new(
        cache: Arc<FragmentCache>,
        bulk: Box<dyn BulkTranslate>,
        simple: Box<dyn SimpleTranslate>,
        pool_size: usize,
    ) -> Self {
        Self {
            cache,
            bulk,
            simple,
            pool_size: pool_size.max(1),
            stats: DispatchStats::default(),
        }
    }

    /// 调度一个批次
    ///
    /// 返回的映射覆盖请求中的全部id。空批次直接返回空映射，
    /// 不产生任何网络活动。
    pub async fn dispatch(&self, request: &BatchRequest) -> BatchResult {
        self.stats.batches.fetch_add(1, Ordering::Relaxed);

        let mut out = BatchResult::with_capacity(request.items.len());
        let mut missing: Vec<Fragment> = Vec::new();

        // 1. 查缓存：命中直接进结果，未命中组成工作列表
        for item in &request.items {
            let key = self.cache_key(request, &item.text);
            match self.cache.get(&key) {
                Some(cached) => {
                    out.insert(item.id.clone(), cached);
                }
                None => missing.push(item.clone()),
            }
        }

        if missing.is_empty() {
            return out;
        }
        tracing::debug!(
            "批次 {} 条，缓存命中 {} 条，待翻译 {} 条",
            request.items.len(),
            out.len(),
            missing.len()
        );

        // 2. 批量引擎：一次请求携带整个工作列表。部分结果视为最终结果，
        //    只有整体失败才降级
        if request.engine == Engine::Bulk {
            self.stats.bulk_requests.fetch_add(1, Ordering::Relaxed);
            match self
                .bulk
                .translate_many(&missing, &request.source_lang, &request.target_lang)
                .await
            {
                Ok(mapping) => {
                    for item in &missing {
                        if let Some(translated) = mapping.get(&item.id) {
                            if !translated.is_empty() {
                                self.cache.put(
                                    self.cache_key(request, &item.text),
                                    translated.clone(),
                                );
                            }
                            out.insert(item.id.clone(), translated.clone());
                        }
                    }
                    return finalize(out, &request.items);
                }
                Err(e) => {
                    self.stats.bulk_failures.fetch_add(1, Ordering::Relaxed);
                    tracing::warn!("批量翻译整体失败，降级到逐条提供方: {}", e);
                }
            }
        }

        // 3. 逐条工作者池：固定数量的工作者争抢共享游标，
        //    每个片段恰好被认领一次
        let translated = self
            .run_simple_pool(&missing, &request.source_lang, &request.target_lang)
            .await;

        for (index, text) in translated {
            let item = &missing[index];
            if !text.is_empty() {
                self.cache.put(self.cache_key(request, &item.text), text.clone());
            }
            out.insert(item.id.clone(), text);
        }

        finalize(out, &request.items)
    }

    /// 逐条提供方的有界并发扇出
    ///
    /// 只有网络调用是并发的；游标递增与结果合并都是不跨挂起点的
    /// 原子步骤。所有工作者排空列表后才返回（结构化汇合）。
    async fn run_simple_pool(
        &self,
        work: &[Fragment],
        source_lang: &str,
        target_lang: &str,
    ) -> Vec<(usize, String)> {
        let cursor = AtomicUsize::new(0);
        let merged: Mutex<Vec<(usize, String)>> = Mutex::new(Vec::with_capacity(work.len()));

        let worker_count = self.pool_size.min(work.len());
        let workers = (0..worker_count).map(|_| {
            let cursor = &cursor;
            let merged = &merged;
            async move {
                loop {
                    let index = cursor.fetch_add(1, Ordering::Relaxed);
                    let Some(item) = work.get(index) else { break };

                    self.stats.simple_requests.fetch_add(1, Ordering::Relaxed);
                    let text = self
                        .simple
                        .translate_one(&item.text, source_lang, target_lang)
                        .await;
                    merged.lock().unwrap().push((index, text));
                }
            }
        });
        join_all(workers).await;

        merged.into_inner().unwrap()
    }

    /// 构造缓存键：引擎分量始终取调用方请求的引擎，
    /// 即使实际译文来自降级后的逐条提供方
    fn cache_key(&self, request: &BatchRequest, text: &str) -> CacheKey {
        CacheKey::new(
            request.engine,
            request.source_lang.as_str(),
            request.target_lang.as_str(),
            text,
        )
    }

    pub fn cache(&self) -> &FragmentCache {
        &self.cache
    }

    pub fn stats(&self) -> DispatchStatsSnapshot {
        self.stats.snapshot()
    }
}

/// 收尾：给尚未出现在结果中的id补空串，保证全覆盖。
/// 批量响应的单条缺失走到这里，不会再转发给逐条提供方。
fn finalize(mut out: BatchResult, items: &[Fragment]) -> BatchResult {
    for item in items {
        out.entry(item.id.clone()).or_default();
    }
    out
}

/// 调度统计信息
#[derive(Debug, Default)]
pub struct DispatchStats {
    /// 已调度的批次数
    pub batches: AtomicU64,
    /// 批量提供方请求次数
    pub bulk_requests: AtomicU64,
    /// 批量提供方整体失败（触发降级）次数
    pub bulk_failures: AtomicU64,
    /// 逐条提供方请求次数（按片段计）
    pub simple_requests: AtomicU64,
}

impl DispatchStats {
    pub fn snapshot(&self) -> DispatchStatsSnapshot {
        DispatchStatsSnapshot {
            batches: self.batches.load(Ordering::Relaxed),
            bulk_requests: self.bulk_requests.load(Ordering::Relaxed),
            bulk_failures: self.bulk_failures.load(Ordering::Relaxed),
            simple_requests: self.simple_requests.load(Ordering::Relaxed),
        }
    }
}

/// 调度统计快照
#[derive(Debug, Clone, Copy)]
pub struct DispatchStatsSnapshot {
    pub batches: u64,
    pub bulk_requests: u64,
    pub bulk_failures: u64,
    pub simple_requests: u64,
}
