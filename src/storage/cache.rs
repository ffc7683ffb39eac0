//! 片段缓存模块
//!
//! 固定容量的LRU缓存，以 `(引擎, 源语言, 目标语言, 原文)` 为键保存译文。
//! 命中或写入都会把键提升为最近使用；新键写入时若已满，恰好淘汰一条
//! 最久未使用的条目。条目没有过期时间，只受容量压力驱逐。
//!
//! 并发批次会同时读写本缓存，所有变更通过内部互斥锁串行化，
//! 保证最近使用顺序不被交错破坏。

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use lru::LruCache;

use crate::types::Engine;

/// 缓存键
///
/// 四个分量均按字符串精确相等比较，不做任何归一化
/// （`zh` 到区域变体的改写发生在适配器边界，不进入键）。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub engine: Engine,
    pub source_lang: String,
    pub target_lang: String,
    pub text: String,
}

impl CacheKey {
    pub fn new(
        engine: Engine,
        source_lang: impl Into<String>,
        target_lang: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            engine,
            source_lang: source_lang.into(),
            target_lang: target_lang.into(),
            text: text.into(),
        }
    }
}

/// 缓存统计信息
#[derive(Debug, Default)]
pub struct CacheStats {
    pub hits: AtomicU64,
    pub misses: AtomicU64,
    pub evictions: AtomicU64,
}

impl CacheStats {
    pub fn snapshot(&self) -> CacheStatsSnapshot {
        CacheStatsSnapshot {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
        }
    }
}

/// 缓存统计快照
#[derive(Debug, Clone, Copy)]
pub struct CacheStatsSnapshot {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
}

impl CacheStatsSnapshot {
    /// 缓存命中率
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// 片段缓存
pub struct FragmentCache {
    entries: Mutex<LruCache<CacheKey, String>>,
    stats: CacheStats,
}

impl FragmentCache {
    /// 创建指定容量的缓存
    ///
    /// 容量为0时按1处理，保持类型约束简单。
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            stats: CacheStats::default(),
        }
    }

    /// 查询缓存
    ///
    /// 命中时把键提升为最近使用并返回译文副本；未命中无副作用。
    pub fn get(&self, key: &CacheKey) -> Option<String> {
        let mut entries = self.entries.lock().unwrap();
        match entries.get(key) {
            Some(value) => {
                self.stats.hits.fetch_add(1, Ordering::Relaxed);
                Some(value.clone())
            }
            None => {
                self.stats.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// 写入缓存
    ///
    /// 已有键覆盖译文并提升；新键在满容量时先淘汰最久未使用的条目。
    pub fn put(&self, key: CacheKey, value: String) {
        let mut entries = self.entries.lock().unwrap();
        if let Some((evicted_key, _)) = entries.push(key.clone(), value) {
            // push 返回被替换或被淘汰的条目，只有键不同才是真正的淘汰
            if evicted_key != key {
                self.stats.evictions.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    /// 当前条目数
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 清空缓存
    pub fn clear(&self) {
        self.entries.lock().unwrap().clear();
    }

    /// 获取统计信息
    pub fn stats(&self) -> CacheStatsSnapshot {
        self.stats.snapshot()
    }
}
