//! # dualtrans
//!
//! 双语阅读场景的批次翻译调度与缓存引擎。接收一组 `{id, 文本}` 片段，
//! 去重查缓存后把未命中部分派发给外部翻译提供方，合并为逐片段的
//! 结果映射。
//!
//! ## 模块组织
//!
//! - `types` - 片段、引擎与批次请求/结果类型
//! - `storage` - 定长LRU片段缓存
//! - `providers` - 批量/逐条两个提供方适配器与令牌管理
//! - `dispatch` - 批次调度器（缓存、降级、有界工作者池）
//! - `service` - 对外门面与回译
//! - `rpc` - 通道式请求边界
//! - `config` - 常量与服务配置
//! - `detect` - 中英语言检测启发式
//! - `history` - 定长翻译历史（调用方侧）
//! - `error` - 统一错误类型
//!
//! ## 基本用法
//!
//! ```rust,no_run
//! use dualtrans::{Engine, ServiceConfig, TranslationService};
//!
//! # async fn example() -> dualtrans::TranslateResult<()> {
//! let service = TranslationService::new(ServiceConfig::load())?;
//! let translated = service.translate_text(Engine::Simple, "en", "zh", "Hello").await;
//! println!("{}", translated);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod detect;
pub mod dispatch;
pub mod error;
pub mod history;
pub mod providers;
pub mod rpc;
pub mod service;
pub mod storage;
pub mod types;

pub use config::ServiceConfig;
pub use error::{TranslateError, TranslateResult};
pub use service::{RoundTrip, TranslationService};
pub use storage::{CacheKey, FragmentCache};
pub use types::{BatchRequest, BatchResult, Engine, Fragment};

/// 便利函数：用默认配置一次性翻译一段文本
///
/// 每次调用都会装配一个全新的服务实例（缓存为空），
/// 适合脚本式的单次调用；重复调用请持有 [`TranslationService`]。
pub async fn translate_text_once(
    engine: Engine,
    source_lang: &str,
    target_lang: &str,
    text: &str,
) -> TranslateResult<String> {
    let service = TranslationService::new(ServiceConfig::load())?;
    Ok(service
        .translate_text(engine, source_lang, target_lang, text)
        .await)
}
