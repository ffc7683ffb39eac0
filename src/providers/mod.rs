//! 翻译提供方适配器
//!
//! 两个互相独立的后端：
//! - **批量适配器** ([`bulk::BulkProvider`]): 带鉴权，一次请求携带全部片段，
//!   响应按位置与请求一一对应
//! - **逐条适配器** ([`simple::SimpleProvider`]): 免鉴权，每个片段单独请求，
//!   任何失败都折算为该片段的空译文
//!
//! 调度器只通过 [`BulkTranslate`] / [`SimpleTranslate`] 两个seam访问后端，
//! 测试用合成适配器替换真实实现。

use std::collections::HashMap;

use futures::future::BoxFuture;

use crate::error::TranslateResult;
use crate::types::Fragment;

pub mod bulk;
pub mod simple;
pub mod token;

pub use bulk::BulkProvider;
pub use simple::SimpleProvider;
pub use token::TokenManager;

/// 批量翻译后端
///
/// `Ok` 返回片段id到译文的映射，允许部分缺失（部分成功）；
/// `Err` 表示整体失败（令牌获取失败、网络错误或非成功状态），
/// 由调度器决定是否降级。
pub trait BulkTranslate: Send + Sync {
    fn translate_many<'a>(
        &'a self,
        items: &'a [Fragment],
        source_lang: &'a str,
        target_lang: &'a str,
    ) -> BoxFuture<'a, TranslateResult<HashMap<String, String>>>;
}

/// 逐条翻译后端
///
/// 永不失败：网络、解析错误或空响应都折算为空串，由调用方
/// 把空串解释为"翻译不可用"。
pub trait SimpleTranslate: Send + Sync {
    fn translate_one<'a>(
        &'a self,
        text: &'a str,
        source_lang: &'a str,
        target_lang: &'a str,
    ) -> BoxFuture<'a, String>;
}

/// 批量提供方的语言码归一化
///
/// 通用中文码改写为该提供方的简体变体，其余原样透传。
/// 归一化只发生在出站请求，不参与缓存键。
pub fn bulk_lang(code: &str) -> &str {
    match code {
        "zh" | "zh-CN" => "zh-Hans",
        other => other,
    }
}

/// 逐条提供方的语言码归一化
///
/// 通用 `zh` 改写为带区域的变体，其余原样透传。
pub fn simple_lang(code: &str) -> &str {
    match code {
        "zh" => "zh-CN",
        other => other,
    }
}
