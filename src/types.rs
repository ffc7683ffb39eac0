//! 核心数据类型
//!
//! 定义跨越请求边界的批次数据结构：
//! - `Fragment`: 一次批次内待翻译的文本片段
//! - `Engine`: 翻译引擎选择（批量/逐条）
//! - `BatchRequest` / `BatchResult`: 一次调度调用的输入与输出

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TranslateError;

/// 待翻译的文本片段
///
/// `id` 在一个批次内唯一，由调用方分配，不做持久化。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fragment {
    pub id: String,
    pub text: String,
}

impl Fragment {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }
}

/// 翻译引擎
///
/// - `Bulk`: 带鉴权的批量提供方，一次请求携带多个片段
/// - `Simple`: 免鉴权的逐条提供方，每个片段单独请求
///
/// 引擎同时参与缓存键：即使批量引擎降级到逐条提供方，
/// 缓存写入仍使用调用方请求的引擎（见调度器）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Engine {
    Bulk,
    #[default]
    Simple,
}

impl Engine {
    pub fn as_str(&self) -> &'static str {
        match self {
            Engine::Bulk => "bulk",
            Engine::Simple => "simple",
        }
    }
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Engine {
    type Err = TranslateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bulk" => Ok(Engine::Bulk),
            "simple" => Ok(Engine::Simple),
            other => Err(TranslateError::InvalidInput(format!(
                "未知的翻译引擎: {}",
                other
            ))),
        }
    }
}

/// 一次批次翻译请求
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchRequest {
    pub engine: Engine,
    #[serde(rename = "from")]
    pub source_lang: String,
    #[serde(rename = "to")]
    pub target_lang: String,
    pub items: Vec<Fragment>,
}

impl BatchRequest {
    pub fn new(
        engine: Engine,
        source_lang: impl Into<String>,
        target_lang: impl Into<String>,
        items: Vec<Fragment>,
    ) -> Self {
        Self {
            engine,
            source_lang: source_lang.into(),
            target_lang: target_lang.into(),
            items,
        }
    }
}

/// 批次翻译结果：片段id到译文的映射
///
/// 请求中出现的每个id都必然出现在结果中，单条失败以空串占位。
pub type BatchResult = HashMap<String, String>;
