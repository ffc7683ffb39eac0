//! 配置管理
//!
//! 提供简化的配置管理，支持配置文件、环境变量和默认值。
//! 所有固定参数集中在 [`constants`] 中，运行时可调的部分收敛到
//! [`ServiceConfig`]。

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::TranslateResult;
use crate::types::Engine;

/// 配置常量
pub mod constants {
    use std::time::Duration;

    // 缓存设置
    pub const CACHE_CAPACITY: usize = 500;

    // 令牌设置：固定5分钟有效期，保守短于提供方实际TTL
    pub const TOKEN_TTL: Duration = Duration::from_secs(5 * 60);

    // 逐条提供方的并发工作者数量
    pub const SIMPLE_POOL_SIZE: usize = 4;

    // 默认语言对与引擎
    pub const DEFAULT_SOURCE_LANG: &str = "en";
    pub const DEFAULT_TARGET_LANG: &str = "zh";

    // 历史记录上限
    pub const HISTORY_CAP: usize = 20;

    // 提供方端点
    pub const TOKEN_ENDPOINT: &str = "https://edge.microsoft.com/translate/auth";
    pub const BULK_ENDPOINT: &str =
        "https://api-edge.cognitive.microsofttranslator.com/translate";
    pub const SIMPLE_ENDPOINT: &str = "https://translate.googleapis.com/translate_a/single";
    pub const BULK_API_VERSION: &str = "3.0";

    // 配置文件搜索路径
    pub const CONFIG_PATHS: &[&str] = &[
        "dualtrans.toml",
        ".dualtrans.toml",
        "~/.config/dualtrans/config.toml",
    ];
}

/// 服务配置
///
/// 端点地址可改写主要是为了联调与测试（指向本地桩服务）。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// 令牌签发端点
    pub token_endpoint: String,
    /// 批量翻译端点
    pub bulk_endpoint: String,
    /// 逐条翻译端点
    pub simple_endpoint: String,
    /// 片段缓存容量
    pub cache_capacity: usize,
    /// 逐条提供方并发工作者数量
    pub pool_size: usize,
    /// 缺省引擎（请求未指定时使用）
    pub default_engine: Engine,
    /// 缺省源语言
    pub default_source_lang: String,
    /// 缺省目标语言
    pub default_target_lang: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            token_endpoint: constants::TOKEN_ENDPOINT.to_string(),
            bulk_endpoint: constants::BULK_ENDPOINT.to_string(),
            simple_endpoint: constants::SIMPLE_ENDPOINT.to_string(),
            cache_capacity: constants::CACHE_CAPACITY,
            pool_size: constants::SIMPLE_POOL_SIZE,
            default_engine: Engine::Simple,
            default_source_lang: constants::DEFAULT_SOURCE_LANG.to_string(),
            default_target_lang: constants::DEFAULT_TARGET_LANG.to_string(),
        }
    }
}

impl ServiceConfig {
    /// 从TOML文件加载配置
    ///
    /// 文件中省略的字段取默认值。
    pub fn from_file(path: impl AsRef<Path>) -> TranslateResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = toml::from_str(&content)?;
        Ok(config)
    }

    /// 加载配置：依次尝试标准路径，找不到则使用默认值，
    /// 最后应用环境变量覆盖
    pub fn load() -> Self {
        let mut config = constants::CONFIG_PATHS
            .iter()
            .map(|p| expand_home(p))
            .find(|p| Path::new(p).exists())
            .and_then(|p| match Self::from_file(&p) {
                Ok(c) => {
                    tracing::debug!("已加载配置文件: {}", p);
                    Some(c)
                }
                Err(e) => {
                    tracing::warn!("配置文件 {} 加载失败，使用默认配置: {}", p, e);
                    None
                }
            })
            .unwrap_or_default();

        config.apply_env_overrides();
        config
    }

    /// 应用 `DUALTRANS_*` 环境变量覆盖
    fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("DUALTRANS_TOKEN_ENDPOINT") {
            self.token_endpoint = v;
        }
        if let Ok(v) = std::env::var("DUALTRANS_BULK_ENDPOINT") {
            self.bulk_endpoint = v;
        }
        if let Ok(v) = std::env::var("DUALTRANS_SIMPLE_ENDPOINT") {
            self.simple_endpoint = v;
        }
        if let Ok(v) = std::env::var("DUALTRANS_ENGINE") {
            match v.parse() {
                Ok(engine) => self.default_engine = engine,
                Err(e) => tracing::warn!("忽略无效的 DUALTRANS_ENGINE: {}", e),
            }
        }
    }
}

/// 展开路径开头的 `~`
pub fn expand_home(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = std::env::var_os("HOME") {
            return Path::new(&home).join(rest).to_string_lossy().into_owned();
        }
    }
    path.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServiceConfig::default();
        assert_eq!(config.cache_capacity, 500);
        assert_eq!(config.pool_size, 4);
        assert_eq!(config.default_engine, Engine::Simple);
        assert_eq!(config.default_source_lang, "en");
        assert_eq!(config.default_target_lang, "zh");
    }

    #[test]
    fn test_partial_toml_overrides_only_named_fields() {
        let config: ServiceConfig =
            toml::from_str("pool_size = 8\ndefault_engine = \"bulk\"").unwrap();
        assert_eq!(config.pool_size, 8);
        assert_eq!(config.default_engine, Engine::Bulk);
        // 未命名字段保持默认
        assert_eq!(config.cache_capacity, 500);
        assert_eq!(config.token_endpoint, constants::TOKEN_ENDPOINT);
    }
}
