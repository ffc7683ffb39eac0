//! 统一错误处理
//!
//! 提供结构化错误类型和错误处理机制。适配器内部的失败大多不会向外抛出
//! （见调度器的降级与空值策略），这里的错误类型主要服务于配置加载、
//! 令牌获取和批量提供方的整体失败信号。

use thiserror::Error;

/// 翻译错误类型
#[derive(Error, Debug, Clone)]
pub enum TranslateError {
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(String),

    /// 网络错误
    #[error("网络错误: {0}")]
    Network(String),

    /// 令牌获取失败
    #[error("令牌获取失败: {0}")]
    Token(String),

    /// 翻译服务错误（非成功状态码或整体失败）
    #[error("翻译服务错误: {0}")]
    Provider(String),

    /// 解析错误
    #[error("解析错误: {0}")]
    Parse(String),

    /// 序列化错误
    #[error("序列化错误: {0}")]
    Serialization(String),

    /// 输入无效
    #[error("输入无效: {0}")]
    InvalidInput(String),

    /// IO错误
    #[error("IO错误: {0}")]
    Io(String),

    /// 请求通道已关闭
    #[error("请求通道已关闭: {0}")]
    ChannelClosed(String),
}

impl From<reqwest::Error> for TranslateError {
    fn from(error: reqwest::Error) -> Self {
        TranslateError::Network(error.to_string())
    }
}

impl From<serde_json::Error> for TranslateError {
    fn from(error: serde_json::Error) -> Self {
        TranslateError::Serialization(format!("JSON序列化错误: {}", error))
    }
}

impl From<std::io::Error> for TranslateError {
    fn from(error: std::io::Error) -> Self {
        TranslateError::Io(error.to_string())
    }
}

impl From<toml::de::Error> for TranslateError {
    fn from(error: toml::de::Error) -> Self {
        TranslateError::Parse(format!("TOML解析错误: {}", error))
    }
}

/// 错误结果类型别名
pub type TranslateResult<T> = Result<T, TranslateError>;
