//! 令牌管理
//!
//! 批量提供方要求携带短时效的bearer令牌。本模块负责获取并缓存令牌，
//! 过期后重新拉取。有效期固定为签发后5分钟，保守短于提供方的实际TTL。

use std::sync::Mutex;
use std::time::{Duration, Instant};

use reqwest::Client;

use crate::config::constants;
use crate::error::{TranslateError, TranslateResult};

/// 已缓存的令牌
#[derive(Debug, Clone)]
struct CachedToken {
    value: String,
    deadline: Instant,
}

impl CachedToken {
    fn is_valid(&self, now: Instant) -> bool {
        now < self.deadline
    }
}

/// 令牌管理器
///
/// 锁从不跨越网络挂起点持有，因此并发调用方可能触发少量冗余拉取
/// （各自成功后先后写回），但绝不会拿到已过期的令牌。管理器内部不做
/// 重试，失败直接上抛，由调用链决定降级。
pub struct TokenManager {
    http: Client,
    endpoint: String,
    ttl: Duration,
    cached: Mutex<Option<CachedToken>>,
}

impl TokenManager {
    pub fn new(http: Client, endpoint: impl Into<String>) -> Self {
        Self::with_ttl(http, endpoint, constants::TOKEN_TTL)
    }

    pub fn with_ttl(http: Client, endpoint: impl Into<String>, ttl: Duration) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
            ttl,
            cached: Mutex::new(None),
        }
    }

    /// 获取可用的bearer令牌
    ///
    /// 缓存未过期时直接返回；否则向签发端点发起GET，响应体即为
    /// 令牌原文（去除首尾空白）。
    pub async fn bearer(&self) -> TranslateResult<String> {
        if let Some(token) = self.cached.lock().unwrap().as_ref() {
            if token.is_valid(Instant::now()) {
                return Ok(token.value.clone());
            }
        }

        let response = self
            .http
            .get(&self.endpoint)
            .send()
            .await
            .map_err(|e| TranslateError::Token(format!("请求签发端点失败: {}", e)))?;

        if !response.status().is_success() {
            return Err(TranslateError::Token(format!(
                "签发端点返回非成功状态: {}",
                response.status()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| TranslateError::Token(format!("读取令牌响应失败: {}", e)))?;
        let value = body.trim().to_string();
        if value.is_empty() {
            return Err(TranslateError::Token("签发端点返回空令牌".to_string()));
        }

        tracing::debug!("已刷新bearer令牌，有效期 {:?}", self.ttl);
        *self.cached.lock().unwrap() = Some(CachedToken {
            value: value.clone(),
            deadline: Instant::now() + self.ttl,
        });

        Ok(value)
    }

    /// 作废当前缓存的令牌
    pub fn invalidate(&self) {
        *self.cached.lock().unwrap() = None;
    }
}
