//! 请求边界
//!
//! 核心对UI侧调用方暴露的消息契约：批次请求进、结果映射出。
//! 实现为显式的异步请求/应答通道：每个请求携带一个一次性应答发送端，
//! 应答发送即该请求唯一的完成点，没有隐式的"保持通道开放"语义。
//!
//! 错误从不以异常形态越过边界：应答始终是尽力而为的映射或文本，
//! 失败只表现为空值。调用方消失时，在途请求照常完成，应答被静默丢弃。

use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, oneshot};

use crate::error::{TranslateError, TranslateResult};
use crate::service::TranslationService;
use crate::types::{BatchResult, Engine, Fragment};

/// 边界请求消息
///
/// 缺省字段由服务侧补全：引擎缺省为逐条引擎，语言对缺省取配置。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RpcPayload {
    /// 批次翻译：`{id -> 译文}` 映射应答
    TranslateBatch {
        engine: Option<Engine>,
        from: Option<String>,
        to: Option<String>,
        #[serde(default)]
        items: Vec<Fragment>,
    },
    /// 单文本翻译：`{ text }` 应答（单元素批次的语法糖）
    TranslateText {
        engine: Option<Engine>,
        from: Option<String>,
        to: Option<String>,
        #[serde(default)]
        text: String,
    },
}

/// 边界应答消息
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum RpcReply {
    Batch(BatchResult),
    Text { text: String },
}

struct RpcRequest {
    payload: RpcPayload,
    respond_to: oneshot::Sender<RpcReply>,
}

/// 边界客户端句柄
///
/// 可廉价克隆，各持有同一服务任务的发送端。
#[derive(Clone)]
pub struct RpcClient {
    tx: mpsc::Sender<RpcRequest>,
}

impl RpcClient {
    /// 发送原始消息并等待应答
    pub async fn request(&self, payload: RpcPayload) -> TranslateResult<RpcReply> {
        let (tx, rx) = oneshot::channel();
        self.tx
            .send(RpcRequest {
                payload,
                respond_to: tx,
            })
            .await
            .map_err(|_| TranslateError::ChannelClosed("服务任务已退出".to_string()))?;
        rx.await
            .map_err(|_| TranslateError::ChannelClosed("应答发送端被丢弃".to_string()))
    }

    /// 批次翻译
    pub async fn translate_batch(
        &self,
        engine: Option<Engine>,
        from: Option<String>,
        to: Option<String>,
        items: Vec<Fragment>,
    ) -> TranslateResult<BatchResult> {
        match self
            .request(RpcPayload::TranslateBatch {
                engine,
                from,
                to,
                items,
            })
            .await?
        {
            RpcReply::Batch(mapping) => Ok(mapping),
            RpcReply::Text { .. } => Err(TranslateError::InvalidInput(
                "批次请求收到文本应答".to_string(),
            )),
        }
    }

    /// 单文本翻译
    pub async fn translate_text(
        &self,
        engine: Option<Engine>,
        from: Option<String>,
        to: Option<String>,
        text: impl Into<String>,
    ) -> TranslateResult<String> {
        match self
            .request(RpcPayload::TranslateText {
                engine,
                from,
                to,
                text: text.into(),
            })
            .await?
        {
            RpcReply::Text { text } => Ok(text),
            RpcReply::Batch(_) => Err(TranslateError::InvalidInput(
                "文本请求收到批次应答".to_string(),
            )),
        }
    }
}

/// 把服务挂到请求通道上，返回客户端句柄
///
/// 每个请求在独立任务中处理，并发批次按调度器的共享资源策略交错。
/// 所有客户端句柄丢弃后接收循环退出，服务随之结束。
pub fn spawn(service: TranslationService) -> RpcClient {
    let (tx, mut rx) = mpsc::channel::<RpcRequest>(64);
    let service = std::sync::Arc::new(service);

    tokio::spawn(async move {
        while let Some(RpcRequest {
            payload,
            respond_to,
        }) = rx.recv().await
        {
            let service = std::sync::Arc::clone(&service);
            tokio::spawn(async move {
                let reply = handle(&service, payload).await;
                let _ = respond_to.send(reply);
            });
        }
        tracing::debug!("请求边界通道关闭，服务任务退出");
    });

    RpcClient { tx }
}

async fn handle(service: &TranslationService, payload: RpcPayload) -> RpcReply {
    match payload {
        RpcPayload::TranslateBatch {
            engine,
            from,
            to,
            items,
        } => {
            let request = service.resolve_request(engine, from, to, items);
            RpcReply::Batch(service.translate_batch(request).await)
        }
        RpcPayload::TranslateText {
            engine,
            from,
            to,
            text,
        } => {
            let request = service.resolve_request(engine, from, to, Vec::new());
            let text = service
                .translate_text(
                    request.engine,
                    &request.source_lang,
                    &request.target_lang,
                    &text,
                )
                .await;
            RpcReply::Text { text }
        }
    }
}
