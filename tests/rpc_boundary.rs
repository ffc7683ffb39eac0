//! 请求边界集成测试
//!
//! 验证通道式RPC的消息契约：批次请求进、结果映射出，
//! 缺省字段补全，错误不以异常形态越过边界。

use std::sync::atomic::Ordering;
use std::sync::Arc;

use dualtrans::rpc::{self, RpcPayload, RpcReply};
use dualtrans::{Engine, Fragment};

mod common;

use common::{fragments, service_with, StubBulk, StubSimple};

#[tokio::test]
async fn test_translate_batch_over_channel() {
    let simple = StubSimple::answering(&[("Hello", "你好"), ("World", "世界")]);
    let client = rpc::spawn(service_with(StubBulk::failing(), simple));

    let out = client
        .translate_batch(
            Some(Engine::Simple),
            Some("en".to_string()),
            Some("zh".to_string()),
            fragments(&[("a", "Hello"), ("b", "World")]),
        )
        .await
        .unwrap();

    assert_eq!(out.get("a"), Some(&"你好".to_string()));
    assert_eq!(out.get("b"), Some(&"世界".to_string()));
}

#[tokio::test]
async fn test_translate_text_over_channel() {
    let simple = StubSimple::answering(&[("Hello", "你好")]);
    let client = rpc::spawn(service_with(StubBulk::failing(), simple));

    let text = client
        .translate_text(
            Some(Engine::Simple),
            Some("en".to_string()),
            Some("zh".to_string()),
            "Hello",
        )
        .await
        .unwrap();

    assert_eq!(text, "你好");
}

/// 缺省字段由服务侧补全：引擎simple、语言对en→zh，批量提供方不被触碰
#[tokio::test]
async fn test_defaults_applied_at_boundary() {
    let bulk = StubBulk::answering(&[]);
    let simple = StubSimple::answering(&[("Hello", "你好")]);
    let bulk_calls = Arc::clone(&bulk.calls);
    let seen = Arc::clone(&simple.seen);
    let client = rpc::spawn(service_with(bulk, simple));

    let text = client.translate_text(None, None, None, "Hello").await.unwrap();

    assert_eq!(text, "你好");
    assert_eq!(bulk_calls.load(Ordering::Relaxed), 0, "default engine is simple");
    let seen = seen.lock().unwrap();
    assert_eq!(seen[0].1, "en", "default source lang");
    assert_eq!(seen[0].2, "zh", "default target lang");
}

/// 空items缺省为空批次：应答是空映射而不是错误
#[tokio::test]
async fn test_missing_items_yield_empty_mapping() {
    let client = rpc::spawn(service_with(StubBulk::failing(), StubSimple::empty()));

    let payload: RpcPayload = serde_json::from_str(r#"{"type":"translate_batch"}"#).unwrap();
    match client.request(payload).await.unwrap() {
        RpcReply::Batch(mapping) => assert!(mapping.is_empty()),
        RpcReply::Text { .. } => panic!("batch request answered with text reply"),
    }
}

/// 失败只表现为数据：词表未命中的文本得到空串应答，没有错误通道
#[tokio::test]
async fn test_failure_is_observable_only_as_data() {
    let client = rpc::spawn(service_with(StubBulk::failing(), StubSimple::empty()));

    let text = client
        .translate_text(
            Some(Engine::Simple),
            Some("en".to_string()),
            Some("zh".to_string()),
            "anything",
        )
        .await
        .unwrap();

    assert_eq!(text, "", "per-item failure surfaces as empty text, never as an error");
}

/// 客户端可克隆，多个调用方并发请求同一服务任务
#[tokio::test]
async fn test_cloned_clients_run_concurrently() {
    let simple = StubSimple::answering(&[("Hello", "你好"), ("World", "世界")]);
    let client = rpc::spawn(service_with(StubBulk::failing(), simple));

    let first = {
        let client = client.clone();
        tokio::spawn(async move {
            client
                .translate_text(
                    Some(Engine::Simple),
                    Some("en".to_string()),
                    Some("zh".to_string()),
                    "Hello",
                )
                .await
                .unwrap()
        })
    };
    let second = {
        let client = client.clone();
        tokio::spawn(async move {
            client
                .translate_batch(
                    Some(Engine::Simple),
                    Some("en".to_string()),
                    Some("zh".to_string()),
                    vec![Fragment::new("w", "World")],
                )
                .await
                .unwrap()
        })
    };

    assert_eq!(first.await.unwrap(), "你好");
    assert_eq!(
        second.await.unwrap().get("w"),
        Some(&"世界".to_string())
    );
}
