//! 配置监控端到端测试
//!
//! 使用真实时间与 wiremock 远端，通过事件通道而非休眠来同步断言时机。

use config_abstractions::{ConfigChangeEvent, ConfigChangeEventType};
use config_impl::{ConfigLoader, Configuration};
use std::time::Duration;
use tokio::sync::mpsc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const INTERVAL: Duration = Duration::from_millis(50);
const WAIT_LIMIT: Duration = Duration::from_secs(10);

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

/// 在超时前等待下一个指定类型的事件
async fn wait_for(
    receiver: &mut mpsc::Receiver<ConfigChangeEvent>,
    event_type: ConfigChangeEventType,
) -> ConfigChangeEvent {
    tokio::time::timeout(WAIT_LIMIT, async {
        loop {
            let event = receiver.recv().await.expect("事件通道不应关闭");
            if event.event_type == event_type {
                return event;
            }
        }
    })
    .await
    .expect("应在超时前收到事件")
}

/// URL 监控在远端响应变化后完成热替换
#[tokio::test]
async fn watch_url_swaps_after_remote_change() {
    init_tracing();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/app.json"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(r#"{"remote": {"value": "v1"}}"#),
        )
        .mount(&server)
        .await;

    let loader = ConfigLoader::new();
    let url = url::Url::parse(&format!("{}/app.json", server.uri())).unwrap();
    let (config, mut handle) = loader
        .watch_url(&Configuration::empty(), &url, INTERVAL)
        .await
        .unwrap();
    let mut events = handle.take_events().unwrap();

    assert_eq!(config.get_string("remote.value").as_deref(), Some("v1"));

    // 替换远端响应内容
    server.reset().await;
    Mock::given(method("GET"))
        .and(path("/app.json"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(r#"{"remote": {"value": "v2"}}"#),
        )
        .mount(&server)
        .await;

    wait_for(&mut events, ConfigChangeEventType::Reloaded).await;
    assert_eq!(config.get_string("remote.value").as_deref(), Some("v2"));

    handle.cancel();
}

/// 远端故障期间保留旧值，恢复后自愈
#[tokio::test]
async fn watch_url_retains_value_during_outage() {
    init_tracing();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/app.json"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(r#"{"remote": {"value": "stable"}}"#),
        )
        .mount(&server)
        .await;

    let loader = ConfigLoader::new();
    let url = url::Url::parse(&format!("{}/app.json", server.uri())).unwrap();
    let (config, mut handle) = loader
        .watch_url(&Configuration::empty(), &url, INTERVAL)
        .await
        .unwrap();
    let mut events = handle.take_events().unwrap();

    // 远端开始返回 500
    server.reset().await;
    Mock::given(method("GET"))
        .and(path("/app.json"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let failed = wait_for(&mut events, ConfigChangeEventType::ReloadFailed).await;
    assert!(failed.error.is_some());
    assert_eq!(config.get_string("remote.value").as_deref(), Some("stable"));

    // 远端恢复
    server.reset().await;
    Mock::given(method("GET"))
        .and(path("/app.json"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(r#"{"remote": {"value": "healed"}}"#),
        )
        .mount(&server)
        .await;

    wait_for(&mut events, ConfigChangeEventType::Reloaded).await;
    assert_eq!(config.get_string("remote.value").as_deref(), Some("healed"));

    handle.cancel();
}

/// 被监控层原位替换，其上的覆盖层保持优先
#[tokio::test]
async fn layers_above_watched_layer_keep_priority() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let file_path = dir.path().join("base.properties");
    std::fs::write(&file_path, "shared=watched\nwatch.only=first").unwrap();

    let loader = ConfigLoader::new();
    let (config, mut handle) = loader
        .watch_file(&Configuration::empty(), &file_path, INTERVAL)
        .await
        .unwrap();
    let config = loader.load_kv_map(&config, [("shared", "override")]);
    let mut events = handle.take_events().unwrap();

    assert_eq!(config.get_string("shared").as_deref(), Some("override"));
    assert_eq!(config.get_string("watch.only").as_deref(), Some("first"));

    std::fs::write(&file_path, "shared=watched\nwatch.only=second").unwrap();
    wait_for(&mut events, ConfigChangeEventType::Reloaded).await;

    // 栈结构不变：交换只发生在被监控层的树单元上
    assert_eq!(config.get_string("shared").as_deref(), Some("override"));
    assert_eq!(config.get_string("watch.only").as_deref(), Some("second"));

    handle.cancel();
}
