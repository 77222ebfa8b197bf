//! 分层配置栈端到端测试
//!
//! 按固定顺序加载全部配置源，校验每一步快照处的覆盖结果。

use config_impl::{ConfigFormat, ConfigLoader, Configuration};
use serde_json::json;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

/// 十一步加载顺序下的合并法则
///
/// 同一个键在每个快照处的取值都等于该步骤加载的值。
#[tokio::test]
async fn merge_order_follows_load_sequence() {
    init_tracing();
    std::env::set_var("TYPE", "env");
    config_impl::props::set_property("type", "props");

    let loader = ConfigLoader::new();

    let config = loader.load_environment(&Configuration::empty());
    assert_eq!(config.get_string("type").as_deref(), Some("env"));

    let config = loader.load_properties(&config);
    assert_eq!(config.get_string("type").as_deref(), Some("props"));

    let config = loader
        .load_string(&config, ConfigFormat::Hocon, "type = \"conf\"")
        .unwrap();
    assert_eq!(config.get_string("type").as_deref(), Some("conf"));

    let config = loader
        .load_string(&config, ConfigFormat::Json, r#"{"type": "json"}"#)
        .unwrap();
    assert_eq!(config.get_string("type").as_deref(), Some("json"));

    let config = loader
        .load_string(&config, ConfigFormat::Properties, "type=properties")
        .unwrap();
    assert_eq!(config.get_string("type").as_deref(), Some("properties"));

    let config = loader
        .load_string(&config, ConfigFormat::Toml, "type = \"toml\"")
        .unwrap();
    assert_eq!(config.get_string("type").as_deref(), Some("toml"));

    let config = loader
        .load_string(
            &config,
            ConfigFormat::Xml,
            "<configuration><property><name>type</name><value>xml</value></property></configuration>",
        )
        .unwrap();
    assert_eq!(config.get_string("type").as_deref(), Some("xml"));

    let config = loader
        .load_string(&config, ConfigFormat::Yaml, "type: yaml")
        .unwrap();
    assert_eq!(config.get_string("type").as_deref(), Some("yaml"));

    let config = loader.load_flat_map(&config, [("type", "flat")]);
    assert_eq!(config.get_string("type").as_deref(), Some("flat"));

    let config = loader.load_kv_map(&config, [("type", "kv")]);
    assert_eq!(config.get_string("type").as_deref(), Some("kv"));

    let config = loader.load_tree(&config, json!({"type": "hierarchical"}));
    assert_eq!(config.get_string("type").as_deref(), Some("hierarchical"));

    assert_eq!(config.layers().len(), 11);
}

/// 环境变量命名约定的往返
#[tokio::test]
async fn environment_round_trip_yields_declared_value() {
    init_tracing();
    std::env::set_var("STRATA_CACHE_LIMIT", "4096");

    let loader = ConfigLoader::new();
    let config = loader.load_environment(&Configuration::empty());
    assert_eq!(config.get("strata.cache.limit"), Some(json!(4096)));
}

/// 系统属性读取最近设置的值
#[tokio::test]
async fn system_properties_return_most_recent_value() {
    init_tracing();
    config_impl::props::set_property("integration.props.round", "one");
    config_impl::props::set_property("integration.props.round", "two");

    let loader = ConfigLoader::new();
    let config = loader.load_properties(&Configuration::empty());
    assert_eq!(
        config.get_string("integration.props.round").as_deref(),
        Some("two")
    );
}

/// 不同格式的文件依次加载并相互覆盖
#[tokio::test]
async fn files_of_mixed_formats_layer_over_each_other() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();

    let toml_path = dir.path().join("base.toml");
    std::fs::write(&toml_path, "shared = \"toml\"\n\n[db]\nhost = \"a\"").unwrap();
    let yaml_path = dir.path().join("override.yaml");
    std::fs::write(&yaml_path, "shared: yaml").unwrap();

    let loader = ConfigLoader::new();
    let config = loader
        .load_file(&Configuration::empty(), &toml_path)
        .await
        .unwrap();
    let config = loader.load_file(&config, &yaml_path).await.unwrap();

    assert_eq!(config.get_string("shared").as_deref(), Some("yaml"));
    assert_eq!(config.get_string("db.host").as_deref(), Some("a"));
}
