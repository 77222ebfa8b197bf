//! 扩展名到格式提供者的调度表

use crate::formats::ConfigFormat;
use config_abstractions::{ConfigError, ConfigResult};
use std::collections::HashMap;
use tracing::debug;

/// 格式注册表
///
/// 实例级的扩展名调度表：每个加载门面持有自己的注册表，
/// 不存在进程级的全局映射。注册是唯一的变更路径，没有隐式移除。
#[derive(Debug, Clone)]
pub struct FormatRegistry {
    by_extension: HashMap<String, ConfigFormat>,
}

impl FormatRegistry {
    /// 创建带有内建映射的注册表
    pub fn new() -> Self {
        let mut registry = Self {
            by_extension: HashMap::new(),
        };
        registry.register("conf", ConfigFormat::Hocon);
        registry.register("hocon", ConfigFormat::Hocon);
        registry.register("json", ConfigFormat::Json);
        registry.register("properties", ConfigFormat::Properties);
        registry.register("toml", ConfigFormat::Toml);
        registry.register("xml", ConfigFormat::Xml);
        registry.register("yml", ConfigFormat::Yaml);
        registry.register("yaml", ConfigFormat::Yaml);
        registry
    }

    /// 注册或替换扩展名映射
    pub fn register(&mut self, extension: &str, format: ConfigFormat) {
        let key = normalize_extension(extension);
        debug!("注册扩展名映射: {} -> {}", key, format.name());
        self.by_extension.insert(key, format);
    }

    /// 按扩展名解析格式提供者（大小写不敏感）
    pub fn resolve(&self, extension: &str) -> ConfigResult<ConfigFormat> {
        let key = normalize_extension(extension);
        self.by_extension
            .get(&key)
            .copied()
            .ok_or_else(|| ConfigError::UnsupportedExtension {
                extension: extension.to_string(),
            })
    }

    /// 已注册的扩展名数量
    pub fn len(&self) -> usize {
        self.by_extension.len()
    }

    /// 注册表是否为空
    pub fn is_empty(&self) -> bool {
        self.by_extension.is_empty()
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// 归一化扩展名：去掉前导点并转为小写
fn normalize_extension(extension: &str) -> String {
    extension.trim_start_matches('.').to_ascii_lowercase()
}
