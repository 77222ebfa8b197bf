//! 进程级系统属性存储
//!
//! 对应 JVM 系统属性的进程级键值环境：写入即时生效，
//! 加载器在加载时读取时间点快照。

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::collections::HashMap;

static PROPERTIES: Lazy<RwLock<HashMap<String, String>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

/// 设置系统属性
pub fn set_property(key: impl Into<String>, value: impl Into<String>) {
    PROPERTIES.write().insert(key.into(), value.into());
}

/// 读取系统属性
pub fn property(key: &str) -> Option<String> {
    PROPERTIES.read().get(key).cloned()
}

/// 移除系统属性
pub fn remove_property(key: &str) -> Option<String> {
    PROPERTIES.write().remove(key)
}

/// 获取全部系统属性的时间点快照
pub fn snapshot() -> HashMap<String, String> {
    PROPERTIES.read().clone()
}
