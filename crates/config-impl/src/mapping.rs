//! 环境变量与系统属性的键名映射

use config_abstractions::{from_flat_pairs, ConfigTree};

/// 将环境变量键转换为点分配置路径
///
/// 约定是固定的：键整体转为小写，分隔符 `_` 逐一转换为 `.`。
/// 例如 `DATABASE_HOST` 映射为 `database.host`。
pub fn env_key_to_path(env_key: &str) -> String {
    env_key.replace('_', ".").to_lowercase()
}

/// 采集环境变量快照并展开为配置树
///
/// 快照是时间点读取，进程后续的环境变更不会反映到已加载的层。
pub fn environment_tree() -> ConfigTree {
    from_flat_pairs(std::env::vars().map(|(key, value)| (env_key_to_path(&key), value)))
}

/// 将系统属性快照展开为配置树
///
/// 系统属性键本身即为点分路径，按原样使用。
pub fn properties_tree(snapshot: impl IntoIterator<Item = (String, String)>) -> ConfigTree {
    from_flat_pairs(snapshot)
}
