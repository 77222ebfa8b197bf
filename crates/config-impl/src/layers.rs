//! 分层配置栈与合并引擎

use arc_swap::ArcSwap;
use config_abstractions::{tree, ConfigError, ConfigResult, ConfigTree};
use std::sync::Arc;

/// 单个配置层
///
/// 一次加载产出的配置树与其出处描述的组合。
/// 除监控引擎对树单元的原子替换外，层创建后不可变。
#[derive(Debug)]
pub struct Layer {
    origin: String,
    tree: ArcSwap<ConfigTree>,
}

impl Layer {
    /// 创建新的配置层
    ///
    /// 层总是以共享引用的形式存在于配置栈中，监控引擎通过同一引用
    /// 对树单元执行原子替换。
    pub fn new(origin: impl Into<String>, tree: ConfigTree) -> Arc<Self> {
        Arc::new(Self {
            origin: origin.into(),
            tree: ArcSwap::new(Arc::new(tree)),
        })
    }

    /// 获取层的出处描述
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// 获取当前配置树快照
    ///
    /// 返回的 Arc 可在无锁前提下长期持有并读取。
    pub fn snapshot(&self) -> Arc<ConfigTree> {
        self.tree.load_full()
    }

    /// 原子替换配置树
    ///
    /// 仅替换树引用，层在栈中的位置与出处保持不变。
    pub(crate) fn replace(&self, next: ConfigTree) {
        self.tree.store(Arc::new(next));
    }
}

/// 分层配置
///
/// 有序的层栈：索引 0 为最早加载的基础层，末尾为最近加载的层。
/// 追加操作返回新的配置值，已有配置值的层序列永不被修改。
#[derive(Debug, Clone, Default)]
pub struct Configuration {
    layers: Vec<Arc<Layer>>,
}

impl Configuration {
    /// 创建空配置
    pub fn empty() -> Self {
        Self { layers: Vec::new() }
    }

    /// 追加一层并返回新的配置值
    pub fn append(&self, layer: Arc<Layer>) -> Self {
        let mut layers = self.layers.clone();
        layers.push(layer);
        Self { layers }
    }

    /// 获取层序列
    pub fn layers(&self) -> &[Arc<Layer>] {
        &self.layers
    }

    /// 按点分路径查找配置值
    ///
    /// 自最近加载的层向最早的层扫描，返回第一个包含该路径的层中的值；
    /// 所有层均不包含时返回 None。这是整个系统唯一的覆盖法则，
    /// 与层的数量和出处无关。
    pub fn get(&self, key: &str) -> Option<ConfigTree> {
        for layer in self.layers.iter().rev() {
            let snapshot = layer.snapshot();
            if let Some(value) = tree::lookup(&snapshot, key) {
                return Some(value.clone());
            }
        }
        None
    }

    /// 按点分路径查找字符串值
    pub fn get_string(&self, key: &str) -> Option<String> {
        self.get(key).map(|value| match value {
            ConfigTree::String(s) => s,
            other => other.to_string(),
        })
    }

    /// 检查配置是否包含指定路径
    pub fn contains(&self, key: &str) -> bool {
        self.layers
            .iter()
            .rev()
            .any(|layer| tree::contains(&layer.snapshot(), key))
    }

    /// 按点分路径查找并要求存在
    pub fn require(&self, key: &str) -> ConfigResult<ConfigTree> {
        self.get(key).ok_or_else(|| ConfigError::KeyNotFound {
            key: key.to_string(),
        })
    }
}
