//! 统一配置树与点分路径工具

use serde_json::{Map, Value};

/// 配置树类型
///
/// 所有格式提供者统一产出 JSON 形态的层级树（标量、数组或映射），
/// 合并引擎因此与具体格式无关。每次解析都构造全新的树，树本身从不被原地修改。
pub type ConfigTree = serde_json::Value;

/// 按点分路径查找配置树节点
///
/// 每个点分段向下进入一层映射；路径中途遇到非映射节点即视为不包含。
pub fn lookup<'a>(tree: &'a ConfigTree, path: &str) -> Option<&'a ConfigTree> {
    let mut current = tree;
    for segment in path.split('.') {
        match current {
            Value::Object(map) => current = map.get(segment)?,
            _ => return None,
        }
    }
    Some(current)
}

/// 检查配置树是否包含指定路径
pub fn contains(tree: &ConfigTree, path: &str) -> bool {
    lookup(tree, path).is_some()
}

/// 将值插入配置树的点分路径处
///
/// 冲突规则是固定的：中间节点若为标量则替换为映射（深层结构优先）；
/// 末端已存在映射时标量不覆盖。
pub fn insert_path(root: &mut ConfigTree, path: &str, value: ConfigTree) {
    if !root.is_object() {
        *root = Value::Object(Map::new());
    }
    let segments: Vec<&str> = path.split('.').collect();
    insert_segments(root, &segments, value);
}

fn insert_segments(node: &mut ConfigTree, segments: &[&str], value: ConfigTree) {
    let Value::Object(map) = node else { return };
    let [head, rest @ ..] = segments else { return };

    if rest.is_empty() {
        match map.get(*head) {
            Some(Value::Object(_)) if !value.is_object() => {}
            _ => {
                map.insert((*head).to_string(), value);
            }
        }
        return;
    }

    let child = map
        .entry((*head).to_string())
        .or_insert_with(|| Value::Object(Map::new()));
    if !child.is_object() {
        *child = Value::Object(Map::new());
    }
    insert_segments(child, rest, value);
}

/// 将平铺的点分键值对展开为层级配置树
///
/// 键按字典序插入，保证与来源的枚举顺序无关。
pub fn from_flat_pairs<I, K, V>(pairs: I) -> ConfigTree
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    let mut entries: Vec<(String, String)> = pairs
        .into_iter()
        .map(|(key, value)| (key.into(), value.into()))
        .collect();
    entries.sort();

    let mut root = Value::Object(Map::new());
    for (key, value) in entries {
        insert_path(&mut root, &key, coerce_scalar(&value));
    }
    root
}

/// 将键值对按字面键构造单层配置树
///
/// 与 [`from_flat_pairs`] 不同，键中的点不展开层级。
pub fn from_kv_pairs<I, K, V>(pairs: I) -> ConfigTree
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    let mut map = Map::new();
    for (key, value) in pairs {
        map.insert(key.into(), coerce_scalar(&value.into()));
    }
    Value::Object(map)
}

/// 将字符串值转换为最贴近的标量类型
///
/// 依次尝试布尔、整数、浮点，均失败时保留字符串。
pub fn coerce_scalar(raw: &str) -> ConfigTree {
    if let Ok(boolean) = raw.parse::<bool>() {
        return Value::Bool(boolean);
    }
    if let Ok(integer) = raw.parse::<i64>() {
        return Value::Number(integer.into());
    }
    if let Ok(float) = raw.parse::<f64>() {
        if let Some(number) = serde_json::Number::from_f64(float) {
            return Value::Number(number);
        }
    }
    Value::String(raw.to_string())
}
