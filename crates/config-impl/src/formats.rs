//! 内建格式提供者
//!
//! 每种支持的格式对应一个封闭的枚举变体；新增格式意味着
//! 新增一个变体并在注册表中补充一条扩展名映射。

use config_abstractions::{coerce_scalar, insert_path, ConfigError, ConfigResult, ConfigTree};
use serde_json::{Map, Value};
use tracing::debug;

/// 配置格式提供者
///
/// 将某一格式的原始内容解析为统一的层级配置树。
/// 提供者自身无状态，可在所有加载操作间共享。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigFormat {
    /// HOCON 格式（支持注释与替换）
    Hocon,
    /// JSON 格式
    Json,
    /// Java Properties 平铺格式
    Properties,
    /// TOML 表格式
    Toml,
    /// Hadoop 风格的 XML property 文档
    Xml,
    /// YAML 映射文档
    Yaml,
}

impl ConfigFormat {
    /// 获取格式名称
    pub fn name(&self) -> &'static str {
        match self {
            Self::Hocon => "hocon",
            Self::Json => "json",
            Self::Properties => "properties",
            Self::Toml => "toml",
            Self::Xml => "xml",
            Self::Yaml => "yaml",
        }
    }

    /// 将原始内容解析为配置树
    pub fn parse(&self, content: &[u8], origin: &str) -> ConfigResult<ConfigTree> {
        debug!("解析配置内容: {} ({})", origin, self.name());
        match self {
            Self::Hocon => parse_hocon(content, origin),
            Self::Json => parse_json(content, origin),
            Self::Properties => parse_properties(content, origin),
            Self::Toml => parse_toml(content, origin),
            Self::Xml => parse_xml(content, origin),
            Self::Yaml => parse_yaml(content, origin),
        }
    }
}

impl std::fmt::Display for ConfigFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

fn utf8_content<'a>(content: &'a [u8], origin: &str) -> ConfigResult<&'a str> {
    std::str::from_utf8(content).map_err(|e| ConfigError::parse_failure(origin, e))
}

fn parse_json(content: &[u8], origin: &str) -> ConfigResult<ConfigTree> {
    serde_json::from_slice(content).map_err(|e| ConfigError::parse_failure(origin, e))
}

fn parse_yaml(content: &[u8], origin: &str) -> ConfigResult<ConfigTree> {
    serde_yaml::from_slice(content).map_err(|e| ConfigError::parse_failure(origin, e))
}

fn parse_toml(content: &[u8], origin: &str) -> ConfigResult<ConfigTree> {
    let text = utf8_content(content, origin)?;
    let value: toml::Value =
        toml::from_str(text).map_err(|e| ConfigError::parse_failure(origin, e))?;
    Ok(toml_to_tree(&value))
}

/// 将 TOML 值转换为配置树节点
fn toml_to_tree(value: &toml::Value) -> ConfigTree {
    match value {
        toml::Value::String(s) => Value::String(s.clone()),
        toml::Value::Integer(i) => Value::Number((*i).into()),
        toml::Value::Float(f) => Value::Number(
            serde_json::Number::from_f64(*f).unwrap_or_else(|| serde_json::Number::from(0)),
        ),
        toml::Value::Boolean(b) => Value::Bool(*b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(items) => Value::Array(items.iter().map(toml_to_tree).collect()),
        toml::Value::Table(table) => Value::Object(
            table
                .iter()
                .map(|(key, child)| (key.clone(), toml_to_tree(child)))
                .collect(),
        ),
    }
}

fn parse_hocon(content: &[u8], origin: &str) -> ConfigResult<ConfigTree> {
    let text = utf8_content(content, origin)?;
    let document = hocon::HoconLoader::new()
        .load_str(text)
        .and_then(|loader| loader.hocon())
        .map_err(|e| ConfigError::parse_failure(origin, e.to_string()))?;
    hocon_to_tree(&document, origin)
}

/// 将 HOCON 值转换为配置树节点
fn hocon_to_tree(value: &hocon::Hocon, origin: &str) -> ConfigResult<ConfigTree> {
    use hocon::Hocon;

    Ok(match value {
        Hocon::String(s) => Value::String(s.clone()),
        Hocon::Integer(i) => Value::Number((*i).into()),
        Hocon::Real(f) => Value::Number(
            serde_json::Number::from_f64(*f).unwrap_or_else(|| serde_json::Number::from(0)),
        ),
        Hocon::Boolean(b) => Value::Bool(*b),
        Hocon::Null => Value::Null,
        Hocon::Array(items) => Value::Array(
            items
                .iter()
                .map(|child| hocon_to_tree(child, origin))
                .collect::<ConfigResult<_>>()?,
        ),
        Hocon::Hash(entries) => {
            let mut map = Map::new();
            for (key, child) in entries {
                map.insert(key.clone(), hocon_to_tree(child, origin)?);
            }
            Value::Object(map)
        }
        Hocon::BadValue(error) => {
            return Err(ConfigError::parse_failure(origin, error.to_string()))
        }
    })
}

fn parse_properties(content: &[u8], origin: &str) -> ConfigResult<ConfigTree> {
    let entries =
        java_properties::read(content).map_err(|e| ConfigError::parse_failure(origin, e))?;
    Ok(config_abstractions::from_flat_pairs(entries))
}

/// 解析 Hadoop 风格的 `<property><name>/<value></property>` 文档
///
/// property 的 name 本身是点分路径，按层级展开进入配置树。
fn parse_xml(content: &[u8], origin: &str) -> ConfigResult<ConfigTree> {
    use quick_xml::events::Event;

    enum Field {
        Name,
        Value,
    }

    let text = utf8_content(content, origin)?;
    let mut reader = quick_xml::Reader::from_str(text);

    let mut root = Value::Object(Map::new());
    let mut field: Option<Field> = None;
    let mut name: Option<String> = None;
    let mut value: Option<String> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(start)) => match start.name().as_ref() {
                b"property" => {
                    name = None;
                    value = None;
                }
                b"name" => field = Some(Field::Name),
                b"value" => {
                    value = Some(String::new());
                    field = Some(Field::Value);
                }
                _ => field = None,
            },
            Ok(Event::Text(chunk)) => {
                let unescaped = chunk
                    .unescape()
                    .map_err(|e| ConfigError::parse_failure(origin, e))?;
                let trimmed = unescaped.trim();
                if !trimmed.is_empty() {
                    match field {
                        Some(Field::Name) => name = Some(trimmed.to_string()),
                        Some(Field::Value) => value = Some(trimmed.to_string()),
                        None => {}
                    }
                }
            }
            Ok(Event::End(end)) => match end.name().as_ref() {
                b"property" => {
                    if let (Some(key), Some(raw)) = (name.take(), value.take()) {
                        insert_path(&mut root, &key, coerce_scalar(&raw));
                    }
                }
                b"name" | b"value" => field = None,
                _ => {}
            },
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(error) => return Err(ConfigError::parse_failure(origin, error)),
        }
    }

    Ok(root)
}
