//! 配置变更事件定义

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 配置变更事件
///
/// 监控引擎每个重载周期产出一个事件，仅用于诊断与可观测性，
/// 不参与配置状态本身的变更。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigChangeEvent {
    /// 事件类型
    pub event_type: ConfigChangeEventType,
    /// 事件来源（层的出处描述）
    pub origin: String,
    /// 事件时间
    pub timestamp: DateTime<Utc>,
    /// 失败原因（仅失败事件携带）
    pub error: Option<String>,
}

impl ConfigChangeEvent {
    /// 创建重载成功事件
    pub fn reloaded(origin: impl Into<String>) -> Self {
        Self {
            event_type: ConfigChangeEventType::Reloaded,
            origin: origin.into(),
            timestamp: Utc::now(),
            error: None,
        }
    }

    /// 创建内容未变化事件
    pub fn unchanged(origin: impl Into<String>) -> Self {
        Self {
            event_type: ConfigChangeEventType::Unchanged,
            origin: origin.into(),
            timestamp: Utc::now(),
            error: None,
        }
    }

    /// 创建重载失败事件
    pub fn reload_failed(origin: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            event_type: ConfigChangeEventType::ReloadFailed,
            origin: origin.into(),
            timestamp: Utc::now(),
            error: Some(error.into()),
        }
    }
}

/// 配置变更事件类型
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ConfigChangeEventType {
    /// 重载成功并完成原子替换
    Reloaded,
    /// 内容未变化，未执行替换
    Unchanged,
    /// 获取或解析失败，保留旧配置
    ReloadFailed,
}
