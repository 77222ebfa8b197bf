//! 错误类型定义

use thiserror::Error;

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("不支持的配置扩展名: {extension}")]
    UnsupportedExtension { extension: String },

    #[error("配置源加载失败: {origin}: {source}")]
    LoadFailure {
        origin: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("配置内容解析失败: {origin}: {source}")]
    ParseFailure {
        origin: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("配置键不存在: {key}")]
    KeyNotFound { key: String },

    #[error("配置监控失败: {message}")]
    WatchError { message: String },
}

impl ConfigError {
    /// 创建加载失败错误
    pub fn load_failure(
        origin: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::LoadFailure {
            origin: origin.into(),
            source: source.into(),
        }
    }

    /// 创建解析失败错误
    pub fn parse_failure(
        origin: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::ParseFailure {
            origin: origin.into(),
            source: source.into(),
        }
    }
}

/// 结果类型别名
pub type ConfigResult<T> = Result<T, ConfigError>;
