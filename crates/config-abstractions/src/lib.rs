//! # Configuration Abstractions
//!
//! 配置加载抽象层，定义分层配置引擎的共享契约。
//!
//! ## 核心内容
//!
//! - [`ConfigError`] - 配置错误分类
//! - [`ConfigTree`] - 统一配置树与点分路径工具
//! - [`ContentFetcher`] - 原始内容获取能力
//! - [`ConfigChangeEvent`] - 配置变更事件

pub mod errors;
pub mod events;
pub mod fetch;
pub mod tree;

pub use errors::*;
pub use events::*;
pub use fetch::*;
pub use tree::*;
