//! 默认内容获取器实现

use async_trait::async_trait;
use config_abstractions::{ConfigError, ConfigResult, ContentFetcher};
use std::path::Path;
use tracing::debug;
use url::Url;

/// 系统内容获取器
///
/// 通过本地文件系统与 reqwest HTTP 客户端获取原始内容。
/// 单次获取没有额外的超时，有界延迟由调用方在 I/O 层配置。
#[derive(Debug, Default)]
pub struct SystemContentFetcher {
    client: reqwest::Client,
}

impl SystemContentFetcher {
    /// 创建新的系统内容获取器
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl ContentFetcher for SystemContentFetcher {
    async fn read_file(&self, path: &Path) -> ConfigResult<Vec<u8>> {
        debug!("读取配置文件: {}", path.display());
        std::fs::read(path)
            .map_err(|e| ConfigError::load_failure(format!("file:{}", path.display()), e))
    }

    async fn http_get(&self, url: &Url) -> ConfigResult<Vec<u8>> {
        debug!("请求配置 URL: {}", url);
        let origin = format!("url:{}", url);
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| ConfigError::load_failure(origin.clone(), e))?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ConfigError::load_failure(origin, e))?;
        Ok(bytes.to_vec())
    }
}
