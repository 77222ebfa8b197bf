//! 原始内容获取能力抽象

use crate::errors::ConfigResult;
use async_trait::async_trait;
use std::path::Path;
use url::Url;

/// 内容获取器 trait
///
/// 定义从文件系统与 HTTP 源读取原始字节的统一接口。
/// 监控引擎通过注入替代实现完成确定性测试。
#[async_trait]
pub trait ContentFetcher: Send + Sync {
    /// 读取文件全部字节
    async fn read_file(&self, path: &Path) -> ConfigResult<Vec<u8>>;

    /// 对 URL 执行 HTTP GET 并返回响应字节
    async fn http_get(&self, url: &Url) -> ConfigResult<Vec<u8>>;
}
