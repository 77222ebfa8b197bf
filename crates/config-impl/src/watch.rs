//! 配置监控引擎
//!
//! 每个监控持有一个专属的后台任务，按固定间隔重新获取并解析源内容，
//! 成功且内容变化时对所监控层的树单元执行一次原子替换；
//! 失败的周期保留旧树并继续调度。

use crate::formats::ConfigFormat;
use crate::layers::Layer;
use config_abstractions::{ConfigChangeEvent, ConfigResult, ContentFetcher};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// 变更事件通道容量
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// 被监控的配置源
#[derive(Debug, Clone)]
pub enum WatchSource {
    /// 本地文件
    File(PathBuf),
    /// 远程 URL
    Url(url::Url),
}

impl WatchSource {
    /// 获取源的出处描述
    pub fn origin(&self) -> String {
        match self {
            Self::File(path) => format!("file:{}", path.display()),
            Self::Url(url) => format!("url:{}", url),
        }
    }

    /// 重新获取源的原始内容
    pub(crate) async fn fetch(&self, fetcher: &dyn ContentFetcher) -> ConfigResult<Vec<u8>> {
        match self {
            Self::File(path) => fetcher.read_file(path).await,
            Self::Url(url) => fetcher.http_get(url).await,
        }
    }
}

/// 配置监控句柄
///
/// 持有取消令牌与所监控层的回引用。句柄被丢弃时监控随之取消，
/// 最后一次成功加载的配置树保持可见。
#[derive(Debug)]
pub struct WatchHandle {
    origin: String,
    token: CancellationToken,
    events: Option<mpsc::Receiver<ConfigChangeEvent>>,
    task: Option<JoinHandle<()>>,
    layer: Arc<Layer>,
}

impl WatchHandle {
    /// 获取监控源的出处描述
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// 取消监控
    ///
    /// 取消是协作式的：进行中的周期允许完成，但其结果不会再被应用。
    pub fn cancel(&self) {
        info!("取消配置监控: {}", self.origin);
        self.token.cancel();
    }

    /// 是否已取消
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// 取走变更事件接收器（只能取走一次）
    pub fn take_events(&mut self) -> Option<mpsc::Receiver<ConfigChangeEvent>> {
        self.events.take()
    }

    /// 获取被监控的层
    pub fn layer(&self) -> &Arc<Layer> {
        &self.layer
    }

    /// 取消监控并等待后台任务退出
    pub async fn stopped(mut self) {
        self.token.cancel();
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for WatchHandle {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

/// 启动监控后台任务
///
/// 未提供运行时上下文时任务落在当前运行时上；每个监控独占一个任务。
pub(crate) fn spawn_with_context(
    context: Option<&tokio::runtime::Handle>,
    fetcher: Arc<dyn ContentFetcher>,
    source: WatchSource,
    format: ConfigFormat,
    layer: Arc<Layer>,
    interval: Duration,
) -> WatchHandle {
    let origin = source.origin();
    let token = CancellationToken::new();
    let (sender, receiver) = mpsc::channel(EVENT_CHANNEL_CAPACITY);

    let looped = watch_loop(
        fetcher,
        source,
        format,
        Arc::clone(&layer),
        interval,
        token.clone(),
        sender,
    );
    let task = match context {
        Some(handle) => handle.spawn(looped),
        None => tokio::spawn(looped),
    };

    WatchHandle {
        origin,
        token,
        events: Some(receiver),
        task: Some(task),
        layer,
    }
}

/// 监控循环
///
/// 固定延迟调度：上一个周期完整结束后才开始计时下一个周期，
/// 同一层不存在并发写入者。
async fn watch_loop(
    fetcher: Arc<dyn ContentFetcher>,
    source: WatchSource,
    format: ConfigFormat,
    layer: Arc<Layer>,
    interval: Duration,
    token: CancellationToken,
    events: mpsc::Sender<ConfigChangeEvent>,
) {
    let origin = source.origin();
    debug!("配置监控循环启动: {} (间隔 {:?})", origin, interval);

    loop {
        tokio::select! {
            _ = token.cancelled() => break,
            _ = tokio::time::sleep(interval) => {}
        }

        let Some(event) = run_tick(&*fetcher, &source, format, &layer, &token, &origin).await
        else {
            break;
        };
        // 事件通道仅用于诊断，接收端滞后或缺席时允许丢弃
        let _ = events.try_send(event);
    }

    debug!("配置监控循环退出: {}", origin);
}

/// 执行一次重载周期
///
/// 返回 None 表示结果抵达前监控已被取消，不再提交。
async fn run_tick(
    fetcher: &dyn ContentFetcher,
    source: &WatchSource,
    format: ConfigFormat,
    layer: &Layer,
    token: &CancellationToken,
    origin: &str,
) -> Option<ConfigChangeEvent> {
    let parsed = match source.fetch(fetcher).await {
        Ok(content) => format.parse(&content, origin),
        Err(error) => Err(error),
    };

    match parsed {
        Ok(next) => {
            // 提交前再次确认未被取消
            if token.is_cancelled() {
                return None;
            }
            if *layer.snapshot() == next {
                debug!("配置内容未变化: {}", origin);
                Some(ConfigChangeEvent::unchanged(origin))
            } else {
                info!("配置内容已更新，执行原子替换: {}", origin);
                layer.replace(next);
                Some(ConfigChangeEvent::reloaded(origin))
            }
        }
        Err(error) => {
            warn!("配置重载周期失败，保留旧配置: {}: {}", origin, error);
            Some(ConfigChangeEvent::reload_failed(origin, error.to_string()))
        }
    }
}
