//! 配置源加载门面

use crate::fetcher::SystemContentFetcher;
use crate::formats::ConfigFormat;
use crate::layers::{Configuration, Layer};
use crate::mapping;
use crate::props;
use crate::registry::FormatRegistry;
use crate::watch::{self, WatchHandle, WatchSource};
use config_abstractions::{
    from_flat_pairs, from_kv_pairs, ConfigError, ConfigResult, ConfigTree, ContentFetcher,
};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use url::Url;

/// 配置加载门面
///
/// 统一的配置源入口：通过实例级注册表调度格式提供者，将每个源解析出的
/// 配置树包装为带出处的层并追加到配置栈顶。
pub struct ConfigLoader {
    registry: FormatRegistry,
    fetcher: Arc<dyn ContentFetcher>,
}

impl std::fmt::Debug for ConfigLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigLoader")
            .field("registry", &self.registry)
            .finish()
    }
}

impl ConfigLoader {
    /// 创建使用默认内容获取器的加载门面
    pub fn new() -> Self {
        Self::with_fetcher(Arc::new(SystemContentFetcher::new()))
    }

    /// 创建使用指定内容获取器的加载门面
    pub fn with_fetcher(fetcher: Arc<dyn ContentFetcher>) -> Self {
        Self {
            registry: FormatRegistry::new(),
            fetcher,
        }
    }

    /// 注册或替换扩展名到格式提供者的映射
    pub fn register_extension(&mut self, extension: &str, format: ConfigFormat) {
        self.registry.register(extension, format);
    }

    /// 获取扩展名注册表
    pub fn registry(&self) -> &FormatRegistry {
        &self.registry
    }

    /// 加载环境变量快照
    pub fn load_environment(&self, config: &Configuration) -> Configuration {
        info!("加载环境变量配置层");
        config.append(Layer::new("env", mapping::environment_tree()))
    }

    /// 加载系统属性快照
    pub fn load_properties(&self, config: &Configuration) -> Configuration {
        info!("加载系统属性配置层");
        config.append(Layer::new(
            "props",
            mapping::properties_tree(props::snapshot()),
        ))
    }

    /// 以显式格式解析内存中的字符串
    pub fn load_string(
        &self,
        config: &Configuration,
        format: ConfigFormat,
        content: &str,
    ) -> ConfigResult<Configuration> {
        let origin = format!("string:{}", format.name());
        let tree = format.parse(content.as_bytes(), &origin)?;
        Ok(config.append(Layer::new(origin, tree)))
    }

    /// 直接加载层级配置树
    pub fn load_tree(&self, config: &Configuration, tree: ConfigTree) -> Configuration {
        config.append(Layer::new("tree", tree))
    }

    /// 加载点分平铺键值映射（键中的点向下展开层级）
    pub fn load_flat_map<I, K, V>(&self, config: &Configuration, pairs: I) -> Configuration
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        config.append(Layer::new("flat-map", from_flat_pairs(pairs)))
    }

    /// 加载字面键值映射（键按原样作为单层键）
    pub fn load_kv_map<I, K, V>(&self, config: &Configuration, pairs: I) -> Configuration
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        config.append(Layer::new("kv-map", from_kv_pairs(pairs)))
    }

    /// 从文件加载（按扩展名调度格式）
    pub async fn load_file(
        &self,
        config: &Configuration,
        path: impl AsRef<Path>,
    ) -> ConfigResult<Configuration> {
        let path = path.as_ref();
        let format = self.registry.resolve(&file_extension(path)?)?;
        self.load_file_as(config, path, format).await
    }

    /// 从文件加载（显式格式优先于扩展名调度）
    pub async fn load_file_as(
        &self,
        config: &Configuration,
        path: impl AsRef<Path>,
        format: ConfigFormat,
    ) -> ConfigResult<Configuration> {
        let path = path.as_ref();
        let origin = format!("file:{}", path.display());
        info!("加载配置文件层: {}", origin);
        let content = self.fetcher.read_file(path).await?;
        let tree = format.parse(&content, &origin)?;
        Ok(config.append(Layer::new(origin, tree)))
    }

    /// 从 URL 加载（按路径后缀调度格式）
    pub async fn load_url(&self, config: &Configuration, url: &Url) -> ConfigResult<Configuration> {
        let format = self.registry.resolve(&url_extension(url)?)?;
        self.load_url_as(config, url, format).await
    }

    /// 从 URL 加载（显式格式优先于后缀调度）
    pub async fn load_url_as(
        &self,
        config: &Configuration,
        url: &Url,
        format: ConfigFormat,
    ) -> ConfigResult<Configuration> {
        let origin = format!("url:{}", url);
        info!("加载配置 URL 层: {}", origin);
        let content = self.fetcher.http_get(url).await?;
        let tree = format.parse(&content, &origin)?;
        Ok(config.append(Layer::new(origin, tree)))
    }

    /// 监控文件：同步完成首次加载，之后按固定间隔重载
    pub async fn watch_file(
        &self,
        config: &Configuration,
        path: impl AsRef<Path>,
        interval: Duration,
    ) -> ConfigResult<(Configuration, WatchHandle)> {
        let path = path.as_ref().to_path_buf();
        let format = self.registry.resolve(&file_extension(&path)?)?;
        self.watch_source(config, WatchSource::File(path), format, interval, None)
            .await
    }

    /// 监控文件，并在调用方提供的运行时上调度重载任务
    pub async fn watch_file_on(
        &self,
        context: &tokio::runtime::Handle,
        config: &Configuration,
        path: impl AsRef<Path>,
        interval: Duration,
    ) -> ConfigResult<(Configuration, WatchHandle)> {
        let path = path.as_ref().to_path_buf();
        let format = self.registry.resolve(&file_extension(&path)?)?;
        self.watch_source(
            config,
            WatchSource::File(path),
            format,
            interval,
            Some(context),
        )
        .await
    }

    /// 监控 URL：同步完成首次加载，之后按固定间隔重载
    pub async fn watch_url(
        &self,
        config: &Configuration,
        url: &Url,
        interval: Duration,
    ) -> ConfigResult<(Configuration, WatchHandle)> {
        let format = self.registry.resolve(&url_extension(url)?)?;
        self.watch_source(
            config,
            WatchSource::Url(url.clone()),
            format,
            interval,
            None,
        )
        .await
    }

    /// 监控 URL，并在调用方提供的运行时上调度重载任务
    pub async fn watch_url_on(
        &self,
        context: &tokio::runtime::Handle,
        config: &Configuration,
        url: &Url,
        interval: Duration,
    ) -> ConfigResult<(Configuration, WatchHandle)> {
        let format = self.registry.resolve(&url_extension(url)?)?;
        self.watch_source(
            config,
            WatchSource::Url(url.clone()),
            format,
            interval,
            Some(context),
        )
        .await
    }

    async fn watch_source(
        &self,
        config: &Configuration,
        source: WatchSource,
        format: ConfigFormat,
        interval: Duration,
        context: Option<&tokio::runtime::Handle>,
    ) -> ConfigResult<(Configuration, WatchHandle)> {
        let origin = source.origin();
        info!("启动配置监控层: {} (间隔 {:?})", origin, interval);

        let content = source.fetch(self.fetcher.as_ref()).await?;
        let tree = format.parse(&content, &origin)?;
        let layer = Layer::new(origin, tree);

        let next = config.append(Arc::clone(&layer));
        let handle = watch::spawn_with_context(
            context,
            Arc::clone(&self.fetcher),
            source,
            format,
            layer,
            interval,
        );
        Ok((next, handle))
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// 从文件路径推导扩展名
fn file_extension(path: &Path) -> ConfigResult<String> {
    path.extension()
        .and_then(|extension| extension.to_str())
        .map(str::to_string)
        .ok_or_else(|| ConfigError::UnsupportedExtension {
            extension: path.to_string_lossy().to_string(),
        })
}

/// 从 URL 路径后缀推导扩展名
fn url_extension(url: &Url) -> ConfigResult<String> {
    let path = url.path();
    path.rsplit_once('.')
        .map(|(_, extension)| extension.to_string())
        .filter(|extension| !extension.is_empty() && !extension.contains('/'))
        .ok_or_else(|| ConfigError::UnsupportedExtension {
            extension: path.to_string(),
        })
}
