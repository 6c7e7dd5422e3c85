//! 日志配置

use infrastructure_common::InfrastructureError;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// 日志配置
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// 日志级别
    pub level: tracing::Level,
    /// 过滤指令，如 `di_impl=debug`；设置后优先于 `level`
    pub filter: Option<String>,
    /// 是否显示目标
    pub show_target: bool,
    /// 是否显示线程ID
    pub show_thread_ids: bool,
    /// 是否显示文件名
    pub show_file: bool,
    /// 是否显示行号
    pub show_line_number: bool,
    /// 是否使用 JSON 格式
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: tracing::Level::INFO,
            filter: None,
            show_target: true,
            show_thread_ids: false,
            show_file: false,
            show_line_number: false,
            json_format: false,
        }
    }
}

impl LoggingConfig {
    /// 创建开发环境日志配置
    pub fn development() -> Self {
        Self {
            level: tracing::Level::DEBUG,
            filter: None,
            show_target: true,
            show_thread_ids: true,
            show_file: true,
            show_line_number: true,
            json_format: false,
        }
    }

    /// 创建生产环境日志配置
    pub fn production() -> Self {
        Self {
            level: tracing::Level::INFO,
            filter: None,
            show_target: false,
            show_thread_ids: false,
            show_file: false,
            show_line_number: false,
            json_format: true,
        }
    }

    /// 设置过滤指令
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// 构造过滤器，未设置过滤指令时依次尝试 `RUST_LOG` 和日志级别
    pub fn env_filter(&self) -> Result<EnvFilter, InfrastructureError> {
        match &self.filter {
            Some(directives) => {
                EnvFilter::try_new(directives).map_err(|e| InfrastructureError::LoggingInitFailed {
                    message: format!("无效的过滤指令 '{}': {}", directives, e),
                })
            }
            None => Ok(EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(self.level.as_str().to_lowercase()))),
        }
    }

    /// 初始化全局日志订阅器
    pub fn init(&self) -> Result<(), InfrastructureError> {
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(self.env_filter()?)
            .with_target(self.show_target)
            .with_thread_ids(self.show_thread_ids)
            .with_file(self.show_file)
            .with_line_number(self.show_line_number);

        if self.json_format {
            subscriber.json().try_init()
        } else {
            subscriber.try_init()
        }
        .map_err(|e| InfrastructureError::LoggingInitFailed {
            message: e.to_string(),
        })?;

        info!("日志系统初始化完成");
        Ok(())
    }
}
