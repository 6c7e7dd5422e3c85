//! 应用主入口

use crate::builder::ApplicationBuilder;
use config_impl::ReplaceProperties;
use di_impl::Container;
use infrastructure_common::DependencyError;
use std::sync::Arc;
use tracing::{info, warn};

/// 应用
///
/// 持有启动完成的容器和生效的组件替换配置。
#[derive(Debug)]
pub struct Application {
    /// 依赖注入容器
    container: Arc<Container>,
    /// 组件替换配置
    properties: ReplaceProperties,
}

impl Application {
    /// 创建应用构建器
    pub fn builder() -> ApplicationBuilder {
        ApplicationBuilder::new()
    }

    pub(crate) fn new(container: Arc<Container>, properties: ReplaceProperties) -> Self {
        Self {
            container,
            properties,
        }
    }

    pub fn container(&self) -> Arc<Container> {
        self.container.clone()
    }

    pub fn properties(&self) -> &ReplaceProperties {
        &self.properties
    }

    /// 按名称解析服务
    pub fn resolve<T: ?Sized + Send + Sync + 'static>(
        &self,
        name: &str,
    ) -> Result<Arc<T>, DependencyError> {
        self.container.resolve::<T>(name)
    }

    /// 按类型解析唯一的服务
    pub fn resolve_by_type<T: ?Sized + Send + Sync + 'static>(
        &self,
    ) -> Result<Arc<T>, DependencyError> {
        self.container.resolve_by_type::<T>()
    }

    /// 替换报告
    pub fn replacement_report(&self) -> String {
        self.container.replacement_report()
    }

    /// 记录尚未实例化的替换实现
    pub fn report_pending_replacements(&self) -> Vec<String> {
        let pending = self.container.pending_replacements();
        if pending.is_empty() {
            info!("所有替换实现均已实例化");
        } else {
            for replacement in &pending {
                warn!("替换实现尚未实例化: {}", replacement);
            }
        }
        pending
    }
}
