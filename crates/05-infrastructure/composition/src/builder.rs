//! 应用构建器

use crate::application::Application;
use crate::logging::LoggingConfig;
use config_impl::{ReplaceProperties, ReplacePropertiesBinder};
use di_abstractions::{ContainerConfig, RegistrationSource};
use di_impl::{CatalogSource, ContainerBuilder};
use infrastructure_common::{
    replacement_catalog, ComponentError, InfrastructureError, ReplacementCatalog,
};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// 应用构建器
///
/// 组合配置绑定、日志、替换目录扫描和容器构建。
pub struct ApplicationBuilder {
    /// 配置绑定器
    binder: ReplacePropertiesBinder,
    /// 直接指定的配置，设置后不再绑定
    properties: Option<ReplaceProperties>,
    /// 替换目录
    catalog: Arc<ReplacementCatalog>,
    /// 容器构建器
    container: ContainerBuilder,
    /// 日志配置，为空时不初始化日志
    logging: Option<LoggingConfig>,
    /// 是否预实例化单例
    pre_instantiate_singletons: bool,
}

impl ApplicationBuilder {
    /// 创建新的应用构建器
    pub fn new() -> Self {
        Self {
            binder: ReplacePropertiesBinder::new(),
            properties: None,
            catalog: replacement_catalog(),
            container: ContainerBuilder::new(),
            logging: None,
            pre_instantiate_singletons: true,
        }
    }

    /// 添加配置文件
    pub fn add_config_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self, InfrastructureError> {
        let path = path.as_ref();
        info!("添加配置文件: {}", path.display());
        self.binder = self.binder.add_file(path)?;
        Ok(self)
    }

    /// 设置配置绑定器
    pub fn with_binder(mut self, binder: ReplacePropertiesBinder) -> Self {
        self.binder = binder;
        self
    }

    /// 直接指定组件替换配置
    pub fn with_properties(mut self, properties: ReplaceProperties) -> Self {
        self.properties = Some(properties);
        self
    }

    /// 设置替换目录，默认使用全局目录
    pub fn with_catalog(mut self, catalog: Arc<ReplacementCatalog>) -> Self {
        self.catalog = catalog;
        self
    }

    /// 配置日志
    pub fn with_logging(mut self, config: LoggingConfig) -> Self {
        self.logging = Some(config);
        self
    }

    /// 关闭单例预实例化
    pub fn lazy_singletons(mut self) -> Self {
        self.pre_instantiate_singletons = false;
        self
    }

    /// 注册服务
    pub fn configure<F>(mut self, configure: F) -> Result<Self, InfrastructureError>
    where
        F: FnOnce(&mut ContainerBuilder) -> Result<(), ComponentError>,
    {
        configure(&mut self.container)?;
        Ok(self)
    }

    /// 添加注册源
    pub fn add_source<S: RegistrationSource + 'static>(mut self, source: S) -> Self {
        debug!("添加注册源: {}", source.name());
        self.container.add_source(Box::new(source));
        self
    }

    /// 构建应用
    pub fn build(self) -> Result<Application, InfrastructureError> {
        if let Some(logging) = &self.logging {
            logging.init()?;
        }
        info!("开始构建应用");

        let properties = match self.properties {
            Some(properties) => {
                properties.validate()?;
                properties
            }
            None => self.binder.bind()?,
        };

        let config = ContainerConfig {
            pre_instantiate_singletons: self.pre_instantiate_singletons,
            replacement_enabled: properties.enabled,
            require_replacements: properties.require_replacements,
        };

        let mut container = self.container.with_config(config);
        if properties.enabled {
            let source = CatalogSource::new(self.catalog, properties.normalized_packages())
                .with_mappings(properties.mapping_table());
            container.add_source(Box::new(source));
        } else {
            info!("组件替换已关闭");
        }

        let container = container.build()?;
        info!("{}", container.replacement_report());

        info!("应用构建完成");
        Ok(Application::new(Arc::new(container), properties))
    }
}

impl Default for ApplicationBuilder {
    fn default() -> Self {
        Self::new()
    }
}
