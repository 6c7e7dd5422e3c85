//! 组件替换配置绑定器

use crate::properties::{PackageList, ReplaceProperties, REPLACE_SECTION};
use config::{Config, Environment, File};
use infrastructure_common::ConfigError;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::{debug, error, info};

/// 默认配置文件（不含扩展名）
pub const DEFAULT_CONFIG_FILE: &str = "config/replace";

/// 默认环境变量前缀
pub const DEFAULT_ENV_PREFIX: &str = "REPLACE";

/// 环境变量覆盖项
#[derive(Debug, Default, Deserialize)]
struct ReplaceOverrides {
    enabled: Option<bool>,
    packages: Option<PackageList>,
    require_replacements: Option<bool>,
}

impl ReplaceOverrides {
    fn apply(self, properties: &mut ReplaceProperties) {
        if let Some(enabled) = self.enabled {
            properties.enabled = enabled;
        }
        if let Some(packages) = self.packages {
            properties.packages = packages.into_packages();
        }
        if let Some(require_replacements) = self.require_replacements {
            properties.require_replacements = require_replacements;
        }
    }
}

/// 组件替换配置绑定器
///
/// 配置来源按顺序覆盖：默认配置文件、显式添加的文件、`REPLACE_` 前缀的环境变量。
#[derive(Debug, Clone)]
pub struct ReplacePropertiesBinder {
    default_file: Option<String>,
    files: Vec<PathBuf>,
    env_prefix: Option<String>,
    env_source: Option<HashMap<String, String>>,
}

impl ReplacePropertiesBinder {
    /// 创建新的配置绑定器
    pub fn new() -> Self {
        Self {
            default_file: Some(DEFAULT_CONFIG_FILE.to_string()),
            files: Vec::new(),
            env_prefix: Some(DEFAULT_ENV_PREFIX.to_string()),
            env_source: None,
        }
    }

    /// 设置默认配置文件，`None` 表示不读取
    pub fn with_default_file(mut self, name: Option<&str>) -> Self {
        self.default_file = name.map(str::to_string);
        self
    }

    /// 添加配置文件，文件必须存在
    pub fn add_file(mut self, path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.display().to_string(),
            });
        }
        self.files.push(path);
        Ok(self)
    }

    /// 设置环境变量前缀
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = Some(prefix.into());
        self
    }

    /// 不读取环境变量
    pub fn without_environment(mut self) -> Self {
        self.env_prefix = None;
        self
    }

    /// 使用指定的变量集合代替进程环境变量
    pub fn with_env_source(mut self, source: HashMap<String, String>) -> Self {
        self.env_source = Some(source);
        self
    }

    /// 绑定组件替换配置
    pub fn bind(&self) -> Result<ReplaceProperties, ConfigError> {
        let mut builder = Config::builder();
        if let Some(default_file) = &self.default_file {
            builder = builder.add_source(File::with_name(default_file).required(false));
        }
        for file in &self.files {
            debug!("加载配置文件: {}", file.display());
            builder = builder.add_source(File::from(file.as_path()));
        }
        let settings = builder.build().map_err(parse_error)?;

        let mut properties = match settings.get::<ReplaceProperties>(REPLACE_SECTION) {
            Ok(properties) => properties,
            Err(config::ConfigError::NotFound(_)) => {
                debug!("未找到 {} 配置节, 使用默认配置", REPLACE_SECTION);
                ReplaceProperties::default()
            }
            Err(e) => return Err(parse_error(e)),
        };

        if let Some(prefix) = &self.env_prefix {
            let overrides: ReplaceOverrides = Config::builder()
                .add_source(
                    Environment::with_prefix(prefix)
                        .try_parsing(true)
                        .source(self.env_source.clone()),
                )
                .build()
                .and_then(Config::try_deserialize)
                .map_err(parse_error)?;
            overrides.apply(&mut properties);
        }

        properties.validate()?;
        info!(
            "组件替换配置: enabled={}, packages={:?}, mappings={}",
            properties.enabled,
            properties.packages,
            properties.mappings.len()
        );
        Ok(properties)
    }
}

impl Default for ReplacePropertiesBinder {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_error(e: config::ConfigError) -> ConfigError {
    error!("配置绑定失败: {}", e);
    ConfigError::ParseError {
        source: Box::new(e),
    }
}
