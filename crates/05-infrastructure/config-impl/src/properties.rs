//! 组件替换配置

use infrastructure_common::{normalize_packages, split_packages, ConfigError, PACKAGE_SEPARATOR};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// 配置节名称
pub const REPLACE_SECTION: &str = "replace";

/// 组件替换配置
///
/// ```toml
/// [replace]
/// enabled = true
/// packages = ["app::ext", "billing::overrides"]
/// require_replacements = false
///
/// [[replace.mappings]]
/// service = "mailSender"
/// implementation = "SmtpMailSender"
/// ```
///
/// 映射写成表的列表，服务名称作为值保存，保留大小写。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplaceProperties {
    /// 是否启用组件替换
    pub enabled: bool,
    /// 扫描替换声明的包路径，支持列表或逗号分隔的字符串
    #[serde(deserialize_with = "deserialize_packages")]
    pub packages: Vec<String>,
    /// 服务名称到替换实现名称的映射
    pub mappings: Vec<ReplaceMapping>,
    /// 启用时是否要求至少存在一个替换
    pub require_replacements: bool,
}

/// 单条替换映射
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplaceMapping {
    /// 被替换的服务名称
    pub service: String,
    /// 替换实现名称，可以是短名称或完整路径
    pub implementation: String,
}

impl ReplaceMapping {
    pub fn new(service: impl Into<String>, implementation: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            implementation: implementation.into(),
        }
    }
}

impl Default for ReplaceProperties {
    fn default() -> Self {
        Self {
            enabled: true,
            packages: Vec::new(),
            mappings: Vec::new(),
            require_replacements: false,
        }
    }
}

impl ReplaceProperties {
    /// 规范化后的扫描包路径
    pub fn normalized_packages(&self) -> Vec<String> {
        normalize_packages(&self.packages)
    }

    /// 按服务名称索引的映射表
    pub fn mapping_table(&self) -> BTreeMap<String, String> {
        self.mappings
            .iter()
            .map(|mapping| {
                (
                    mapping.service.trim().to_string(),
                    mapping.implementation.trim().to_string(),
                )
            })
            .collect()
    }

    /// 验证配置
    pub fn validate(&self) -> Result<(), ConfigError> {
        for package in &self.packages {
            let package = package.trim().trim_end_matches(PACKAGE_SEPARATOR);
            if package.is_empty() {
                continue;
            }
            if !package.split(PACKAGE_SEPARATOR).all(is_identifier) {
                return Err(ConfigError::ValidationError {
                    message: format!("无效的包路径: {}", package),
                });
            }
        }

        let mut services = BTreeSet::new();
        for mapping in &self.mappings {
            let service = mapping.service.trim();
            if service.is_empty() || mapping.implementation.trim().is_empty() {
                return Err(ConfigError::ValidationError {
                    message: format!(
                        "无效的替换映射: '{}' -> '{}'",
                        mapping.service, mapping.implementation
                    ),
                });
            }
            if !services.insert(service) {
                return Err(ConfigError::ValidationError {
                    message: format!("服务 {} 存在多条替换映射", service),
                });
            }
        }
        Ok(())
    }
}

fn is_identifier(segment: &str) -> bool {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) if first == '_' || first.is_alphabetic() => {
            chars.all(|c| c == '_' || c.is_alphanumeric())
        }
        _ => false,
    }
}

/// 包路径列表的两种写法
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub(crate) enum PackageList {
    Joined(String),
    List(Vec<String>),
}

impl PackageList {
    pub(crate) fn into_packages(self) -> Vec<String> {
        match self {
            Self::Joined(value) => split_packages(&value),
            Self::List(values) => values
                .iter()
                .flat_map(|value| split_packages(value))
                .collect(),
        }
    }
}

fn deserialize_packages<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    PackageList::deserialize(deserializer).map(PackageList::into_packages)
}
