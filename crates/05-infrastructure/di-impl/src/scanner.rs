//! 替换目录注册源

use di_abstractions::{RegistrationSource, ScannedRegistration};
use infrastructure_common::{
    normalize_packages, replacement_catalog, ComponentError, ReplacementCatalog,
    ReplacementDescriptor,
};
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use tracing::{debug, info};

/// 替换目录注册源
///
/// 扫描位于配置包路径下的替换声明；`mappings` 把目录中的实现固定到指定的服务名称上。
#[derive(Debug, Clone)]
pub struct CatalogSource {
    catalog: Arc<ReplacementCatalog>,
    packages: Vec<String>,
    mappings: BTreeMap<String, String>,
}

impl CatalogSource {
    /// 创建注册源，包路径会被规范化
    pub fn new<I, S>(catalog: Arc<ReplacementCatalog>, packages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            catalog,
            packages: normalize_packages(packages),
            mappings: BTreeMap::new(),
        }
    }

    /// 使用全局替换目录创建注册源
    pub fn global<I, S>(packages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::new(replacement_catalog(), packages)
    }

    /// 设置服务名称到实现名称的映射
    pub fn with_mappings(mut self, mappings: BTreeMap<String, String>) -> Self {
        self.mappings = mappings;
        self
    }

    pub fn packages(&self) -> &[String] {
        &self.packages
    }

    fn registration(name: String, descriptor: &ReplacementDescriptor) -> ScannedRegistration {
        ScannedRegistration::new(
            name,
            descriptor.qualifier.map(str::to_string),
            descriptor
                .to_candidate()
                .with_source(descriptor.module_path, 0),
        )
    }
}

impl RegistrationSource for CatalogSource {
    fn name(&self) -> &str {
        "replacement-catalog"
    }

    fn scan(&self) -> Result<Vec<ScannedRegistration>, ComponentError> {
        let mut pinned = Vec::with_capacity(self.mappings.len());
        let mut mapped: HashSet<&'static str> = HashSet::new();
        for (name, implementation) in &self.mappings {
            let descriptor = self
                .catalog
                .find_implementation(implementation)
                .ok_or_else(|| {
                    ComponentError::scan_error(
                        self.name(),
                        format!("替换映射 {} -> {} 找不到实现", name, implementation),
                    )
                })?;
            debug!("替换映射: {} -> {}", name, descriptor.implementation);
            mapped.insert(descriptor.implementation);
            pinned.push(Self::registration(name.clone(), &descriptor));
        }

        let mut registrations: Vec<ScannedRegistration> = Vec::new();
        if !self.packages.is_empty() {
            for descriptor in self.catalog.entries_in(&self.packages) {
                if mapped.contains(descriptor.implementation) {
                    continue;
                }
                registrations.push(Self::registration(descriptor.target_name(), &descriptor));
            }
        }
        registrations.extend(pinned);

        info!(
            "扫描替换目录: 包路径 {:?}, 找到 {} 个替换",
            self.packages,
            registrations.len()
        );
        Ok(registrations)
    }
}
