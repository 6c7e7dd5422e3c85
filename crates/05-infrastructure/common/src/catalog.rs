//! 替换目录
//!
//! `#[replace]` 宏在程序启动时把替换声明提交到全局目录，
//! 容器启动时再按配置的包路径从目录中扫描。

use crate::candidate::{Candidate, InstanceFactory};
use crate::conventions::{deduce_service_name, in_any_package};
use crate::metadata::TypeInfo;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;

/// 替换声明
#[derive(Clone)]
pub struct ReplacementDescriptor {
    /// 替换实现的完整类型名称
    pub implementation: &'static str,
    /// 声明所在的模块路径
    pub module_path: &'static str,
    /// 声明所在的源码行号
    pub line: u32,
    /// 替换目标名称，为空时从声明类型推断
    pub target: Option<&'static str>,
    /// 替换目标限定符
    pub qualifier: Option<&'static str>,
    /// 声明类型
    pub service_type: TypeInfo,
    /// 优先级，数值越高优先级越高
    pub priority: i32,
    /// 实例工厂
    pub factory: InstanceFactory,
}

impl ReplacementDescriptor {
    /// 替换目标名称
    pub fn target_name(&self) -> String {
        self.target
            .map(str::to_string)
            .unwrap_or_else(|| deduce_service_name(&self.service_type))
    }

    /// 实现的简短名称
    pub fn short_implementation(&self) -> &'static str {
        TypeInfo {
            name: self.implementation,
            id: self.service_type.id,
        }
        .short_name()
    }

    /// 是否匹配实现名称（完整路径或简短名称）
    pub fn matches_implementation(&self, name: &str) -> bool {
        self.implementation == name || self.short_implementation() == name
    }

    /// 声明顺序键：先按模块路径，再按源码位置
    pub fn declaration_order(&self) -> (&'static str, u32, &'static str) {
        (self.module_path, self.line, self.implementation)
    }

    /// 转换为替换候选
    pub fn to_candidate(&self) -> Candidate {
        Candidate::replacement(
            self.service_type,
            self.short_implementation(),
            self.priority,
            self.factory.clone(),
        )
    }
}

impl fmt::Debug for ReplacementDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReplacementDescriptor")
            .field("implementation", &self.implementation)
            .field("module_path", &self.module_path)
            .field("line", &self.line)
            .field("target", &self.target)
            .field("qualifier", &self.qualifier)
            .field("service_type", &self.service_type.name)
            .field("priority", &self.priority)
            .finish()
    }
}

/// 替换目录
///
/// 按声明顺序保存替换声明。
///
/// `#[replace]` 的提交发生在启动阶段，先后顺序由链接结果决定，
/// 所以目录按 [`ReplacementDescriptor::declaration_order`] 排序，
/// 与提交的先后无关：模块路径按字典序，同一模块内按源码行号。
#[derive(Debug, Default)]
pub struct ReplacementCatalog {
    entries: RwLock<Vec<ReplacementDescriptor>>,
}

impl ReplacementCatalog {
    /// 创建空目录
    pub fn new() -> Self {
        Self::default()
    }

    /// 提交替换声明
    pub fn submit(&self, descriptor: ReplacementDescriptor) {
        let mut entries = self.entries.write();
        let order = descriptor.declaration_order();
        let position = entries.partition_point(|entry| entry.declaration_order() <= order);
        entries.insert(position, descriptor);
    }

    /// 获取位于指定包内的替换声明
    pub fn entries_in(&self, packages: &[String]) -> Vec<ReplacementDescriptor> {
        self.entries
            .read()
            .iter()
            .filter(|descriptor| in_any_package(descriptor.module_path, packages))
            .cloned()
            .collect()
    }

    /// 按实现名称查找替换声明
    pub fn find_implementation(&self, name: &str) -> Option<ReplacementDescriptor> {
        self.entries
            .read()
            .iter()
            .find(|descriptor| descriptor.matches_implementation(name))
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

/// 全局替换目录
static GLOBAL_REPLACEMENT_CATALOG: Lazy<Arc<ReplacementCatalog>> =
    Lazy::new(|| Arc::new(ReplacementCatalog::new()));

/// 获取全局替换目录
pub fn replacement_catalog() -> Arc<ReplacementCatalog> {
    GLOBAL_REPLACEMENT_CATALOG.clone()
}
