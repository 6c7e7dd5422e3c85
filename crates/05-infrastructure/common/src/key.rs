//! 服务标识

use crate::metadata::TypeInfo;
use std::fmt;

/// 服务标识
///
/// 由逻辑名称、声明类型和可选限定符组成，在同一容器内唯一。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ServiceKey {
    name: String,
    service_type: TypeInfo,
    qualifier: Option<String>,
}

impl ServiceKey {
    /// 创建新的服务标识
    pub fn new(name: impl Into<String>, service_type: TypeInfo) -> Self {
        Self {
            name: name.into(),
            service_type,
            qualifier: None,
        }
    }

    /// 以声明类型 `T` 创建服务标识
    pub fn of<T: ?Sized + 'static>(name: impl Into<String>) -> Self {
        Self::new(name, TypeInfo::of::<T>())
    }

    /// 设置限定符
    pub fn with_qualifier(mut self, qualifier: impl Into<String>) -> Self {
        self.qualifier = Some(qualifier.into());
        self
    }

    /// 设置可选限定符
    pub fn with_optional_qualifier(mut self, qualifier: Option<String>) -> Self {
        self.qualifier = qualifier;
        self
    }

    /// 逻辑名称
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 声明类型
    pub fn service_type(&self) -> &TypeInfo {
        &self.service_type
    }

    /// 限定符
    pub fn qualifier(&self) -> Option<&str> {
        self.qualifier.as_deref()
    }

    /// 是否匹配指定名称和限定符（不比较类型）
    pub fn matches_target(&self, name: &str, qualifier: Option<&str>) -> bool {
        self.name == name && self.qualifier.as_deref() == qualifier
    }
}

impl fmt::Display for ServiceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.qualifier {
            Some(qualifier) => write!(f, "{}[{}]: {}", self.name, qualifier, self.service_type),
            None => write!(f, "{}: {}", self.name, self.service_type),
        }
    }
}
