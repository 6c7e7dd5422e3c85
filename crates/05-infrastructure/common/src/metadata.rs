//! 元数据定义
//!
//! 提供服务类型的元数据信息

use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};

/// 类型信息
///
/// 相等性与哈希只取决于 [`TypeId`]，类型名称仅用于诊断输出。
#[derive(Debug, Clone, Copy)]
pub struct TypeInfo {
    /// 完整类型名称
    pub name: &'static str,
    /// 类型ID
    pub id: TypeId,
}

impl TypeInfo {
    /// 从类型获取类型信息，支持 `dyn Trait` 等非 Sized 类型
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            name: std::any::type_name::<T>(),
            id: TypeId::of::<T>(),
        }
    }

    /// 获取简短的类型名称（不包含模块路径、泛型参数和 `dyn` 前缀）
    pub fn short_name(&self) -> &'static str {
        let name = self.name.trim_start_matches("dyn ");
        let base = name
            .split(|c| c == '<' || c == ' ')
            .next()
            .unwrap_or(name);
        base.rsplit("::").next().unwrap_or(base)
    }

    /// 是否为指定类型
    pub fn is<T: ?Sized + 'static>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }

    /// 检查声明类型是否兼容
    ///
    /// 服务以声明类型（通常是 trait 对象）注入，替换实现必须声明完全相同的类型。
    pub fn is_compatible_with(&self, other: &TypeInfo) -> bool {
        self.id == other.id
    }
}

impl PartialEq for TypeInfo {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeInfo {}

impl Hash for TypeInfo {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}
