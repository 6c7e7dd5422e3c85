//! 候选注册定义
//!
//! 一个服务标识可以拥有一个原始注册和任意数量的替换注册，
//! 每一个都是一个 [`Candidate`]。

use crate::errors::DependencyError;
use crate::lifecycle::Lifetime;
use crate::metadata::TypeInfo;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// 容器内部保存的实例
///
/// 内部值为 `Arc<T>`，`T` 为服务的声明类型（可以是 `dyn Trait`）。
pub type Instance = Arc<dyn Any + Send + Sync>;

/// 实例工厂函数类型
pub type InstanceFactory =
    Arc<dyn Fn(&dyn ServiceLocator) -> Result<Instance, DependencyError> + Send + Sync>;

/// 将服务包装为容器实例
pub fn into_instance<T: ?Sized + Send + Sync + 'static>(service: Arc<T>) -> Instance {
    Arc::new(service)
}

/// 从容器实例中取出声明类型为 `T` 的服务
pub fn downcast_instance<T: ?Sized + Send + Sync + 'static>(
    instance: &Instance,
) -> Option<Arc<T>> {
    instance.as_ref().downcast_ref::<Arc<T>>().cloned()
}

/// 服务定位器
///
/// 工厂函数通过它获取依赖，容器负责检测循环依赖。
pub trait ServiceLocator: Send + Sync {
    /// 定位服务实例
    ///
    /// `name` 为空时按类型（和限定符）查找唯一的服务。
    fn locate(
        &self,
        name: Option<&str>,
        qualifier: Option<&str>,
        service_type: TypeInfo,
    ) -> Result<Instance, DependencyError>;
}

impl dyn ServiceLocator + '_ {
    /// 按名称获取服务
    pub fn get<T: ?Sized + Send + Sync + 'static>(
        &self,
        name: &str,
    ) -> Result<Arc<T>, DependencyError> {
        self.typed(Some(name), None)
    }

    /// 按名称和限定符获取服务
    pub fn get_qualified<T: ?Sized + Send + Sync + 'static>(
        &self,
        name: &str,
        qualifier: &str,
    ) -> Result<Arc<T>, DependencyError> {
        self.typed(Some(name), Some(qualifier))
    }

    /// 按类型获取唯一的服务
    pub fn get_by_type<T: ?Sized + Send + Sync + 'static>(
        &self,
    ) -> Result<Arc<T>, DependencyError> {
        self.typed(None, None)
    }

    fn typed<T: ?Sized + Send + Sync + 'static>(
        &self,
        name: Option<&str>,
        qualifier: Option<&str>,
    ) -> Result<Arc<T>, DependencyError> {
        let service_type = TypeInfo::of::<T>();
        let instance = self.locate(name, qualifier, service_type)?;
        downcast_instance::<T>(&instance).ok_or_else(|| DependencyError::TypeMismatch {
            key: name.unwrap_or(service_type.name).to_string(),
            expected: service_type.name.to_string(),
        })
    }
}

/// 候选类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CandidateKind {
    /// 原始注册
    Original,
    /// 替换注册
    Replacement,
}

/// 候选的声明来源，用于诊断输出
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CandidateSource {
    /// 声明位置（模块路径、注册源名称等）
    pub origin: String,
    /// 声明顺序
    pub declaration_index: usize,
}

/// 候选注册
#[derive(Clone)]
pub struct Candidate {
    kind: CandidateKind,
    declared_type: TypeInfo,
    implementation: String,
    priority: i32,
    lifetime: Lifetime,
    source: CandidateSource,
    factory: InstanceFactory,
}

impl Candidate {
    /// 创建原始注册候选
    pub fn original(
        declared_type: TypeInfo,
        implementation: impl Into<String>,
        lifetime: Lifetime,
        factory: InstanceFactory,
    ) -> Self {
        Self {
            kind: CandidateKind::Original,
            declared_type,
            implementation: implementation.into(),
            priority: 0,
            lifetime,
            source: CandidateSource::default(),
            factory,
        }
    }

    /// 创建替换注册候选
    ///
    /// 替换胜出后会继承原始注册的生命周期。
    pub fn replacement(
        declared_type: TypeInfo,
        implementation: impl Into<String>,
        priority: i32,
        factory: InstanceFactory,
    ) -> Self {
        Self {
            kind: CandidateKind::Replacement,
            declared_type,
            implementation: implementation.into(),
            priority,
            lifetime: Lifetime::default(),
            source: CandidateSource::default(),
            factory,
        }
    }

    /// 设置声明来源
    pub fn with_source(mut self, origin: impl Into<String>, declaration_index: usize) -> Self {
        self.source = CandidateSource {
            origin: origin.into(),
            declaration_index,
        };
        self
    }

    /// 设置生命周期
    pub fn with_lifetime(mut self, lifetime: Lifetime) -> Self {
        self.lifetime = lifetime;
        self
    }

    pub fn kind(&self) -> CandidateKind {
        self.kind
    }

    pub fn is_replacement(&self) -> bool {
        self.kind == CandidateKind::Replacement
    }

    pub fn declared_type(&self) -> &TypeInfo {
        &self.declared_type
    }

    pub fn implementation(&self) -> &str {
        &self.implementation
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    pub fn lifetime(&self) -> Lifetime {
        self.lifetime
    }

    pub fn source(&self) -> &CandidateSource {
        &self.source
    }

    pub fn factory(&self) -> &InstanceFactory {
        &self.factory
    }

    /// 是否为同一个注册（克隆出的候选共享同一个工厂）
    pub fn is_same_registration(&self, other: &Candidate) -> bool {
        self.kind == other.kind
            && self.source == other.source
            && self.implementation == other.implementation
            && Arc::ptr_eq(&self.factory, &other.factory)
    }

    /// 诊断用的简短描述，如 `RedisCache[5]`
    pub fn describe(&self) -> String {
        match self.kind {
            CandidateKind::Original => format!("{}[original]", self.implementation),
            CandidateKind::Replacement => format!("{}[{}]", self.implementation, self.priority),
        }
    }
}

impl fmt::Debug for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Candidate")
            .field("kind", &self.kind)
            .field("declared_type", &self.declared_type.name)
            .field("implementation", &self.implementation)
            .field("priority", &self.priority)
            .field("lifetime", &self.lifetime)
            .field("source", &self.source)
            .field("factory", &"<function>")
            .finish()
    }
}
