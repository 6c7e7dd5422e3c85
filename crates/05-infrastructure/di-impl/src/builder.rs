//! 容器构建器
//!
//! 启动阶段可变的注册表：收集原始注册和替换注册，
//! 解析后抑制落选的候选，冻结为不可变的 [`Container`]。

use crate::container::Container;
use crate::resolver::PriorityOverrideResolver;
use di_abstractions::{
    CandidateMap, ContainerConfig, OverrideResolver, RegistrationSource, RegistrationSuppressor,
    ScannedRegistration,
};
use infrastructure_common::{
    deduce_service_name, into_instance, BootstrapError, Candidate, ComponentError,
    DependencyError, InstanceFactory, Lifetime, ServiceKey, ServiceLocator, TypeInfo,
};
use std::sync::Arc;
use tracing::{debug, info};

/// 手工注册的来源名称
const PROGRAMMATIC_ORIGIN: &str = "builder";

/// 替换声明
///
/// 目标名称为空时由声明类型推断，如 `dyn HelloService` 推断为 `helloService`。
#[derive(Debug, Clone, Default)]
pub struct Replacement {
    name: Option<String>,
    qualifier: Option<String>,
    priority: i32,
    implementation: Option<String>,
}

impl Replacement {
    /// 替换由声明类型推断出的服务
    pub fn new() -> Self {
        Self::default()
    }

    /// 替换指定名称的服务
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn qualifier(mut self, qualifier: impl Into<String>) -> Self {
        self.qualifier = Some(qualifier.into());
        self
    }

    /// 优先级，数值越高优先级越高
    pub fn priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// 实现名称，用于诊断输出
    pub fn implementation(mut self, implementation: impl Into<String>) -> Self {
        self.implementation = Some(implementation.into());
        self
    }
}

/// 容器构建器
pub struct ContainerBuilder {
    config: ContainerConfig,
    resolver: Box<dyn OverrideResolver>,
    registrations: Vec<ScannedRegistration>,
    sources: Vec<Box<dyn RegistrationSource>>,
    next_index: usize,
}

impl ContainerBuilder {
    /// 创建使用默认配置和优先级解析器的构建器
    pub fn new() -> Self {
        Self {
            config: ContainerConfig::default(),
            resolver: Box::new(PriorityOverrideResolver::new()),
            registrations: Vec::new(),
            sources: Vec::new(),
            next_index: 0,
        }
    }

    /// 设置容器配置
    pub fn with_config(mut self, config: ContainerConfig) -> Self {
        self.config = config;
        self
    }

    /// 设置替换解析器
    pub fn with_resolver(mut self, resolver: Box<dyn OverrideResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn config(&self) -> &ContainerConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut ContainerConfig {
        &mut self.config
    }

    /// 注册服务
    pub fn register<T, F>(
        &mut self,
        name: impl Into<String>,
        lifetime: Lifetime,
        factory: F,
    ) -> Result<&mut Self, ComponentError>
    where
        T: ?Sized + Send + Sync + 'static,
        F: Fn(&dyn ServiceLocator) -> Result<Arc<T>, DependencyError> + Send + Sync + 'static,
    {
        self.register_original::<T>(name.into(), None, lifetime, erase(factory))
    }

    /// 注册带限定符的服务
    pub fn register_qualified<T, F>(
        &mut self,
        name: impl Into<String>,
        qualifier: impl Into<String>,
        lifetime: Lifetime,
        factory: F,
    ) -> Result<&mut Self, ComponentError>
    where
        T: ?Sized + Send + Sync + 'static,
        F: Fn(&dyn ServiceLocator) -> Result<Arc<T>, DependencyError> + Send + Sync + 'static,
    {
        self.register_original::<T>(
            name.into(),
            Some(qualifier.into()),
            lifetime,
            erase(factory),
        )
    }

    /// 注册已创建的单例实例
    pub fn register_instance<T>(
        &mut self,
        name: impl Into<String>,
        instance: Arc<T>,
    ) -> Result<&mut Self, ComponentError>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.register::<T, _>(name, Lifetime::Singleton, move |_: &dyn ServiceLocator| {
            Ok(instance.clone())
        })
    }

    /// 声明替换实现
    pub fn replace<T, F>(&mut self, replacement: Replacement, factory: F) -> &mut Self
    where
        T: ?Sized + Send + Sync + 'static,
        F: Fn(&dyn ServiceLocator) -> Result<Arc<T>, DependencyError> + Send + Sync + 'static,
    {
        let service_type = TypeInfo::of::<T>();
        let name = replacement
            .name
            .unwrap_or_else(|| deduce_service_name(&service_type));
        let implementation = replacement
            .implementation
            .unwrap_or_else(|| service_type.short_name().to_string());

        debug!(
            "声明替换: {}[{}] -> {}",
            implementation, replacement.priority, name
        );
        let candidate = Candidate::replacement(
            service_type,
            implementation,
            replacement.priority,
            erase(factory),
        );
        self.push(
            ScannedRegistration::new(name, replacement.qualifier, candidate),
            PROGRAMMATIC_ORIGIN,
        );
        self
    }

    /// 添加注册源
    pub fn add_source(&mut self, source: Box<dyn RegistrationSource>) -> &mut Self {
        self.sources.push(source);
        self
    }

    /// 构建容器
    ///
    /// 在任何实例创建之前完成替换解析；解析失败时不会实例化任何服务。
    pub fn build(mut self) -> Result<Container, BootstrapError> {
        let sources = std::mem::take(&mut self.sources);
        for source in &sources {
            let scanned = source.scan()?;
            info!("注册源 {} 扫描到 {} 个注册", source.name(), scanned.len());
            for registration in scanned {
                self.push(registration, source.name());
            }
        }

        if !self.config.replacement_enabled {
            let before = self.registrations.len();
            self.registrations
                .retain(|registration| !registration.candidate.is_replacement());
            info!(
                "组件替换已关闭, 忽略 {} 个替换声明",
                before - self.registrations.len()
            );
        } else if self.config.require_replacements
            && !self
                .registrations
                .iter()
                .any(|registration| registration.candidate.is_replacement())
        {
            return Err(BootstrapError::NoReplacementsFound);
        }

        let candidates = self.group_candidates();
        debug!(
            "候选分组完成: {} 个服务, {} 个候选",
            candidates.len(),
            candidates.candidate_count()
        );

        let mut registry = candidates.clone();
        let resolution = self.resolver.resolve(candidates)?;
        let mut suppressed = 0;
        for (key, candidate) in resolution.suppressed() {
            debug!("抑制候选: {} ({})", candidate.describe(), key);
            registry.suppress(key, candidate);
            suppressed += 1;
        }

        let container = Container::from_registry(registry, resolution)?;
        if self.config.pre_instantiate_singletons {
            container.pre_instantiate_singletons()?;
        }

        info!(
            "容器构建完成: {} 个服务, 抑制 {} 个候选",
            container.keys().count(),
            suppressed
        );
        Ok(container)
    }

    fn register_original<T: ?Sized + 'static>(
        &mut self,
        name: String,
        qualifier: Option<String>,
        lifetime: Lifetime,
        factory: InstanceFactory,
    ) -> Result<&mut Self, ComponentError> {
        let service_type = TypeInfo::of::<T>();
        let key = ServiceKey::new(name.clone(), service_type)
            .with_optional_qualifier(qualifier.clone());
        let duplicate = self.registrations.iter().any(|registration| {
            !registration.candidate.is_replacement() && registration.service_key() == key
        });
        if duplicate {
            return Err(ComponentError::DuplicateRegistration {
                key: key.to_string(),
            });
        }

        debug!("注册服务: {} ({})", key, lifetime);
        let candidate =
            Candidate::original(service_type, service_type.short_name(), lifetime, factory);
        self.push(
            ScannedRegistration::new(name, qualifier, candidate),
            PROGRAMMATIC_ORIGIN,
        );
        Ok(self)
    }

    fn push(&mut self, mut registration: ScannedRegistration, origin: &str) {
        let declared_origin = registration.candidate.source().origin.clone();
        let origin = if declared_origin.is_empty() {
            origin.to_string()
        } else {
            declared_origin
        };
        registration.candidate = registration.candidate.with_source(origin, self.next_index);
        self.next_index += 1;
        self.registrations.push(registration);
    }

    /// 原始注册先分组；替换注册按名称和限定符归入目标服务，并继承原始注册的生命周期
    fn group_candidates(&self) -> CandidateMap {
        let mut candidates = CandidateMap::new();
        for registration in self
            .registrations
            .iter()
            .filter(|registration| !registration.candidate.is_replacement())
        {
            candidates.insert(registration.service_key(), registration.candidate.clone());
        }

        for registration in self
            .registrations
            .iter()
            .filter(|registration| registration.candidate.is_replacement())
        {
            let key = candidates
                .find_target(
                    &registration.name,
                    registration.qualifier.as_deref(),
                    registration.candidate.declared_type(),
                )
                .cloned()
                .unwrap_or_else(|| registration.service_key());
            let lifetime = candidates
                .get(&key)
                .and_then(|group| group.iter().find(|candidate| !candidate.is_replacement()))
                .map(Candidate::lifetime);
            let candidate = match lifetime {
                Some(lifetime) => registration.candidate.clone().with_lifetime(lifetime),
                None => registration.candidate.clone(),
            };
            candidates.insert(key, candidate);
        }
        candidates
    }
}

impl Default for ContainerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn erase<T, F>(factory: F) -> InstanceFactory
where
    T: ?Sized + Send + Sync + 'static,
    F: Fn(&dyn ServiceLocator) -> Result<Arc<T>, DependencyError> + Send + Sync + 'static,
{
    Arc::new(move |locator: &dyn ServiceLocator| factory(locator).map(into_instance))
}
