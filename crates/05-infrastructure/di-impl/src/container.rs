//! 依赖注入容器
//!
//! 容器由抑制落选候选之后的注册表创建，被抑制的候选不会进入容器。

use di_abstractions::{CandidateMap, ContainerStats, ResolutionResult};
use infrastructure_common::{
    BootstrapError, Candidate, DependencyError, Instance, Lifetime, ResolutionError, ServiceKey,
    ServiceLocator, TypeInfo,
};
use once_cell::sync::OnceCell;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

/// 服务槽位
struct ServiceSlot {
    key: ServiceKey,
    candidate: Candidate,
    singleton: OnceCell<Instance>,
    constructions: AtomicUsize,
}

impl ServiceSlot {
    fn new(key: ServiceKey, candidate: Candidate) -> Self {
        Self {
            key,
            candidate,
            singleton: OnceCell::new(),
            constructions: AtomicUsize::new(0),
        }
    }

    fn is_instantiated(&self) -> bool {
        match self.candidate.lifetime() {
            Lifetime::Singleton => self.singleton.get().is_some(),
            Lifetime::Transient => self.constructions.load(Ordering::Acquire) > 0,
        }
    }
}

/// 依赖注入容器
///
/// 启动完成后不可变，可以通过 `Arc` 在线程间共享。
pub struct Container {
    resolution: Arc<ResolutionResult>,
    slots: Vec<ServiceSlot>,
    index: HashMap<ServiceKey, usize>,
}

impl Container {
    /// 由抑制后的注册表创建容器
    ///
    /// 每个服务标识必须恰好剩下一个候选，`resolution` 只用于报告和统计。
    pub fn from_registry(
        registry: CandidateMap,
        resolution: ResolutionResult,
    ) -> Result<Self, BootstrapError> {
        let mut slots = Vec::with_capacity(registry.len());
        let mut errors = Vec::new();
        for (key, mut candidates) in registry.into_groups() {
            match candidates.pop() {
                Some(candidate) if candidates.is_empty() => {
                    slots.push(ServiceSlot::new(key, candidate));
                }
                remaining => {
                    let mut candidates: Vec<String> =
                        candidates.iter().map(Candidate::describe).collect();
                    candidates.extend(remaining.as_ref().map(Candidate::describe));
                    errors.push(ResolutionError::UnsuppressedCandidates {
                        key: key.to_string(),
                        candidates,
                    });
                }
            }
        }
        if !errors.is_empty() {
            return Err(BootstrapError::Resolution { errors });
        }

        let index = slots
            .iter()
            .enumerate()
            .map(|(position, slot)| (slot.key.clone(), position))
            .collect();

        Ok(Self {
            resolution: Arc::new(resolution),
            slots,
            index,
        })
    }

    /// 按名称解析服务
    pub fn resolve<T: ?Sized + Send + Sync + 'static>(
        &self,
        name: &str,
    ) -> Result<Arc<T>, DependencyError> {
        let injector = self.injector();
        let locator: &dyn ServiceLocator = &injector;
        locator.get::<T>(name)
    }

    /// 按名称和限定符解析服务
    pub fn resolve_qualified<T: ?Sized + Send + Sync + 'static>(
        &self,
        name: &str,
        qualifier: &str,
    ) -> Result<Arc<T>, DependencyError> {
        let injector = self.injector();
        let locator: &dyn ServiceLocator = &injector;
        locator.get_qualified::<T>(name, qualifier)
    }

    /// 按类型解析唯一的服务
    pub fn resolve_by_type<T: ?Sized + Send + Sync + 'static>(
        &self,
    ) -> Result<Arc<T>, DependencyError> {
        let injector = self.injector();
        let locator: &dyn ServiceLocator = &injector;
        locator.get_by_type::<T>()
    }

    /// 是否包含服务标识
    pub fn contains(&self, key: &ServiceKey) -> bool {
        self.index.contains_key(key)
    }

    /// 所有服务标识
    pub fn keys(&self) -> impl Iterator<Item = &ServiceKey> {
        self.slots.iter().map(|slot| &slot.key)
    }

    /// 不可变的解析结果
    pub fn resolution(&self) -> Arc<ResolutionResult> {
        self.resolution.clone()
    }

    /// 服务标识的实例创建次数
    pub fn construction_count(&self, key: &ServiceKey) -> usize {
        self.index
            .get(key)
            .map(|position| self.slots[*position].constructions.load(Ordering::Acquire))
            .unwrap_or(0)
    }

    /// 尚未实例化的替换实现
    pub fn pending_replacements(&self) -> Vec<String> {
        self.slots
            .iter()
            .filter(|slot| slot.candidate.is_replacement() && !slot.is_instantiated())
            .map(|slot| format!("{} 替换 {}", slot.candidate.describe(), slot.key))
            .collect()
    }

    /// 替换报告
    pub fn replacement_report(&self) -> String {
        self.resolution.replacement_report()
    }

    /// 容器统计信息
    pub fn stats(&self) -> ContainerStats {
        ContainerStats {
            registered_services: self.slots.len(),
            replaced_services: self.resolution.replaced().count(),
            suppressed_candidates: self.resolution.suppressed().count(),
            active_singletons: self
                .slots
                .iter()
                .filter(|slot| slot.singleton.get().is_some())
                .count(),
            constructions: self
                .slots
                .iter()
                .map(|slot| slot.constructions.load(Ordering::Acquire))
                .sum(),
        }
    }

    /// 预实例化所有单例，返回实例化的数量
    pub fn pre_instantiate_singletons(&self) -> Result<usize, DependencyError> {
        let mut count = 0;
        for (position, slot) in self.slots.iter().enumerate() {
            if slot.candidate.lifetime() == Lifetime::Singleton {
                self.instantiate(position, &[])?;
                count += 1;
            }
        }
        info!("预实例化单例完成: {} 个", count);
        Ok(count)
    }

    fn injector(&self) -> Injector<'_> {
        Injector {
            container: self,
            chain: Vec::new(),
        }
    }

    fn find(
        &self,
        name: Option<&str>,
        qualifier: Option<&str>,
        service_type: TypeInfo,
    ) -> Result<usize, DependencyError> {
        if let Some(name) = name {
            let key = ServiceKey::new(name, service_type)
                .with_optional_qualifier(qualifier.map(str::to_string));
            return self
                .index
                .get(&key)
                .copied()
                .ok_or_else(|| DependencyError::ComponentNotRegistered {
                    key: key.to_string(),
                });
        }

        let matching: Vec<usize> = self
            .slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| {
                *slot.key.service_type() == service_type
                    && (qualifier.is_none() || slot.key.qualifier() == qualifier)
            })
            .map(|(position, _)| position)
            .collect();

        match matching.as_slice() {
            [] => Err(DependencyError::ComponentNotRegistered {
                key: service_type.name.to_string(),
            }),
            [position] => Ok(*position),
            _ => Err(DependencyError::AmbiguousType {
                type_name: service_type.name.to_string(),
                candidates: matching
                    .iter()
                    .map(|position| self.slots[*position].key.to_string())
                    .collect(),
            }),
        }
    }

    fn instantiate(
        &self,
        position: usize,
        chain: &[ServiceKey],
    ) -> Result<Instance, DependencyError> {
        let slot = &self.slots[position];

        if chain.contains(&slot.key) {
            let mut dependency_chain: Vec<String> = chain.iter().map(ToString::to_string).collect();
            dependency_chain.push(slot.key.to_string());
            return Err(DependencyError::CircularDependency {
                dependency_chain: dependency_chain.join(" -> "),
            });
        }

        let mut child_chain = chain.to_vec();
        child_chain.push(slot.key.clone());
        let child = Injector {
            container: self,
            chain: child_chain,
        };

        match slot.candidate.lifetime() {
            Lifetime::Singleton => slot
                .singleton
                .get_or_try_init(|| self.construct(slot, &child))
                .cloned(),
            Lifetime::Transient => self.construct(slot, &child),
        }
    }

    fn construct(
        &self,
        slot: &ServiceSlot,
        injector: &Injector<'_>,
    ) -> Result<Instance, DependencyError> {
        slot.constructions.fetch_add(1, Ordering::AcqRel);
        debug!("创建实例: {} ({})", slot.key, slot.candidate.describe());
        let locator: &dyn ServiceLocator = injector;
        (slot.candidate.factory())(locator)
    }
}

impl std::fmt::Debug for Container {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Container")
            .field("services", &self.slots.len())
            .field("replaced", &self.resolution.replaced().count())
            .finish()
    }
}

/// 注入器
///
/// 记录当前的解析链，用于检测循环依赖。
struct Injector<'a> {
    container: &'a Container,
    chain: Vec<ServiceKey>,
}

impl ServiceLocator for Injector<'_> {
    fn locate(
        &self,
        name: Option<&str>,
        qualifier: Option<&str>,
        service_type: TypeInfo,
    ) -> Result<Instance, DependencyError> {
        let position = self.container.find(name, qualifier, service_type)?;
        self.container.instantiate(position, &self.chain)
    }
}
