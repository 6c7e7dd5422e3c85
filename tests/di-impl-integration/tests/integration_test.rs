//! 组件替换的端到端测试
//!
//! 每个测试用独立的计数器记录工厂调用次数，用来确认被抑制的候选从未被实例化。
use di_abstractions::ContainerConfig;
use di_impl::{ContainerBuilder, Replacement};
use infrastructure_common::{
    BootstrapError, DependencyError, Lifetime, ResolutionError, ServiceKey, ServiceLocator,
    TypeInfo,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

trait CacheService: Send + Sync {
    fn backend(&self) -> &'static str;
}

struct NamedCache(&'static str);

impl CacheService for NamedCache {
    fn backend(&self) -> &'static str {
        self.0
    }
}

type CacheResult = Result<Arc<dyn CacheService>, DependencyError>;

/// 统计工厂调用次数
#[derive(Clone, Default)]
struct Counter(Arc<AtomicUsize>);

impl Counter {
    fn get(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }

    fn cache(
        &self,
        backend: &'static str,
    ) -> impl Fn(&dyn ServiceLocator) -> CacheResult + Send + Sync + 'static {
        let counter = self.0.clone();
        move |_: &dyn ServiceLocator| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(Arc::new(NamedCache(backend)) as Arc<dyn CacheService>)
        }
    }
}

fn cache_key() -> ServiceKey {
    ServiceKey::new("cacheService", TypeInfo::of::<dyn CacheService>())
}

fn with_original(original: &Counter) -> ContainerBuilder {
    let mut builder = ContainerBuilder::new();
    builder
        .register::<dyn CacheService, _>(
            "cacheService",
            Lifetime::Singleton,
            original.cache("memory"),
        )
        .unwrap();
    builder
}

#[test]
fn test_no_replacement_keeps_original() {
    let original = Counter::default();
    let container = with_original(&original).build().unwrap();

    let cache = container.resolve::<dyn CacheService>("cacheService").unwrap();
    assert_eq!(cache.backend(), "memory");
    assert_eq!(original.get(), 1);
    assert_eq!(container.stats().replaced_services, 0);
    assert_eq!(container.replacement_report(), "没有组件被替换");
}

#[test]
fn test_single_replacement_wins_and_original_is_never_built() {
    let original = Counter::default();
    let redis = Counter::default();
    let mut builder = with_original(&original);
    builder.replace::<dyn CacheService, _>(
        Replacement::new().implementation("RedisCache").priority(1),
        redis.cache("redis"),
    );
    let container = builder.build().unwrap();

    let first = container.resolve::<dyn CacheService>("cacheService").unwrap();
    let second = container.resolve_by_type::<dyn CacheService>().unwrap();
    assert_eq!(first.backend(), "redis");
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(original.get(), 0);
    assert_eq!(redis.get(), 1);
    assert!(container
        .replacement_report()
        .contains("RedisCache[1] 替换 cacheService"));
}

#[test]
fn test_higher_priority_wins_regardless_of_declaration_order() {
    for reversed in [false, true] {
        let original = Counter::default();
        let low = Counter::default();
        let high = Counter::default();
        let mut builder = with_original(&original);

        let declarations = [
            (Replacement::new().implementation("LowCache").priority(1), low.cache("low")),
            (Replacement::new().implementation("HighCache").priority(5), high.cache("high")),
        ];
        let ordered: Vec<_> = if reversed {
            declarations.into_iter().rev().collect()
        } else {
            declarations.into_iter().collect()
        };
        for (replacement, factory) in ordered {
            builder.replace::<dyn CacheService, _>(replacement, factory);
        }

        let container = builder.build().unwrap();
        let cache = container.resolve::<dyn CacheService>("cacheService").unwrap();
        assert_eq!(cache.backend(), "high");
        assert_eq!(original.get(), 0);
        assert_eq!(low.get(), 0);
        assert_eq!(high.get(), 1);
        assert!(container.resolution().diagnostics().is_empty());
    }
}

#[test]
fn test_priority_tie_picks_first_declared_and_records_diagnostic() {
    let original = Counter::default();
    let early = Counter::default();
    let late = Counter::default();
    let mut builder = with_original(&original);
    builder
        .replace::<dyn CacheService, _>(
            Replacement::new().implementation("EarlyCache").priority(3),
            early.cache("early"),
        )
        .replace::<dyn CacheService, _>(
            Replacement::new().implementation("LateCache").priority(3),
            late.cache("late"),
        );

    let container = builder.build().unwrap();
    assert_eq!(
        container.resolve::<dyn CacheService>("cacheService").unwrap().backend(),
        "early"
    );
    assert_eq!(late.get(), 0);

    let resolution = container.resolution();
    let diagnostics = resolution.diagnostics();
    assert_eq!(diagnostics.len(), 1);
    let message = diagnostics[0].to_string();
    assert!(message.contains("EarlyCache[3]"));
    assert!(message.contains("LateCache[3]"));
}

#[test]
fn test_cache_replacement_chain() {
    let original = Counter::default();
    let first = Counter::default();
    let second = Counter::default();
    let mut builder = with_original(&original);
    builder
        .replace::<dyn CacheService, _>(
            Replacement::new().implementation("RedisCache").priority(1),
            first.cache("redis"),
        )
        .replace::<dyn CacheService, _>(
            Replacement::new().implementation("ClusterCache").priority(5),
            second.cache("cluster"),
        );

    let container = builder.build().unwrap();
    assert_eq!(
        container.resolve::<dyn CacheService>("cacheService").unwrap().backend(),
        "cluster"
    );
    assert_eq!((original.get(), first.get(), second.get()), (0, 0, 1));

    let resolution = container.resolution();
    let resolved = resolution.resolved(&cache_key()).unwrap();
    assert_eq!(resolved.suppressed.len(), 2);
    assert_eq!(container.stats().suppressed_candidates, 2);
}

#[test]
fn test_incompatible_replacement_fails_before_instantiation() {
    trait QueueService: Send + Sync {}
    struct LocalQueue;
    impl QueueService for LocalQueue {}

    let original = Counter::default();
    let mut builder = with_original(&original);
    builder.replace::<dyn QueueService, _>(
        Replacement::named("cacheService").implementation("LocalQueue"),
        |_: &dyn ServiceLocator| Ok(Arc::new(LocalQueue) as Arc<dyn QueueService>),
    );

    let error = builder.build().unwrap_err();
    let errors = error.resolution_errors();
    assert_eq!(errors.len(), 1);
    assert!(matches!(errors[0], ResolutionError::IncompatibleType { .. }));
    assert_eq!(original.get(), 0);
}

#[test]
fn test_replacement_without_target_is_rejected() {
    let original = Counter::default();
    let orphan = Counter::default();
    let mut builder = with_original(&original);
    builder.replace::<dyn CacheService, _>(
        Replacement::named("sessionCache").implementation("OrphanCache"),
        orphan.cache("orphan"),
    );

    match builder.build() {
        Err(BootstrapError::Resolution { errors }) => {
            assert_eq!(errors.len(), 1);
            assert!(matches!(errors[0], ResolutionError::UnknownServiceKey { .. }));
            assert!(errors[0].key().starts_with("sessionCache"));
        }
        other => panic!("unexpected result: {:?}", other.map(|container| container.stats())),
    }
    assert_eq!((original.get(), orphan.get()), (0, 0));
}

#[test]
fn test_all_resolution_errors_are_reported_together() {
    trait QueueService: Send + Sync {}
    struct LocalQueue;
    impl QueueService for LocalQueue {}

    let original = Counter::default();
    let mut builder = with_original(&original);
    builder
        .replace::<dyn QueueService, _>(
            Replacement::named("cacheService"),
            |_: &dyn ServiceLocator| Ok(Arc::new(LocalQueue) as Arc<dyn QueueService>),
        )
        .replace::<dyn CacheService, _>(Replacement::named("missing"), original.cache("missing"));

    let error = builder.build().unwrap_err();
    assert_eq!(error.resolution_errors().len(), 2);
}

#[test]
fn test_disabled_replacement_ignores_declarations() {
    let original = Counter::default();
    let redis = Counter::default();
    let mut builder = with_original(&original)
        .with_config(ContainerConfig::default().without_replacement());
    builder.replace::<dyn CacheService, _>(
        Replacement::new().implementation("RedisCache").priority(10),
        redis.cache("redis"),
    );

    let container = builder.build().unwrap();
    assert_eq!(
        container.resolve::<dyn CacheService>("cacheService").unwrap().backend(),
        "memory"
    );
    assert_eq!(redis.get(), 0);
}

#[test]
fn test_required_replacements_missing_fails() {
    let original = Counter::default();
    let mut builder = with_original(&original);
    builder.config_mut().require_replacements = true;

    assert!(matches!(builder.build(), Err(BootstrapError::NoReplacementsFound)));
    assert_eq!(original.get(), 0);
}

#[test]
fn test_winner_inherits_original_lifetime() {
    let original = Counter::default();
    let redis = Counter::default();
    let mut builder = ContainerBuilder::new();
    builder
        .register::<dyn CacheService, _>(
            "cacheService",
            Lifetime::Transient,
            original.cache("memory"),
        )
        .unwrap();
    builder.replace::<dyn CacheService, _>(
        Replacement::new().implementation("RedisCache"),
        redis.cache("redis"),
    );

    let container = builder.build().unwrap();
    let first = container.resolve::<dyn CacheService>("cacheService").unwrap();
    let second = container.resolve::<dyn CacheService>("cacheService").unwrap();
    assert!(!Arc::ptr_eq(&first, &second));
    assert_eq!(redis.get(), 2);
    assert_eq!(container.construction_count(&cache_key()), 2);
}

#[test]
fn test_dependents_receive_replacement() {
    struct Storefront {
        cache: Arc<dyn CacheService>,
    }

    let original = Counter::default();
    let redis = Counter::default();
    let mut builder = with_original(&original);
    builder
        .register::<Storefront, _>(
            "storefront",
            Lifetime::Singleton,
            |locator: &dyn ServiceLocator| {
                Ok(Arc::new(Storefront {
                    cache: locator.get::<dyn CacheService>("cacheService")?,
                }))
            },
        )
        .unwrap();
    builder.replace::<dyn CacheService, _>(
        Replacement::new().implementation("RedisCache"),
        redis.cache("redis"),
    );

    let container = builder.build().unwrap();
    let storefront = container.resolve::<Storefront>("storefront").unwrap();
    assert_eq!(storefront.cache.backend(), "redis");
    assert_eq!(original.get(), 0);
}

#[test]
fn test_pending_replacements_with_lazy_singletons() {
    let original = Counter::default();
    let redis = Counter::default();
    let mut builder = with_original(&original).with_config(ContainerConfig::default().lazy());
    builder.replace::<dyn CacheService, _>(
        Replacement::new().implementation("RedisCache").priority(2),
        redis.cache("redis"),
    );

    let container = builder.build().unwrap();
    let pending = container.pending_replacements();
    assert_eq!(pending.len(), 1);
    assert!(pending[0].starts_with("RedisCache[2] 替换 cacheService"));

    container.resolve::<dyn CacheService>("cacheService").unwrap();
    assert!(container.pending_replacements().is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_replacement_singleton_is_shared_across_tasks() {
    let original = Counter::default();
    let redis = Counter::default();
    let mut builder = with_original(&original).with_config(ContainerConfig::default().lazy());
    builder.replace::<dyn CacheService, _>(
        Replacement::new().implementation("RedisCache"),
        redis.cache("redis"),
    );
    let container = Arc::new(builder.build().unwrap());

    let mut handles = Vec::new();
    for _ in 0..8 {
        let container = container.clone();
        handles.push(tokio::task::spawn_blocking(move || {
            container
                .resolve::<dyn CacheService>("cacheService")
                .map(|cache| cache.backend())
        }));
    }
    for handle in handles {
        assert_eq!(handle.await.unwrap().unwrap(), "redis");
    }
    assert_eq!(redis.get(), 1);
    assert_eq!(original.get(), 0);
}
