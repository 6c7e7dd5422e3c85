//! #[replace] 宏集成测试
//!
//! 替换声明在程序启动时提交到全局目录，测试通过包路径扫描把它们接入容器。

use di_abstractions::ContainerConfig;
use di_impl::{CatalogSource, ContainerBuilder};
use infrastructure_common::{
    replacement_catalog, DependencyError, Lifetime, ServiceKey, ServiceLocator, TypeInfo,
};
use std::collections::BTreeMap;
use std::sync::Arc;

pub trait Greeting: Send + Sync {
    fn greet(&self, name: &str) -> String;
}

struct PlainGreeting;

impl Greeting for PlainGreeting {
    fn greet(&self, name: &str) -> String {
        format!("hello {}", name)
    }
}

mod overrides {
    use super::Greeting;
    use component_macros::replace;
    use infrastructure_common::{DependencyError, ServiceLocator};
    use std::sync::Arc;

    #[derive(Default)]
    #[replace(service = dyn Greeting, priority = 5)]
    pub struct LoudGreeting;

    impl Greeting for LoudGreeting {
        fn greet(&self, name: &str) -> String {
            format!("HELLO {}!", name.to_uppercase())
        }
    }

    #[replace(
        service = dyn Greeting,
        name = "greeting",
        priority = 1,
        factory = QuietGreeting::create
    )]
    pub struct QuietGreeting {
        punctuation: Arc<String>,
    }

    impl QuietGreeting {
        fn create(locator: &dyn ServiceLocator) -> Result<Self, DependencyError> {
            Ok(Self {
                punctuation: locator.get::<String>("punctuation")?,
            })
        }
    }

    impl Greeting for QuietGreeting {
        fn greet(&self, name: &str) -> String {
            format!("hello {}{}", name, self.punctuation)
        }
    }
}

mod formal {
    use super::Greeting;
    use component_macros::replace;

    #[derive(Default)]
    #[replace(service = dyn Greeting, qualifier = "formal", priority = -2)]
    pub struct FormalGreeting;

    impl Greeting for FormalGreeting {
        fn greet(&self, name: &str) -> String {
            format!("Good day, {}", name)
        }
    }
}

mod unscanned {
    use super::Greeting;
    use component_macros::replace;

    #[derive(Default)]
    #[replace(service = dyn Greeting, priority = 100)]
    pub struct IgnoredGreeting;

    impl Greeting for IgnoredGreeting {
        fn greet(&self, _name: &str) -> String {
            "ignored".to_string()
        }
    }
}

mod tied {
    use super::Greeting;
    use component_macros::replace;

    // 同级声明按源码位置排序
    #[derive(Default)]
    #[replace(service = dyn Greeting, priority = 7)]
    pub struct CheerfulGreeting;

    impl Greeting for CheerfulGreeting {
        fn greet(&self, name: &str) -> String {
            format!("hi {}!", name)
        }
    }

    #[derive(Default)]
    #[replace(service = dyn Greeting, priority = 7)]
    pub struct GrumpyGreeting;

    impl Greeting for GrumpyGreeting {
        fn greet(&self, name: &str) -> String {
            format!("what, {}?", name)
        }
    }
}

fn package(module: &str) -> String {
    format!("{}::{}", module_path!(), module)
}

fn builder_with_original() -> ContainerBuilder {
    let mut builder = ContainerBuilder::new();
    builder
        .register::<dyn Greeting, _>("greeting", Lifetime::Singleton, |_: &dyn ServiceLocator| {
            Ok(Arc::new(PlainGreeting) as Arc<dyn Greeting>)
        })
        .unwrap();
    builder
        .register_qualified::<dyn Greeting, _>(
            "greeting",
            "formal",
            Lifetime::Transient,
            |_: &dyn ServiceLocator| Ok(Arc::new(PlainGreeting) as Arc<dyn Greeting>),
        )
        .unwrap();
    builder
        .register_instance::<String>("punctuation", Arc::new("...".to_string()))
        .unwrap();
    builder
}

#[test]
fn test_declarations_are_submitted_to_catalog() {
    let entries = replacement_catalog().entries_in(&[package("overrides")]);
    assert_eq!(entries.len(), 2);

    let loud = replacement_catalog().find_implementation("LoudGreeting").unwrap();
    assert_eq!(loud.implementation, concat!(module_path!(), "::overrides::LoudGreeting"));
    assert_eq!(loud.target, None);
    assert_eq!(loud.target_name(), "greeting");
    assert_eq!(loud.priority, 5);
    assert!(loud.service_type.is::<dyn Greeting>());

    let formal = replacement_catalog().find_implementation("FormalGreeting").unwrap();
    assert_eq!(formal.qualifier, Some("formal"));
    assert_eq!(formal.priority, -2);
}

#[test]
fn test_scanned_replacement_with_highest_priority_wins() {
    let mut builder = builder_with_original();
    builder.add_source(Box::new(CatalogSource::global([package("overrides")])));
    let container = builder.build().unwrap();

    let greeting = container.resolve::<dyn Greeting>("greeting").unwrap();
    assert_eq!(greeting.greet("ada"), "HELLO ADA!");

    let key = ServiceKey::new("greeting", TypeInfo::of::<dyn Greeting>());
    let resolution = container.resolution();
    let resolved = resolution.resolved(&key).unwrap();
    assert!(resolved.is_replaced());
    assert_eq!(resolved.suppressed.len(), 2);

    // 限定符不同的注册不受影响
    let formal = container
        .resolve_qualified::<dyn Greeting>("greeting", "formal")
        .unwrap();
    assert_eq!(formal.greet("ada"), "hello ada");
}

#[test]
fn test_equal_priority_declarations_resolve_in_source_order() {
    let entries = replacement_catalog().entries_in(&[package("tied")]);
    let order: Vec<_> = entries
        .iter()
        .map(|descriptor| descriptor.short_implementation())
        .collect();
    assert_eq!(order, vec!["CheerfulGreeting", "GrumpyGreeting"]);
    assert!(entries[0].line < entries[1].line);

    let mut builder = builder_with_original();
    builder.add_source(Box::new(CatalogSource::global([package("tied")])));
    let container = builder.build().unwrap();

    let greeting = container.resolve::<dyn Greeting>("greeting").unwrap();
    assert_eq!(greeting.greet("ada"), "hi ada!");

    let resolution = container.resolution();
    assert_eq!(resolution.diagnostics().len(), 1);
    assert!(resolution.diagnostics()[0].to_string().contains("GrumpyGreeting[7]"));
}

#[test]
fn test_mapping_pins_factory_replacement() {
    let mut mappings = BTreeMap::new();
    mappings.insert("greeting".to_string(), "QuietGreeting".to_string());

    let mut builder = builder_with_original();
    builder.add_source(Box::new(
        CatalogSource::global(Vec::<String>::new()).with_mappings(mappings),
    ));
    let container = builder.build().unwrap();

    let greeting = container.resolve::<dyn Greeting>("greeting").unwrap();
    assert_eq!(greeting.greet("ada"), "hello ada...");
}

#[test]
fn test_qualified_declaration_replaces_qualified_original() {
    let mut builder = builder_with_original();
    builder.add_source(Box::new(CatalogSource::global([package("formal")])));
    let container = builder.build().unwrap();

    let formal = container
        .resolve_qualified::<dyn Greeting>("greeting", "formal")
        .unwrap();
    assert_eq!(formal.greet("ada"), "Good day, ada");
    assert_eq!(
        container.resolve::<dyn Greeting>("greeting").unwrap().greet("ada"),
        "hello ada"
    );
}

#[test]
fn test_unscanned_package_is_ignored() {
    let mut builder = builder_with_original();
    builder.add_source(Box::new(CatalogSource::global([package("formal")])));
    let container = builder.build().unwrap();

    assert!(replacement_catalog().find_implementation("IgnoredGreeting").is_some());
    assert_ne!(
        container.resolve::<dyn Greeting>("greeting").unwrap().greet("ada"),
        "ignored"
    );
}

#[test]
fn test_factory_dependency_failure_surfaces_on_resolve() {
    let mut mappings = BTreeMap::new();
    mappings.insert("greeting".to_string(), "QuietGreeting".to_string());

    let mut builder = ContainerBuilder::new().with_config(ContainerConfig::default().lazy());
    builder
        .register::<dyn Greeting, _>("greeting", Lifetime::Singleton, |_: &dyn ServiceLocator| {
            Ok(Arc::new(PlainGreeting) as Arc<dyn Greeting>)
        })
        .unwrap();
    builder.add_source(Box::new(
        CatalogSource::global(Vec::<String>::new()).with_mappings(mappings),
    ));
    let container = builder.build().unwrap();

    // punctuation 未注册
    let result = container.resolve::<dyn Greeting>("greeting");
    assert!(matches!(result, Err(DependencyError::ComponentNotRegistered { .. })));
}
