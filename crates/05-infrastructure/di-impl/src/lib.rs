//! # 依赖注入具体实现
//!
//! 提供基于优先级的替换解析器、容器构建器、容器和替换目录注册源。
//!
//! ## 启动流程
//!
//! 1. [`ContainerBuilder`] 收集原始注册和替换注册
//! 2. [`PriorityOverrideResolver`] 为每个服务标识选出胜出者
//! 3. 落选的候选被抑制，永远不会实例化
//! 4. 冻结为不可变的 [`Container`]

pub mod builder;
pub mod container;
pub mod resolver;
pub mod scanner;

pub use builder::{ContainerBuilder, Replacement};
pub use container::Container;
pub use resolver::PriorityOverrideResolver;
pub use scanner::CatalogSource;
