//! # Infrastructure Common
//!
//! 组件替换的公共模型：服务标识、候选注册、替换目录和错误类型。
//!
//! ## 核心类型
//!
//! - [`ServiceKey`] - 可替换服务的标识（名称、声明类型、限定符）
//! - [`Candidate`] - 竞争同一服务标识的一个具体注册
//! - [`ServiceLocator`] - 工厂函数获取依赖的入口
//! - [`ReplacementCatalog`] - `#[replace]` 宏提交替换声明的全局目录
//!
//! ## 设计原则
//!
//! - 替换决策只依赖抽象的候选模型，不依赖具体容器
//! - 启动阶段可变，解析完成后只读

pub mod candidate;
pub mod catalog;
pub mod conventions;
pub mod errors;
pub mod key;
pub mod lifecycle;
pub mod metadata;

pub use candidate::*;
pub use catalog::*;
pub use conventions::*;
pub use errors::*;
pub use key::*;
pub use lifecycle::*;
pub use metadata::*;
