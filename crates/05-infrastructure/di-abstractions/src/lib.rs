//! # Dependency Injection Abstractions
//!
//! 依赖注入抽象层，定义候选注册、替换解析和注册抑制的核心接口。
//!
//! ## 核心接口
//!
//! - [`RegistrationSource`] - 注册扫描接口
//! - [`OverrideResolver`] - 替换解析接口
//! - [`RegistrationSuppressor`] - 注册抑制接口
//! - [`ResolutionResult`] - 不可变的解析结果

pub mod container;
pub mod registry;
pub mod resolver;
pub mod scanner;

pub use container::*;
pub use registry::*;
pub use resolver::*;
pub use scanner::*;
