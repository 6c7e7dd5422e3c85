//! # Configuration Implementation
//!
//! 组件替换配置的绑定实现。
//!
//! ## 主要组件
//!
//! - [`ReplaceProperties`] - `replace` 配置节
//! - [`ReplaceMapping`] - 服务名称到替换实现的映射
//! - [`ReplacePropertiesBinder`] - 从配置文件和环境变量绑定配置

pub mod binder;
pub mod properties;

pub use binder::*;
pub use properties::{ReplaceMapping, ReplaceProperties, REPLACE_SECTION};
