//! # 基础设施组合层
//!
//! 把组件替换配置、日志、替换目录扫描和依赖注入容器组合成可运行的应用。
//!
//! ## 主要功能
//!
//! - **应用构建器**: 使用构建者模式组装配置与容器
//! - **替换扫描**: 按 `replace.packages` 扫描 `#[replace]` 声明
//! - **日志初始化**: 开发和生产环境的日志预设
//!
//! ## 基本使用
//!
//! ```rust,no_run
//! use infrastructure_composition::{Application, LoggingConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let application = Application::builder()
//!         .with_logging(LoggingConfig::development())
//!         .build()?;
//!
//!     println!("{}", application.replacement_report());
//!     Ok(())
//! }
//! ```

pub mod application;
pub mod builder;
pub mod logging;

#[cfg(test)]
#[path = "tests/integration_tests.rs"]
mod integration_tests;

// 重新导出主要类型
pub use application::Application;
pub use builder::ApplicationBuilder;
pub use logging::LoggingConfig;

// 重新导出错误类型
pub use infrastructure_common::InfrastructureError;
