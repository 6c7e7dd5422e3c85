//! # Component Macros
//!
//! 这个 crate 提供了用于声明组件替换的过程宏。
//!
//! ## 核心宏
//!
//! - [`replace`] - 声明替换实现，程序启动时自动提交到全局替换目录
//!
//! ## 使用示例
//!
//! ```rust,ignore
//! use component_macros::replace;
//!
//! pub trait CacheService: Send + Sync {
//!     fn get(&self, key: &str) -> Option<String>;
//! }
//!
//! #[derive(Default)]
//! #[replace(service = dyn CacheService, name = "cache", priority = 5)]
//! pub struct RedisCache;
//! ```

use proc_macro::TokenStream;

mod replace;
mod utils;

// Re-exports are not allowed in proc-macro crates

/// 替换声明宏
///
/// 为结构体生成一个启动时执行的注册函数，把替换声明提交到
/// `infrastructure_common::replacement_catalog()`。使用方需要依赖
/// `infrastructure-common` 和 `ctor`。
///
/// # 参数
///
/// - `service = <type>` - 替换的服务声明类型（必需），如 `dyn CacheService`
/// - `name = "name"` - 替换目标名称，默认由声明类型推断（`CacheService` 推断为 `cacheService`）
/// - `qualifier = "q"` - 替换目标限定符
/// - `priority = N` - 优先级（默认为 0），数值越高优先级越高
/// - `factory = path` - 构造函数 `fn(&dyn ServiceLocator) -> Result<Self, DependencyError>`，
///   默认使用 `Default::default()`
///
/// # 示例
///
/// ```rust,ignore
/// #[replace(service = dyn CacheService, priority = 10, factory = RedisCache::connect)]
/// pub struct RedisCache {
///     client: Arc<dyn RedisClient>,
/// }
/// ```
#[proc_macro_attribute]
pub fn replace(args: TokenStream, input: TokenStream) -> TokenStream {
    replace::replace_impl(args, input)
}
