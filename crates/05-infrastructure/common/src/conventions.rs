//! 约定规范
//!
//! 服务名称推断与扫描包路径的处理规则

use crate::metadata::TypeInfo;

/// 模块路径分隔符
pub const PACKAGE_SEPARATOR: &str = "::";

/// 由声明类型推断服务名称
///
/// `dyn app::HelloService` 推断为 `helloService`。
pub fn deduce_service_name(service_type: &TypeInfo) -> String {
    decapitalize(service_type.short_name())
}

/// 首字母小写
///
/// 前两个字符都是大写时保持原样，`URLService` 不变。
pub fn decapitalize(name: &str) -> String {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };
    if let Some(second) = name.chars().nth(1) {
        if first.is_uppercase() && second.is_uppercase() {
            return name.to_string();
        }
    }
    first.to_lowercase().chain(chars).collect()
}

/// 解析逗号分隔的包路径列表
pub fn split_packages(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|package| !package.is_empty())
        .map(str::to_string)
        .collect()
}

/// 规范化扫描包路径
///
/// 去除空白和重复项；存在包含关系时只保留最短的路径，
/// 例如 `app::ext` 与 `app::ext::cache` 只保留 `app::ext`。
pub fn normalize_packages<I, S>(packages: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut sorted: Vec<String> = packages
        .into_iter()
        .map(|package| package.as_ref().trim().trim_end_matches(PACKAGE_SEPARATOR).to_string())
        .filter(|package| !package.is_empty())
        .collect();
    sorted.sort();
    sorted.dedup();

    let mut result: Vec<String> = Vec::with_capacity(sorted.len());
    for package in sorted {
        if !result.iter().any(|kept| in_package(&package, kept)) {
            result.push(package);
        }
    }
    result
}

/// 模块路径是否位于指定包内（包含包本身）
pub fn in_package(module_path: &str, package: &str) -> bool {
    match module_path.strip_prefix(package) {
        Some(rest) => rest.is_empty() || rest.starts_with(PACKAGE_SEPARATOR),
        None => false,
    }
}

/// 模块路径是否位于任一包内
pub fn in_any_package(module_path: &str, packages: &[String]) -> bool {
    packages.iter().any(|package| in_package(module_path, package))
}
