//! 宏工具函数

use proc_macro2::{Span, TokenStream};
use quote::quote;
use syn::{Ident, LitStr};

/// 驼峰命名转换为蛇形命名
pub fn to_snake_case(name: &str) -> String {
    let mut result = String::with_capacity(name.len() + 4);
    for (index, c) in name.chars().enumerate() {
        if c.is_uppercase() {
            if index > 0 {
                result.push('_');
            }
            result.extend(c.to_lowercase());
        } else {
            result.push(c);
        }
    }
    result
}

/// 生成注册函数名称
pub fn registration_fn_ident(prefix: &str, struct_name: &Ident) -> Ident {
    Ident::new(
        &format!("{}_{}", prefix, to_snake_case(&struct_name.to_string())),
        Span::call_site(),
    )
}

/// 生成 `Option<&'static str>` 表达式
pub fn optional_str(value: Option<&LitStr>) -> TokenStream {
    match value {
        Some(value) => quote! { ::core::option::Option::Some(#value) },
        None => quote! { ::core::option::Option::None },
    }
}
