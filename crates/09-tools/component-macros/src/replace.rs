//! 组件替换宏实现

use crate::utils::{optional_str, registration_fn_ident};
use proc_macro::TokenStream;
use quote::quote;
use syn::{
    parse::{Parse, ParseStream},
    parse_macro_input, Ident, ItemStruct, LitInt, LitStr, Path, Result, Token, Type,
};

/// 替换参数
pub struct ReplaceArgs {
    /// 替换的服务声明类型
    pub service: Type,
    /// 替换目标名称
    pub name: Option<LitStr>,
    /// 替换目标限定符
    pub qualifier: Option<LitStr>,
    /// 优先级
    pub priority: i32,
    /// 构造函数
    pub factory: Option<Path>,
}

impl Parse for ReplaceArgs {
    fn parse(input: ParseStream<'_>) -> Result<Self> {
        let mut service = None;
        let mut name = None;
        let mut qualifier = None;
        let mut priority = 0;
        let mut factory = None;

        while !input.is_empty() {
            let key: Ident = input.parse()?;
            input.parse::<Token![=]>()?;

            match key.to_string().as_str() {
                "service" => service = Some(input.parse::<Type>()?),
                "name" => name = Some(input.parse::<LitStr>()?),
                "qualifier" => qualifier = Some(input.parse::<LitStr>()?),
                "priority" => {
                    let negative = input.peek(Token![-]);
                    if negative {
                        input.parse::<Token![-]>()?;
                    }
                    let literal = input.parse::<LitInt>()?;
                    let magnitude: i64 = literal.base10_parse()?;
                    let value = if negative { -magnitude } else { magnitude };
                    priority = i32::try_from(value).map_err(|_| {
                        syn::Error::new(
                            literal.span(),
                            format!("priority 超出 i32 范围: {}", value),
                        )
                    })?;
                }
                "factory" => factory = Some(input.parse::<Path>()?),
                other => {
                    return Err(syn::Error::new(
                        key.span(),
                        format!("未知的 replace 参数: {}", other),
                    ))
                }
            }

            if input.is_empty() {
                break;
            }
            input.parse::<Token![,]>()?;
        }

        let service = service.ok_or_else(|| {
            syn::Error::new(input.span(), "#[replace] 缺少 service 参数, 例如 service = dyn CacheService")
        })?;

        Ok(Self {
            service,
            name,
            qualifier,
            priority,
            factory,
        })
    }
}

/// 实现 #[replace] 宏
pub fn replace_impl(args: TokenStream, input: TokenStream) -> TokenStream {
    let replace_args = parse_macro_input!(args as ReplaceArgs);
    let input_struct = parse_macro_input!(input as ItemStruct);

    if !input_struct.generics.params.is_empty() {
        return syn::Error::new_spanned(&input_struct.generics, "#[replace] 不支持泛型结构体")
            .to_compile_error()
            .into();
    }

    let registration_code = generate_registration_code(&input_struct.ident, &replace_args);

    let expanded = quote! {
        #input_struct

        #registration_code
    };

    TokenStream::from(expanded)
}

/// 生成替换声明的自动注册代码
fn generate_registration_code(struct_name: &Ident, args: &ReplaceArgs) -> proc_macro2::TokenStream {
    let registration_fn_name = registration_fn_ident("__register_replacement", struct_name);
    let struct_name_string = struct_name.to_string();
    let service = &args.service;
    let target = optional_str(args.name.as_ref());
    let qualifier = optional_str(args.qualifier.as_ref());
    let priority = args.priority;

    let construct = match &args.factory {
        Some(factory) => quote! { #factory(locator)? },
        None => quote! {
            {
                let _ = locator;
                <#struct_name as ::core::default::Default>::default()
            }
        },
    };

    quote! {
        // 使用 ctor 在程序启动时提交替换声明
        #[::ctor::ctor]
        fn #registration_fn_name() {
            fn __construct(
                locator: &dyn ::infrastructure_common::ServiceLocator,
            ) -> ::core::result::Result<
                ::infrastructure_common::Instance,
                ::infrastructure_common::DependencyError,
            > {
                let implementation: #struct_name = #construct;
                let service: ::std::sync::Arc<#service> = ::std::sync::Arc::new(implementation);
                ::core::result::Result::Ok(::infrastructure_common::into_instance(service))
            }

            ::infrastructure_common::replacement_catalog().submit(
                ::infrastructure_common::ReplacementDescriptor {
                    implementation: ::core::concat!(
                        ::core::module_path!(),
                        "::",
                        #struct_name_string
                    ),
                    module_path: ::core::module_path!(),
                    line: ::core::line!(),
                    target: #target,
                    qualifier: #qualifier,
                    service_type: ::infrastructure_common::TypeInfo::of::<#service>(),
                    priority: #priority,
                    factory: ::std::sync::Arc::new(__construct),
                },
            );
        }
    }
}
