//! # 示例应用程序
//!
//! 演示如何通过 `#[replace]` 和配置替换容器中已注册的组件

use clap::Parser;
use config_impl::ReplacePropertiesBinder;
use infrastructure_common::{DependencyError, Lifetime, ServiceLocator};
use infrastructure_composition::{Application, LoggingConfig};
use std::sync::Arc;
use tracing::info;

/// 命令行参数
#[derive(Parser, Debug)]
#[command(name = "example-app")]
#[command(about = "组件替换示例应用")]
struct Args {
    /// 配置文件路径
    #[arg(short, long)]
    config: Option<String>,

    /// 扫描替换声明的包路径，覆盖配置文件
    #[arg(short, long)]
    package: Vec<String>,

    /// 关闭组件替换
    #[arg(long)]
    disable_replace: bool,

    /// 日志级别
    #[arg(long, default_value = "info")]
    log_level: String,

    /// 使用 JSON 格式输出日志
    #[arg(long)]
    json: bool,
}

/// 价格服务
pub trait PricingService: Send + Sync {
    fn quote(&self, sku: &str) -> u32;
}

/// 审计输出
pub trait AuditSink: Send + Sync {
    fn record(&self, message: &str);
}

struct ListPricing;

impl PricingService for ListPricing {
    fn quote(&self, _sku: &str) -> u32 {
        100
    }
}

struct SilentAuditSink;

impl AuditSink for SilentAuditSink {
    fn record(&self, _message: &str) {}
}

/// 报价台，依赖价格服务和审计输出
struct QuoteDesk {
    pricing: Arc<dyn PricingService>,
    audit: Arc<dyn AuditSink>,
}

impl QuoteDesk {
    fn create(locator: &dyn ServiceLocator) -> Result<Arc<Self>, DependencyError> {
        Ok(Arc::new(Self {
            pricing: locator.get::<dyn PricingService>("pricingService")?,
            audit: locator.get::<dyn AuditSink>("auditSink")?,
        }))
    }

    fn quote(&self, sku: &str) -> u32 {
        let price = self.pricing.quote(sku);
        self.audit.record(&format!("{} 报价 {}", sku, price));
        price
    }
}

/// 扩展包，其中的替换声明由 `replace.packages` 决定是否生效
mod ext {
    use super::{AuditSink, PricingService};
    use component_macros::replace;
    use infrastructure_common::{DependencyError, ServiceLocator};
    use std::sync::Arc;
    use tracing::info;

    #[derive(Default)]
    #[replace(service = dyn PricingService, priority = 1)]
    pub struct PromotionPricing;

    impl PricingService for PromotionPricing {
        fn quote(&self, _sku: &str) -> u32 {
            90
        }
    }

    /// 会员价依赖促销折扣率
    #[replace(service = dyn PricingService, priority = 5, factory = MemberPricing::create)]
    pub struct MemberPricing {
        discount: Arc<u32>,
    }

    impl MemberPricing {
        fn create(locator: &dyn ServiceLocator) -> Result<Self, DependencyError> {
            Ok(Self {
                discount: locator.get::<u32>("memberDiscount")?,
            })
        }
    }

    impl PricingService for MemberPricing {
        fn quote(&self, _sku: &str) -> u32 {
            100 - *self.discount
        }
    }

    #[derive(Default)]
    #[replace(service = dyn AuditSink)]
    pub struct ConsoleAuditSink;

    impl AuditSink for ConsoleAuditSink {
        fn record(&self, message: &str) {
            info!("审计: {}", message);
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let logging = LoggingConfig {
        level: args.log_level.parse()?,
        json_format: args.json,
        ..LoggingConfig::default()
    };

    let mut binder = ReplacePropertiesBinder::new();
    if let Some(config) = &args.config {
        binder = binder.add_file(config)?;
    }
    let mut properties = binder.bind()?;
    if !args.package.is_empty() {
        properties.packages = args.package.clone();
    }
    if args.disable_replace {
        properties.enabled = false;
    }

    let application = Application::builder()
        .with_logging(logging)
        .with_properties(properties)
        .configure(|container| {
            container.register::<dyn PricingService, _>(
                "pricingService",
                Lifetime::Singleton,
                |_: &dyn ServiceLocator| Ok(Arc::new(ListPricing) as Arc<dyn PricingService>),
            )?;
            container.register::<dyn AuditSink, _>(
                "auditSink",
                Lifetime::Singleton,
                |_: &dyn ServiceLocator| Ok(Arc::new(SilentAuditSink) as Arc<dyn AuditSink>),
            )?;
            container.register_instance::<u32>("memberDiscount", Arc::new(15))?;
            container.register::<QuoteDesk, _>(
                "quoteDesk",
                Lifetime::Transient,
                QuoteDesk::create,
            )?;
            Ok(())
        })?
        .build()?;

    let desk = application.resolve::<QuoteDesk>("quoteDesk")?;
    for sku in ["sku-1001", "sku-2002"] {
        info!("{} 的报价: {}", sku, desk.quote(sku));
    }

    println!("{}", application.replacement_report());
    application.report_pending_replacements();
    Ok(())
}
