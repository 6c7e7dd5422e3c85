//! 替换解析抽象接口
//!
//! 解析器只依赖 [`ServiceKey`] 和 [`Candidate`]，不依赖具体容器。

use crate::registry::CandidateMap;
use infrastructure_common::{BootstrapError, Candidate, ServiceKey};
use std::collections::HashMap;
use std::fmt;

/// 替换解析器 trait
///
/// 为每个服务标识从候选中选出唯一的胜出者。
pub trait OverrideResolver: Send + Sync {
    /// 解析候选分组
    ///
    /// 所有服务标识的致命错误会一并收集到 [`BootstrapError::Resolution`] 中返回。
    fn resolve(&self, candidates: CandidateMap) -> Result<ResolutionResult, BootstrapError>;
}

/// 单个服务标识的解析结果
#[derive(Debug, Clone)]
pub struct ResolvedService {
    /// 服务标识
    pub key: ServiceKey,
    /// 胜出的候选
    pub winner: Candidate,
    /// 被抑制的候选，永远不会被实例化
    pub suppressed: Vec<Candidate>,
}

impl ResolvedService {
    /// 是否由替换实现胜出
    pub fn is_replaced(&self) -> bool {
        self.winner.is_replacement()
    }
}

/// 解析诊断（非致命）
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionDiagnostic {
    /// 多个替换实现的优先级相同，按声明顺序选择了第一个
    AmbiguousReplacement {
        key: String,
        priority: i32,
        chosen: String,
        tied: Vec<String>,
    },
}

impl fmt::Display for ResolutionDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AmbiguousReplacement {
                key,
                priority,
                chosen,
                tied,
            } => write!(
                f,
                "替换实现优先级相同: {}, 优先级 {}, 选择 {}, 同级候选: {:?}",
                key, priority, chosen, tied
            ),
        }
    }
}

/// 解析结果
///
/// 每个输入的服务标识都恰好对应一个胜出者，解析完成后不可变。
#[derive(Debug, Clone, Default)]
pub struct ResolutionResult {
    services: Vec<ResolvedService>,
    index: HashMap<ServiceKey, usize>,
    diagnostics: Vec<ResolutionDiagnostic>,
}

impl ResolutionResult {
    /// 由解析出的服务和诊断构造结果
    pub fn new(services: Vec<ResolvedService>, diagnostics: Vec<ResolutionDiagnostic>) -> Self {
        let index = services
            .iter()
            .enumerate()
            .map(|(position, service)| (service.key.clone(), position))
            .collect();
        Self {
            services,
            index,
            diagnostics,
        }
    }

    /// 获取服务标识的胜出候选
    pub fn get(&self, key: &ServiceKey) -> Option<&Candidate> {
        self.resolved(key).map(|service| &service.winner)
    }

    /// 获取服务标识的完整解析结果
    pub fn resolved(&self, key: &ServiceKey) -> Option<&ResolvedService> {
        self.index.get(key).map(|position| &self.services[*position])
    }

    /// 按声明顺序遍历解析结果
    pub fn services(&self) -> &[ResolvedService] {
        &self.services
    }

    /// 由替换实现胜出的服务
    pub fn replaced(&self) -> impl Iterator<Item = &ResolvedService> {
        self.services.iter().filter(|service| service.is_replaced())
    }

    /// 所有被抑制的候选
    pub fn suppressed(&self) -> impl Iterator<Item = (&ServiceKey, &Candidate)> {
        self.services.iter().flat_map(|service| {
            service
                .suppressed
                .iter()
                .map(move |candidate| (&service.key, candidate))
        })
    }

    pub fn diagnostics(&self) -> &[ResolutionDiagnostic] {
        &self.diagnostics
    }

    pub fn keys(&self) -> impl Iterator<Item = &ServiceKey> {
        self.services.iter().map(|service| &service.key)
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    /// 替换报告，按服务标识排序
    pub fn replacement_report(&self) -> String {
        let mut lines: Vec<String> = self
            .replaced()
            .map(|service| format!("  {} 替换 {};", service.winner.describe(), service.key))
            .collect();
        if lines.is_empty() {
            return "没有组件被替换".to_string();
        }
        lines.sort();
        format!("替换组件配置如下:\n{}", lines.join("\n"))
    }
}
