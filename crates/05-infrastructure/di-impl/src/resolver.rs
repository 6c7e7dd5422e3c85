//! 基于优先级的替换解析器

use di_abstractions::{
    CandidateMap, OverrideResolver, ResolutionDiagnostic, ResolutionResult, ResolvedService,
};
use infrastructure_common::{BootstrapError, Candidate, ResolutionError, ServiceKey};
use tracing::{debug, error, info, warn};

/// 基于优先级的替换解析器
///
/// - 没有替换候选时原始注册胜出
/// - 有替换候选时优先级最高的替换胜出，原始注册被抑制
/// - 优先级相同时先声明的胜出，并记录诊断
/// - 替换候选的声明类型与原始注册不兼容时解析失败
#[derive(Debug, Default, Clone, Copy)]
pub struct PriorityOverrideResolver;

impl PriorityOverrideResolver {
    pub fn new() -> Self {
        Self
    }

    fn resolve_key(
        &self,
        key: ServiceKey,
        candidates: Vec<Candidate>,
    ) -> Result<(ResolvedService, Option<ResolutionDiagnostic>), ResolutionError> {
        if candidates.is_empty() {
            return Err(ResolutionError::EmptyCandidateSet {
                key: key.to_string(),
            });
        }

        let (mut originals, mut replacements): (Vec<Candidate>, Vec<Candidate>) = candidates
            .into_iter()
            .partition(|candidate| !candidate.is_replacement());

        if originals.is_empty() {
            return Err(ResolutionError::UnknownServiceKey {
                key: key.to_string(),
                candidates: describe_all(&replacements),
            });
        }
        if originals.len() > 1 {
            return Err(ResolutionError::DuplicateOriginal {
                key: key.to_string(),
                candidates: describe_all(&originals),
            });
        }
        let original = originals.remove(0);

        let incompatible: Vec<String> = replacements
            .iter()
            .filter(|candidate| {
                !candidate
                    .declared_type()
                    .is_compatible_with(original.declared_type())
            })
            .map(|candidate| format!("{} ({})", candidate.describe(), candidate.declared_type()))
            .collect();
        if !incompatible.is_empty() {
            return Err(ResolutionError::IncompatibleType {
                key: key.to_string(),
                expected: original.declared_type().to_string(),
                candidates: incompatible,
            });
        }

        if replacements.is_empty() {
            debug!("服务 {} 没有替换, 使用原始注册 {}", key, original.implementation());
            return Ok((
                ResolvedService {
                    key,
                    winner: original,
                    suppressed: Vec::new(),
                },
                None,
            ));
        }

        replacements.sort_by_key(|candidate| candidate.source().declaration_index);
        // 严格大于才更新，同级时保留先声明的候选
        let mut position = 0;
        for (index, candidate) in replacements.iter().enumerate().skip(1) {
            if candidate.priority() > replacements[position].priority() {
                position = index;
            }
        }
        let highest = replacements[position].priority();
        let winner = replacements.remove(position).with_lifetime(original.lifetime());

        let tied: Vec<String> = replacements
            .iter()
            .filter(|candidate| candidate.priority() == highest)
            .map(Candidate::describe)
            .collect();
        let diagnostic = (!tied.is_empty()).then(|| ResolutionDiagnostic::AmbiguousReplacement {
            key: key.to_string(),
            priority: highest,
            chosen: winner.describe(),
            tied,
        });

        debug!(
            "服务 {} 由 {} 替换 {}",
            key,
            winner.describe(),
            original.implementation()
        );

        let mut suppressed = Vec::with_capacity(replacements.len() + 1);
        suppressed.push(original);
        suppressed.extend(replacements);

        Ok((
            ResolvedService {
                key,
                winner,
                suppressed,
            },
            diagnostic,
        ))
    }
}

impl OverrideResolver for PriorityOverrideResolver {
    fn resolve(&self, candidates: CandidateMap) -> Result<ResolutionResult, BootstrapError> {
        let mut services = Vec::with_capacity(candidates.len());
        let mut diagnostics = Vec::new();
        let mut errors = Vec::new();

        for (key, group) in candidates.into_groups() {
            match self.resolve_key(key, group) {
                Ok((service, diagnostic)) => {
                    services.push(service);
                    diagnostics.extend(diagnostic);
                }
                Err(resolution_error) => {
                    error!("{}", resolution_error);
                    errors.push(resolution_error);
                }
            }
        }

        if !errors.is_empty() {
            return Err(BootstrapError::Resolution { errors });
        }

        for diagnostic in &diagnostics {
            warn!("{}", diagnostic);
        }

        let result = ResolutionResult::new(services, diagnostics);
        info!(
            "替换解析完成: {} 个服务, {} 个被替换",
            result.len(),
            result.replaced().count()
        );
        Ok(result)
    }
}

fn describe_all(candidates: &[Candidate]) -> Vec<String> {
    candidates.iter().map(Candidate::describe).collect()
}
