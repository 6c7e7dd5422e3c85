//! 候选注册表抽象
//!
//! 启动阶段收集到的候选按服务标识分组，组内保持声明顺序。

use infrastructure_common::{Candidate, ServiceKey, TypeInfo};
use std::collections::HashMap;

/// 候选分组
///
/// 服务标识到有序候选序列的多重映射，分组之间保持首次出现的顺序。
#[derive(Debug, Default, Clone)]
pub struct CandidateMap {
    groups: Vec<(ServiceKey, Vec<Candidate>)>,
    index: HashMap<ServiceKey, usize>,
}

impl CandidateMap {
    /// 创建空的候选分组
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加候选到服务标识的序列末尾
    pub fn insert(&mut self, key: ServiceKey, candidate: Candidate) {
        let position = self.ensure_key(key);
        self.groups[position].1.push(candidate);
    }

    /// 确保服务标识存在，返回其分组位置
    pub fn ensure_key(&mut self, key: ServiceKey) -> usize {
        if let Some(position) = self.index.get(&key) {
            return *position;
        }
        let position = self.groups.len();
        self.index.insert(key.clone(), position);
        self.groups.push((key, Vec::new()));
        position
    }

    /// 获取服务标识的候选序列
    pub fn get(&self, key: &ServiceKey) -> Option<&[Candidate]> {
        self.index
            .get(key)
            .map(|position| self.groups[*position].1.as_slice())
    }

    pub fn contains_key(&self, key: &ServiceKey) -> bool {
        self.index.contains_key(key)
    }

    /// 按名称和限定符查找服务标识，优先返回声明类型相同的标识
    pub fn find_target(
        &self,
        name: &str,
        qualifier: Option<&str>,
        service_type: &TypeInfo,
    ) -> Option<&ServiceKey> {
        let mut matching = self
            .groups
            .iter()
            .map(|(key, _)| key)
            .filter(|key| key.matches_target(name, qualifier));
        let first = matching.next()?;
        if first.service_type() == service_type {
            return Some(first);
        }
        matching
            .find(|key| key.service_type() == service_type)
            .or(Some(first))
    }

    /// 按声明顺序遍历分组
    pub fn groups(&self) -> impl Iterator<Item = (&ServiceKey, &[Candidate])> {
        self.groups
            .iter()
            .map(|(key, candidates)| (key, candidates.as_slice()))
    }

    /// 取出所有分组
    pub fn into_groups(self) -> Vec<(ServiceKey, Vec<Candidate>)> {
        self.groups
    }

    pub fn keys(&self) -> impl Iterator<Item = &ServiceKey> {
        self.groups.iter().map(|(key, _)| key)
    }

    /// 候选总数
    pub fn candidate_count(&self) -> usize {
        self.groups.iter().map(|(_, candidates)| candidates.len()).sum()
    }

    /// 服务标识数量
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// 注册抑制接口
///
/// 解析完成后，容器通过它移除落选的候选，落选候选永远不会被实例化。
pub trait RegistrationSuppressor {
    /// 抑制服务标识下的一个候选
    fn suppress(&mut self, key: &ServiceKey, candidate: &Candidate);
}

impl RegistrationSuppressor for CandidateMap {
    /// 从服务标识的序列中移除该候选，分组本身保留
    fn suppress(&mut self, key: &ServiceKey, candidate: &Candidate) {
        if let Some(position) = self.index.get(key) {
            self.groups[*position]
                .1
                .retain(|registered| !registered.is_same_registration(candidate));
        }
    }
}
