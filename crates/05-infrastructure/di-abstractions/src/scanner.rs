//! 注册扫描抽象接口

use infrastructure_common::{Candidate, ComponentError, ServiceKey};

/// 扫描得到的注册
#[derive(Debug, Clone)]
pub struct ScannedRegistration {
    /// 目标服务名称
    pub name: String,
    /// 目标限定符
    pub qualifier: Option<String>,
    /// 候选注册
    pub candidate: Candidate,
}

impl ScannedRegistration {
    pub fn new(name: impl Into<String>, qualifier: Option<String>, candidate: Candidate) -> Self {
        Self {
            name: name.into(),
            qualifier,
            candidate,
        }
    }

    /// 以候选的声明类型构造服务标识
    pub fn service_key(&self) -> ServiceKey {
        ServiceKey::new(self.name.clone(), *self.candidate.declared_type())
            .with_optional_qualifier(self.qualifier.clone())
    }
}

/// 注册源
///
/// 容器启动时从注册源扫描候选，每个候选带有类型、名称、限定符和优先级。
pub trait RegistrationSource: Send + Sync {
    /// 注册源名称，用于诊断输出
    fn name(&self) -> &str;

    /// 扫描注册
    fn scan(&self) -> Result<Vec<ScannedRegistration>, ComponentError>;
}
