//! 错误类型定义

use thiserror::Error;

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件不存在: {path}")]
    FileNotFound { path: String },

    #[error("配置解析失败: {source}")]
    ParseError {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("配置验证失败: {message}")]
    ValidationError { message: String },
}

/// 依赖注入错误类型
///
/// 在容器启动后解析、实例化服务时产生。
#[derive(Error, Debug)]
pub enum DependencyError {
    #[error("组件未注册: {key}")]
    ComponentNotRegistered { key: String },

    #[error("组件创建失败: {key}, 原因: {source}")]
    ComponentCreationFailed {
        key: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("循环依赖检测到: {dependency_chain}")]
    CircularDependency { dependency_chain: String },

    #[error("类型不匹配: {key}, 期望类型 {expected}")]
    TypeMismatch { key: String, expected: String },

    #[error("按类型解析不唯一: {type_name}, 候选: {candidates:?}")]
    AmbiguousType {
        type_name: String,
        candidates: Vec<String>,
    },
}

impl DependencyError {
    /// 创建组件创建失败错误
    pub fn creation_failed(
        key: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::ComponentCreationFailed {
            key: key.into(),
            source: source.into(),
        }
    }
}

/// 组件注册错误类型
#[derive(Error, Debug)]
pub enum ComponentError {
    #[error("组件重复注册: {key}")]
    DuplicateRegistration { key: String },

    #[error("注册源扫描失败: {source_name}, 原因: {message}")]
    ScanError { source_name: String, message: String },
}

impl ComponentError {
    /// 创建扫描错误
    pub fn scan_error(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ScanError {
            source_name: source_name.into(),
            message: message.into(),
        }
    }
}

/// 替换解析错误类型
///
/// 每个错误都对应一个服务标识，均为致命错误。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolutionError {
    #[error("替换实现的声明类型不兼容: {key}, 期望 {expected}, 冲突候选: {candidates:?}")]
    IncompatibleType {
        key: String,
        expected: String,
        candidates: Vec<String>,
    },

    #[error("替换目标不存在: {key}, 替换候选: {candidates:?}")]
    UnknownServiceKey { key: String, candidates: Vec<String> },

    #[error("服务存在多个原始注册: {key}, 冲突候选: {candidates:?}")]
    DuplicateOriginal { key: String, candidates: Vec<String> },

    #[error("服务没有任何候选注册: {key}")]
    EmptyCandidateSet { key: String },

    #[error("抑制落选候选后服务仍有 {} 个候选: {key}, 剩余候选: {candidates:?}", .candidates.len())]
    UnsuppressedCandidates { key: String, candidates: Vec<String> },
}

impl ResolutionError {
    /// 出错的服务标识
    pub fn key(&self) -> &str {
        match self {
            Self::IncompatibleType { key, .. }
            | Self::UnknownServiceKey { key, .. }
            | Self::DuplicateOriginal { key, .. }
            | Self::EmptyCandidateSet { key }
            | Self::UnsuppressedCandidates { key, .. } => key,
        }
    }
}

/// 容器启动错误类型
#[derive(Error, Debug)]
pub enum BootstrapError {
    #[error("组件替换解析失败: {}", format_resolution_errors(.errors))]
    Resolution { errors: Vec<ResolutionError> },

    #[error("已启用组件替换, 但没有找到替换配置, 请检查配置或者关闭组件替换")]
    NoReplacementsFound,

    #[error("组件注册失败: {source}")]
    Registration {
        #[from]
        source: ComponentError,
    },

    #[error("单例预实例化失败: {source}")]
    Instantiation {
        #[from]
        source: DependencyError,
    },
}

impl BootstrapError {
    /// 获取解析错误列表
    pub fn resolution_errors(&self) -> &[ResolutionError] {
        match self {
            Self::Resolution { errors } => errors,
            _ => &[],
        }
    }
}

fn format_resolution_errors(errors: &[ResolutionError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// 基础设施错误类型
#[derive(Error, Debug)]
pub enum InfrastructureError {
    #[error("配置错误: {source}")]
    ConfigError {
        #[from]
        source: ConfigError,
    },

    #[error("组件错误: {source}")]
    ComponentError {
        #[from]
        source: ComponentError,
    },

    #[error("容器启动失败: {source}")]
    BootstrapError {
        #[from]
        source: BootstrapError,
    },

    #[error("依赖注入错误: {source}")]
    DependencyError {
        #[from]
        source: DependencyError,
    },

    #[error("日志初始化失败: {message}")]
    LoggingInitFailed { message: String },
}
