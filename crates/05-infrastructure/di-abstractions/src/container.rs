//! 容器配置与统计

/// 容器配置
#[derive(Debug, Clone)]
pub struct ContainerConfig {
    /// 启动时是否预实例化单例
    pub pre_instantiate_singletons: bool,
    /// 是否启用组件替换，关闭时所有原始注册胜出
    pub replacement_enabled: bool,
    /// 启用组件替换时是否要求至少存在一个替换
    pub require_replacements: bool,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            pre_instantiate_singletons: true,
            replacement_enabled: true,
            require_replacements: false,
        }
    }
}

impl ContainerConfig {
    /// 关闭组件替换
    pub fn without_replacement(mut self) -> Self {
        self.replacement_enabled = false;
        self
    }

    /// 关闭单例预实例化
    pub fn lazy(mut self) -> Self {
        self.pre_instantiate_singletons = false;
        self
    }
}

/// 容器统计信息
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContainerStats {
    /// 服务标识数量
    pub registered_services: usize,
    /// 由替换实现胜出的服务数量
    pub replaced_services: usize,
    /// 被抑制的候选数量
    pub suppressed_candidates: usize,
    /// 已创建的单例数量
    pub active_singletons: usize,
    /// 实例创建总次数
    pub constructions: usize,
}
