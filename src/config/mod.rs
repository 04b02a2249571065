// ==========================================
// 技能任务分派系统 - 配置层
// ==========================================
// 职责: 成本模型参数、预设权重方案、配置覆写读取
// 存储: config_kv 表 / JSON 文件
// ==========================================

pub mod config_manager;
pub mod cost_profile;
pub mod error;

// 重导出核心配置类型
pub use config_manager::{config_keys, ConfigManager};
pub use cost_profile::{CostWeights, EngineConfig, WeightProfile};
pub use error::{ConfigError, ConfigResult};
