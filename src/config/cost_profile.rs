// ==========================================
// 技能任务分派系统 - 成本模型配置
// ==========================================
// 职责: 成本公式权重、预设权重方案、引擎参数
// 预设: balanced / workload / skills / priority
// ==========================================

use crate::config::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// CostWeights - 成本公式权重
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostWeights {
    pub skill: f64,    // 技能差距惩罚权重
    pub load: f64,     // 超载惩罚权重
    pub priority: f64, // 优先级项权重
    pub deadline: f64, // 交期项权重
}

impl CostWeights {
    pub fn new(skill: f64, load: f64, priority: f64, deadline: f64) -> Self {
        Self {
            skill,
            load,
            priority,
            deadline,
        }
    }
}

impl Default for CostWeights {
    fn default() -> Self {
        WeightProfile::Balanced.weights()
    }
}

// ==========================================
// WeightProfile - 预设权重方案
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightProfile {
    Balanced,
    Workload,
    Skills,
    Priority,
}

impl WeightProfile {
    /// 预设权重 (skill, load, priority, deadline)
    pub fn weights(&self) -> CostWeights {
        match self {
            WeightProfile::Balanced => CostWeights::new(0.3, 0.3, 0.2, 0.2),
            WeightProfile::Workload => CostWeights::new(0.2, 0.6, 0.1, 0.1),
            WeightProfile::Skills => CostWeights::new(0.7, 0.1, 0.1, 0.1),
            WeightProfile::Priority => CostWeights::new(0.2, 0.1, 0.6, 0.1),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WeightProfile::Balanced => "balanced",
            WeightProfile::Workload => "workload",
            WeightProfile::Skills => "skills",
            WeightProfile::Priority => "priority",
        }
    }
}

impl Default for WeightProfile {
    fn default() -> Self {
        WeightProfile::Balanced
    }
}

impl fmt::Display for WeightProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for WeightProfile {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "balanced" => Ok(WeightProfile::Balanced),
            "workload" => Ok(WeightProfile::Workload),
            "skills" => Ok(WeightProfile::Skills),
            "priority" => Ok(WeightProfile::Priority),
            other => Err(ConfigError::UnknownProfile(other.to_string())),
        }
    }
}

// ==========================================
// EngineConfig - 引擎参数
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub weights: CostWeights,

    /// 超出要求等级的每级奖励（0~1,占所需等级的比例单位）
    #[serde(default = "default_overqualification_bonus")]
    pub overqualification_bonus: f64,

    /// 交期视野（天）: 距交期超过该天数时交期项取满值
    #[serde(default = "default_deadline_horizon_days")]
    pub deadline_horizon_days: f64,

    /// 超载惩罚缩放系数
    #[serde(default = "default_overload_scale")]
    pub overload_scale: f64,
}

fn default_overqualification_bonus() -> f64 {
    0.5
}

fn default_deadline_horizon_days() -> f64 {
    10.0
}

fn default_overload_scale() -> f64 {
    100.0
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            weights: CostWeights::default(),
            overqualification_bonus: default_overqualification_bonus(),
            deadline_horizon_days: default_deadline_horizon_days(),
            overload_scale: default_overload_scale(),
        }
    }
}

impl EngineConfig {
    /// 使用预设权重方案创建配置
    pub fn with_profile(profile: WeightProfile) -> Self {
        Self {
            weights: profile.weights(),
            ..Self::default()
        }
    }

    /// 从 JSON 文本加载配置（缺省字段取默认值）
    pub fn from_json_str(raw: &str) -> ConfigResult<Self> {
        let config: EngineConfig = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// 校验参数范围
    pub fn validate(&self) -> ConfigResult<()> {
        let weights = [
            ("weights.skill", self.weights.skill),
            ("weights.load", self.weights.load),
            ("weights.priority", self.weights.priority),
            ("weights.deadline", self.weights.deadline),
            ("overload_scale", self.overload_scale),
        ];
        for (field, value) in weights {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    message: format!("必须为有限非负数, 实际 {}", value),
                });
            }
        }

        if !(0.0..=1.0).contains(&self.overqualification_bonus) {
            return Err(ConfigError::InvalidValue {
                field: "overqualification_bonus".to_string(),
                message: format!("必须在 [0, 1], 实际 {}", self.overqualification_bonus),
            });
        }

        if !self.deadline_horizon_days.is_finite() || self.deadline_horizon_days <= 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "deadline_horizon_days".to_string(),
                message: format!("必须为正数, 实际 {}", self.deadline_horizon_days),
            });
        }

        Ok(())
    }
}
