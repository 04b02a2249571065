// ==========================================
// 技能任务分派系统 - 技能领域模型
// ==========================================
// 职责: 技能目录、任务技能要求、用户技能持有
// 红线: 等级范围 [1,5],越界数据不得静默修正
// ==========================================

use crate::domain::types::{SkillId, SKILL_LEVEL_MAX, SKILL_LEVEL_MIN};
use serde::{Deserialize, Serialize};

// ==========================================
// Skill - 技能目录项
// ==========================================
// 只读参考数据,引擎正确性不依赖它
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skill {
    pub id: SkillId,
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
}

// ==========================================
// SkillRequirement - 任务技能要求
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillRequirement {
    pub skill_id: SkillId,
    pub required_level: u8, // 1..=5
}

impl SkillRequirement {
    pub fn new(skill_id: SkillId, required_level: u8) -> Self {
        Self {
            skill_id,
            required_level,
        }
    }
}

// ==========================================
// SkillHolding - 用户技能持有
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillHolding {
    pub skill_id: SkillId,
    pub level: u8, // 1..=5
}

impl SkillHolding {
    pub fn new(skill_id: SkillId, level: u8) -> Self {
        Self { skill_id, level }
    }
}

/// 判断技能等级是否在合法范围 [1,5]
pub fn is_valid_level(level: u8) -> bool {
    (SKILL_LEVEL_MIN..=SKILL_LEVEL_MAX).contains(&level)
}
