// ==========================================
// 技能任务分派系统 - 用户领域模型
// ==========================================
// 职责: 候选执行人快照（技能、产能、当前负载）
// ==========================================

use crate::domain::skill::SkillHolding;
use crate::domain::types::UserId;
use serde::{Deserialize, Serialize};

// ==========================================
// User - 候选执行人
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    #[serde(default)]
    pub username: String,

    // ===== 产能 =====
    #[serde(default = "default_capacity")]
    pub workload_capacity: f64, // 产能上限 (小时, > 0)
    #[serde(default)]
    pub current_workload: f64, // 已承诺负载 (小时, >= 0)

    // ===== 技能 =====
    #[serde(default)]
    pub skills: Vec<SkillHolding>,

    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_capacity() -> f64 {
    100.0
}

fn default_active() -> bool {
    true
}

impl User {
    /// 创建一个活跃用户（默认 100 小时产能、零负载、无技能）
    pub fn new(id: UserId) -> Self {
        Self {
            id,
            username: format!("user-{}", id),
            workload_capacity: default_capacity(),
            current_workload: 0.0,
            skills: Vec::new(),
            is_active: true,
        }
    }

    pub fn with_capacity(mut self, capacity: f64) -> Self {
        self.workload_capacity = capacity;
        self
    }

    pub fn with_workload(mut self, workload: f64) -> Self {
        self.current_workload = workload;
        self
    }

    pub fn with_skill(mut self, skill_id: i64, level: u8) -> Self {
        self.skills.push(SkillHolding::new(skill_id, level));
        self
    }

    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }
}
