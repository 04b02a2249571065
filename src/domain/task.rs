// ==========================================
// 技能任务分派系统 - 任务领域模型
// ==========================================
// 职责: 待分派任务快照
// 约束: 进入引擎时 assignee_id 必须为空
// ==========================================

use crate::domain::skill::SkillRequirement;
use crate::domain::types::{TaskId, TaskPriority, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// Task - 任务
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    // ===== 主键 =====
    pub id: TaskId,
    #[serde(default)]
    pub title: String,

    // ===== 排序与紧急度 =====
    #[serde(default)]
    pub priority: TaskPriority,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,

    // ===== 工作量 =====
    #[serde(default = "default_estimated_hours")]
    pub estimated_hours: f64, // 预估工时 (小时, >= 0)

    // ===== 技能要求 =====
    #[serde(default)]
    pub required_skills: Vec<SkillRequirement>,

    // ===== 分派状态 =====
    #[serde(default)]
    pub assignee_id: Option<UserId>,
}

fn default_estimated_hours() -> f64 {
    1.0
}

impl Task {
    /// 创建一个未分派任务（默认 Medium 优先级、1 小时工时、无技能要求）
    pub fn new(id: TaskId) -> Self {
        Self {
            id,
            title: format!("task-{}", id),
            priority: TaskPriority::default(),
            due_date: None,
            estimated_hours: default_estimated_hours(),
            required_skills: Vec::new(),
            assignee_id: None,
        }
    }

    pub fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_due_date(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(due_date);
        self
    }

    pub fn with_estimated_hours(mut self, hours: f64) -> Self {
        self.estimated_hours = hours;
        self
    }

    pub fn require(mut self, skill_id: i64, required_level: u8) -> Self {
        self.required_skills
            .push(SkillRequirement::new(skill_id, required_level));
        self
    }
}
