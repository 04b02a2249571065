// ==========================================
// 技能任务分派系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型、值对象
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod assignment;
pub mod skill;
pub mod task;
pub mod types;
pub mod user;

// 重导出核心类型
pub use assignment::{AssignmentEntry, AssignmentResult, WorkloadSnapshot};
pub use skill::{Skill, SkillHolding, SkillRequirement};
pub use task::Task;
pub use types::{
    AssignmentStrategy, SkillId, TaskId, TaskPriority, TaskStatus, UnassignedReason, UserId,
};
pub use user::User;
