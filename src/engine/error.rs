// ==========================================
// 技能任务分派系统 - 引擎层错误类型
// ==========================================
// 红线: 资格/成本问题是数据级结果,不是错误
//       只有畸形输入与求解器不变量违反才报错
// 工具: thiserror 派生宏
// ==========================================

use crate::domain::types::{SkillId, TaskId, UserId};
use thiserror::Error;

/// 引擎层错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    // ===== 输入校验错误（调用方应预先校验） =====
    #[error("技能等级越界: {owner}, skill_id={skill_id}, level={level}（合法范围 [1,5]）")]
    InvalidSkillLevel {
        owner: String,
        skill_id: SkillId,
        level: u8,
    },

    #[error("用户产能无效: user_id={user_id}, workload_capacity={capacity}")]
    InvalidCapacity { user_id: UserId, capacity: f64 },

    #[error("用户当前负载无效: user_id={user_id}, current_workload={workload}")]
    InvalidWorkload { user_id: UserId, workload: f64 },

    #[error("任务预估工时无效: task_id={task_id}, estimated_hours={hours}")]
    InvalidEffort { task_id: TaskId, hours: f64 },

    #[error("任务ID重复: task_id={0}")]
    DuplicateTaskId(TaskId),

    #[error("用户ID重复: user_id={0}")]
    DuplicateUserId(UserId),

    #[error("任务已有执行人: task_id={task_id}, assignee_id={assignee_id}")]
    TaskAlreadyAssigned { task_id: TaskId, assignee_id: UserId },

    #[error("引擎参数无效: {0}")]
    InvalidConfig(String),

    #[error("分派结果引用了快照外的用户: user_id={0}")]
    UnknownUser(UserId),

    // ===== 求解器内部一致性 =====
    #[error("求解器内部不一致: {0}")]
    SolverInternalInconsistency(String),
}

/// Result 类型别名
pub type EngineResult<T> = Result<T, EngineError>;
