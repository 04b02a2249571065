// ==========================================
// 技能任务分派系统 - 输入守卫
// ==========================================
// 职责: 快照进入引擎前的快速失败校验
// 红线: 不做任何截断/修正,越界即报错
// ==========================================

use crate::domain::skill::is_valid_level;
use crate::domain::{Task, User};
use crate::engine::error::{EngineError, EngineResult};
use std::collections::BTreeSet;

// ==========================================
// InputValidator - 输入守卫（无状态）
// ==========================================
pub struct InputValidator;

impl InputValidator {
    /// 校验任务快照
    ///
    /// 检查项:
    /// 1) task_id 唯一
    /// 2) 未分派（assignee_id 为空）
    /// 3) estimated_hours 有限且 >= 0
    /// 4) 每个技能要求等级 ∈ [1,5]
    pub fn validate_tasks(tasks: &[Task]) -> EngineResult<()> {
        let mut seen = BTreeSet::new();
        for task in tasks {
            if !seen.insert(task.id) {
                return Err(EngineError::DuplicateTaskId(task.id));
            }

            if let Some(assignee_id) = task.assignee_id {
                return Err(EngineError::TaskAlreadyAssigned {
                    task_id: task.id,
                    assignee_id,
                });
            }

            if !task.estimated_hours.is_finite() || task.estimated_hours < 0.0 {
                return Err(EngineError::InvalidEffort {
                    task_id: task.id,
                    hours: task.estimated_hours,
                });
            }

            for req in &task.required_skills {
                if !is_valid_level(req.required_level) {
                    return Err(EngineError::InvalidSkillLevel {
                        owner: format!("task_id={}", task.id),
                        skill_id: req.skill_id,
                        level: req.required_level,
                    });
                }
            }
        }
        Ok(())
    }

    /// 校验用户快照
    ///
    /// 检查项:
    /// 1) user_id 唯一
    /// 2) workload_capacity 有限且 > 0
    /// 3) current_workload 有限且 >= 0
    /// 4) 每个技能持有等级 ∈ [1,5]
    pub fn validate_users(users: &[User]) -> EngineResult<()> {
        let mut seen = BTreeSet::new();
        for user in users {
            if !seen.insert(user.id) {
                return Err(EngineError::DuplicateUserId(user.id));
            }

            if !user.workload_capacity.is_finite() || user.workload_capacity <= 0.0 {
                return Err(EngineError::InvalidCapacity {
                    user_id: user.id,
                    capacity: user.workload_capacity,
                });
            }

            if !user.current_workload.is_finite() || user.current_workload < 0.0 {
                return Err(EngineError::InvalidWorkload {
                    user_id: user.id,
                    workload: user.current_workload,
                });
            }

            for holding in &user.skills {
                if !is_valid_level(holding.level) {
                    return Err(EngineError::InvalidSkillLevel {
                        owner: format!("user_id={}", user.id),
                        skill_id: holding.skill_id,
                        level: holding.level,
                    });
                }
            }
        }
        Ok(())
    }
}
