// ==========================================
// 技能任务分派系统 - 负载投影
// ==========================================
// 职责: 分派结果 + 用户快照 → 每个用户的投影负载
// 公式: projected = current_workload + Σ estimated_hours(已分派给该用户)
// 红线: 纯函数,不修改用户快照;快照外用户视为故障
// ==========================================

use crate::domain::{AssignmentResult, User, WorkloadSnapshot};
use crate::engine::error::{EngineError, EngineResult};
use std::collections::BTreeMap;

pub struct WorkloadProjector;

impl WorkloadProjector {
    /// 计算投影负载
    ///
    /// 快照中每个用户都会出现（空闲用户保持当前负载）
    pub fn project(result: &AssignmentResult, users: &[User]) -> EngineResult<WorkloadSnapshot> {
        let mut projected: BTreeMap<_, _> = users
            .iter()
            .map(|u| (u.id, u.current_workload))
            .collect();

        // entries 按 task_id 升序,累加顺序固定
        for entry in result.assignments() {
            if let Some(user_id) = entry.user_id {
                let load = projected
                    .get_mut(&user_id)
                    .ok_or(EngineError::UnknownUser(user_id))?;
                *load += entry.estimated_hours;
            }
        }

        Ok(WorkloadSnapshot { projected })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{AssignmentStrategy, UnassignedReason};
    use crate::domain::AssignmentEntry;

    fn result(entries: Vec<AssignmentEntry>) -> AssignmentResult {
        AssignmentResult {
            strategy: AssignmentStrategy::Optimal,
            entries,
        }
    }

    #[test]
    fn test_projection_adds_assigned_hours() {
        let users = vec![User::new(1).with_workload(10.0), User::new(2).with_workload(3.0)];
        let r = result(vec![
            AssignmentEntry::assigned(1, 1, 5.0, 4.0),
            AssignmentEntry::unassigned(2, UnassignedReason::NoEligibleUser, 8.0),
        ]);

        let snapshot = WorkloadProjector::project(&r, &users).unwrap();
        assert_eq!(snapshot.get(1), Some(14.0));
        assert_eq!(snapshot.get(2), Some(3.0));
        assert_eq!(snapshot.len(), 2);
    }

    #[test]
    fn test_projection_is_idempotent() {
        let users = vec![User::new(1).with_workload(1.5)];
        let r = result(vec![AssignmentEntry::assigned(1, 1, 0.0, 2.5)]);
        let first = WorkloadProjector::project(&r, &users).unwrap();
        let second = WorkloadProjector::project(&r, &users).unwrap();
        assert_eq!(first, second);
        assert_eq!(users[0].current_workload, 1.5);
    }

    #[test]
    fn test_unknown_user_is_fault() {
        let r = result(vec![AssignmentEntry::assigned(1, 99, 0.0, 1.0)]);
        assert_eq!(
            WorkloadProjector::project(&r, &[User::new(1)]),
            Err(EngineError::UnknownUser(99))
        );
    }
}
