// ==========================================
// 技能任务分派系统 - 分派结果领域模型
// ==========================================
// 职责: 分派结果（值对象）与负载投影快照
// 红线: 计算后交给调用方,引擎不持有、不落库
// ==========================================

use crate::domain::types::{AssignmentStrategy, TaskId, UnassignedReason, UserId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ==========================================
// AssignmentEntry - 单任务分派结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignmentEntry {
    pub task_id: TaskId,
    pub user_id: Option<UserId>, // None = 未分派
    pub cost: Option<f64>,
    pub match_score: Option<f64>, // 100 - min(100, cost)
    pub estimated_hours: f64,
    pub reason: Option<UnassignedReason>, // 仅未分派时存在
}

impl AssignmentEntry {
    pub fn assigned(task_id: TaskId, user_id: UserId, cost: f64, estimated_hours: f64) -> Self {
        Self {
            task_id,
            user_id: Some(user_id),
            cost: Some(cost),
            match_score: Some(100.0 - cost.min(100.0)),
            estimated_hours,
            reason: None,
        }
    }

    pub fn unassigned(task_id: TaskId, reason: UnassignedReason, estimated_hours: f64) -> Self {
        Self {
            task_id,
            user_id: None,
            cost: None,
            match_score: None,
            estimated_hours,
            reason: Some(reason),
        }
    }

    pub fn is_assigned(&self) -> bool {
        self.user_id.is_some()
    }
}

// ==========================================
// AssignmentResult - 一轮分派结果
// ==========================================
// entries 按 task_id 升序,每个任务恰好出现一次
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignmentResult {
    pub strategy: AssignmentStrategy,
    pub entries: Vec<AssignmentEntry>,
}

impl AssignmentResult {
    pub fn empty(strategy: AssignmentStrategy) -> Self {
        Self {
            strategy,
            entries: Vec::new(),
        }
    }

    /// 已分派条目
    pub fn assignments(&self) -> impl Iterator<Item = &AssignmentEntry> {
        self.entries.iter().filter(|e| e.is_assigned())
    }

    /// 未分派条目
    pub fn unassigned(&self) -> impl Iterator<Item = &AssignmentEntry> {
        self.entries.iter().filter(|e| !e.is_assigned())
    }

    pub fn assigned_count(&self) -> usize {
        self.assignments().count()
    }

    pub fn unassigned_count(&self) -> usize {
        self.unassigned().count()
    }

    /// 已分派条目的成本总和
    pub fn total_cost(&self) -> f64 {
        self.assignments().filter_map(|e| e.cost).sum()
    }

    /// 查询某任务的执行人
    pub fn assignee_of(&self, task_id: TaskId) -> Option<UserId> {
        self.entries
            .iter()
            .find(|e| e.task_id == task_id)
            .and_then(|e| e.user_id)
    }

    pub fn entry(&self, task_id: TaskId) -> Option<&AssignmentEntry> {
        self.entries.iter().find(|e| e.task_id == task_id)
    }
}

// ==========================================
// WorkloadSnapshot - 负载投影快照
// ==========================================
// user_id -> 投影后负载 (小时)
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WorkloadSnapshot {
    pub projected: BTreeMap<UserId, f64>,
}

impl WorkloadSnapshot {
    pub fn get(&self, user_id: UserId) -> Option<f64> {
        self.projected.get(&user_id).copied()
    }

    pub fn len(&self) -> usize {
        self.projected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projected.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&UserId, &f64)> {
        self.projected.iter()
    }
}
