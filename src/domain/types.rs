// ==========================================
// 技能任务分派系统 - 领域类型定义
// ==========================================
// 职责: 标识符别名、任务优先级、任务状态、未分派原因
// 红线: 优先级是"有序枚举",不是评分制
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

/// 任务标识
pub type TaskId = i64;

/// 用户标识
pub type UserId = i64;

/// 技能标识
pub type SkillId = i64;

/// 技能等级下限（含）
pub const SKILL_LEVEL_MIN: u8 = 1;

/// 技能等级上限（含）
pub const SKILL_LEVEL_MAX: u8 = 5;

// ==========================================
// 任务优先级 (Task Priority)
// ==========================================
// 顺序: Low < Medium < High < Critical
// 序列化格式: lowercase (与数据库一致)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,      // 低
    Medium,   // 中
    High,     // 高
    Critical, // 紧急
}

impl TaskPriority {
    /// 优先级序号（Low=0 ... Critical=3）
    pub fn rank(&self) -> u8 {
        match self {
            TaskPriority::Low => 0,
            TaskPriority::Medium => 1,
            TaskPriority::High => 2,
            TaskPriority::Critical => 3,
        }
    }

    /// 最高优先级序号
    pub const MAX_RANK: u8 = 3;

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::Low => "low",
            TaskPriority::Medium => "medium",
            TaskPriority::High => "high",
            TaskPriority::Critical => "critical",
        }
    }
}

impl Default for TaskPriority {
    fn default() -> Self {
        TaskPriority::Medium
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for TaskPriority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(TaskPriority::Low),
            "medium" => Ok(TaskPriority::Medium),
            "high" => Ok(TaskPriority::High),
            "critical" => Ok(TaskPriority::Critical),
            other => Err(format!("未知任务优先级: {}", other)),
        }
    }
}

// ==========================================
// 任务状态 (Task Status)
// ==========================================
// 仅 Todo 且无执行人的任务进入分派快照
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Todo,       // 待办
    InProgress, // 进行中
    Review,     // 评审
    Done,       // 完成
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Review => "review",
            TaskStatus::Done => "done",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 未分派原因 (Unassigned Reason)
// ==========================================
// 序列化格式: SCREAMING_SNAKE_CASE
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UnassignedReason {
    NoEligibleUser,      // 无任何满足技能要求的用户
    CandidatesExhausted, // 有合格用户,但本轮已被其它任务占用
}

impl fmt::Display for UnassignedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnassignedReason::NoEligibleUser => write!(f, "NO_ELIGIBLE_USER"),
            UnassignedReason::CandidatesExhausted => write!(f, "CANDIDATES_EXHAUSTED"),
        }
    }
}

// ==========================================
// 分派策略 (Assignment Strategy)
// ==========================================
// 调用方显式选择,引擎不会静默切换
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentStrategy {
    Optimal, // 匈牙利算法,全局最小成本
    Greedy,  // 贪心启发式,对照/兜底
}

impl AssignmentStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssignmentStrategy::Optimal => "optimal",
            AssignmentStrategy::Greedy => "greedy",
        }
    }

    pub fn title_cn(&self) -> &'static str {
        match self {
            AssignmentStrategy::Optimal => "全局最优",
            AssignmentStrategy::Greedy => "贪心对照",
        }
    }
}

impl Default for AssignmentStrategy {
    fn default() -> Self {
        AssignmentStrategy::Optimal
    }
}

impl fmt::Display for AssignmentStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for AssignmentStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "optimal" | "hungarian" => Ok(AssignmentStrategy::Optimal),
            "greedy" => Ok(AssignmentStrategy::Greedy),
            other => Err(format!("未知分派策略: {}", other)),
        }
    }
}
