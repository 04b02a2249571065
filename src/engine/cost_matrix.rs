// ==========================================
// 技能任务分派系统 - 成本矩阵构建器
// ==========================================
// 红线: 不合格对不得获得有限成本（排除,而非惩罚）
// ==========================================
// 职责: (任务 × 用户) → 非负成本 / 不合格哨兵
// 公式:
//   cost = w_skill    * skill_gap_penalty
//        + w_load     * overload_penalty
//        + w_priority * priority_term      (整行一致)
//        + w_deadline * deadline_term      (整行一致)
// 确定性: 行按 task_id 升序,列按 user_id 升序;成本定点量化
// ==========================================

use crate::config::EngineConfig;
use crate::domain::types::{TaskId, TaskPriority, UserId, SKILL_LEVEL_MAX};
use crate::domain::{Task, User};
use crate::engine::eligibility::{EligibilityFilter, HoldingIndex};
use crate::engine::error::{EngineError, EngineResult};
use chrono::{DateTime, Utc};
use std::fmt;
use tracing::{debug, instrument};

/// 定点量化比例: 1 成本单位 = 1/1000
pub const COST_SCALE: f64 = 1000.0;

/// 单元格成本上限（量化单位）,超出部分饱和
pub const MAX_COST_UNITS: u64 = 1_000_000_000;

/// 无交期任务的交期项取值
const NO_DUE_DATE_TERM: f64 = 50.0;

const SECONDS_PER_DAY: f64 = 86_400.0;

// ==========================================
// Cost - 定点非负成本
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Cost(u64);

impl Cost {
    pub const ZERO: Cost = Cost(0);

    /// 由浮点成本量化
    ///
    /// # 错误
    /// - 负数或非有限值 → SolverInternalInconsistency（成本公式缺陷）
    pub fn from_f64(raw: f64) -> EngineResult<Self> {
        if !raw.is_finite() || raw < 0.0 {
            return Err(EngineError::SolverInternalInconsistency(format!(
                "成本必须为有限非负数, 实际 {}",
                raw
            )));
        }
        let scaled = (raw * COST_SCALE).round();
        if scaled >= MAX_COST_UNITS as f64 {
            return Ok(Cost(MAX_COST_UNITS));
        }
        Ok(Cost(scaled as u64))
    }

    pub fn from_units(units: u64) -> Self {
        Cost(units.min(MAX_COST_UNITS))
    }

    pub fn units(&self) -> u64 {
        self.0
    }

    pub fn as_f64(&self) -> f64 {
        self.0 as f64 / COST_SCALE
    }
}

impl fmt::Display for Cost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}", self.as_f64())
    }
}

// ==========================================
// CostMatrix - 成本矩阵（值对象）
// ==========================================
// None = 不合格（+∞）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CostMatrix {
    task_ids: Vec<TaskId>,
    user_ids: Vec<UserId>,
    cells: Vec<Option<Cost>>, // 行优先
}

impl CostMatrix {
    /// 由行数据构造矩阵
    ///
    /// # 错误
    /// - 行数/列数与 id 列表不一致
    pub fn from_rows(
        task_ids: Vec<TaskId>,
        user_ids: Vec<UserId>,
        rows: Vec<Vec<Option<Cost>>>,
    ) -> EngineResult<Self> {
        if rows.len() != task_ids.len() {
            return Err(EngineError::SolverInternalInconsistency(format!(
                "矩阵行数 {} 与任务数 {} 不一致",
                rows.len(),
                task_ids.len()
            )));
        }

        let mut cells = Vec::with_capacity(task_ids.len() * user_ids.len());
        for (row_idx, row) in rows.into_iter().enumerate() {
            if row.len() != user_ids.len() {
                return Err(EngineError::SolverInternalInconsistency(format!(
                    "矩阵第 {} 行列数 {} 与用户数 {} 不一致",
                    row_idx,
                    row.len(),
                    user_ids.len()
                )));
            }
            cells.extend(row);
        }

        Ok(Self {
            task_ids,
            user_ids,
            cells,
        })
    }

    pub fn rows(&self) -> usize {
        self.task_ids.len()
    }

    pub fn cols(&self) -> usize {
        self.user_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows() == 0 || self.cols() == 0
    }

    pub fn get(&self, row: usize, col: usize) -> Option<Cost> {
        self.cells[row * self.cols() + col]
    }

    pub fn task_id(&self, row: usize) -> TaskId {
        self.task_ids[row]
    }

    pub fn user_id(&self, col: usize) -> UserId {
        self.user_ids[col]
    }

    pub fn task_ids(&self) -> &[TaskId] {
        &self.task_ids
    }

    pub fn user_ids(&self) -> &[UserId] {
        &self.user_ids
    }

    /// 该行是否存在合格用户
    pub fn row_has_eligible(&self, row: usize) -> bool {
        (0..self.cols()).any(|col| self.get(row, col).is_some())
    }

    /// 合格单元格数量
    pub fn eligible_cells(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// 最大有限成本（量化单位）
    pub fn max_units(&self) -> u64 {
        self.cells
            .iter()
            .filter_map(|c| c.map(|cost| cost.units()))
            .max()
            .unwrap_or(0)
    }
}

// ==========================================
// CostMatrixBuilder - 成本矩阵构建器
// ==========================================
pub struct CostMatrixBuilder<'a> {
    config: &'a EngineConfig,
    as_of: DateTime<Utc>, // 交期项参考时刻（由调用方提供,不读时钟）
}

impl<'a> CostMatrixBuilder<'a> {
    pub fn new(config: &'a EngineConfig, as_of: DateTime<Utc>) -> Self {
        Self { config, as_of }
    }

    /// 构建成本矩阵
    ///
    /// 行、列分别按 task_id / user_id 升序,与输入顺序无关
    #[instrument(skip_all, fields(tasks = tasks.len(), users = users.len()))]
    pub fn build(&self, tasks: &[&Task], users: &[&User]) -> EngineResult<CostMatrix> {
        let mut tasks: Vec<&Task> = tasks.to_vec();
        tasks.sort_by_key(|t| t.id);
        let mut users: Vec<&User> = users.to_vec();
        users.sort_by_key(|u| u.id);

        let holdings: Vec<HoldingIndex> = users
            .iter()
            .map(|u| EligibilityFilter::index_holdings(u))
            .collect();

        let mut rows = Vec::with_capacity(tasks.len());
        for task in &tasks {
            // 整行一致的紧急度项,每个任务只算一次
            let urgency = self.urgency_cost(task);

            let mut row = Vec::with_capacity(users.len());
            for (user, index) in users.iter().zip(holdings.iter()) {
                if !EligibilityFilter::is_eligible_indexed(task, index) {
                    row.push(None);
                    continue;
                }
                let raw = self.weighted_pair_cost(task, user, index) + urgency;
                row.push(Some(Cost::from_f64(raw)?));
            }
            rows.push(row);
        }

        let matrix = CostMatrix::from_rows(
            tasks.iter().map(|t| t.id).collect(),
            users.iter().map(|u| u.id).collect(),
            rows,
        )?;

        debug!(
            rows = matrix.rows(),
            cols = matrix.cols(),
            eligible_cells = matrix.eligible_cells(),
            "成本矩阵构建完成"
        );
        Ok(matrix)
    }

    /// 单对成本（浮点,未量化）
    pub fn pair_cost(&self, task: &Task, user: &User) -> Option<f64> {
        let index = EligibilityFilter::index_holdings(user);
        if !EligibilityFilter::is_eligible_indexed(task, &index) {
            return None;
        }
        Some(self.weighted_pair_cost(task, user, &index) + self.urgency_cost(task))
    }

    fn weighted_pair_cost(&self, task: &Task, user: &User, holdings: &HoldingIndex) -> f64 {
        let w = &self.config.weights;
        w.skill * self.skill_gap_penalty(task, holdings) + w.load * self.overload_penalty(task, user)
    }

    fn urgency_cost(&self, task: &Task) -> f64 {
        let w = &self.config.weights;
        w.priority * Self::priority_term(task.priority) + w.deadline * self.deadline_term(task)
    }

    /// 技能差距惩罚 [0, 100]
    ///
    /// # 规则
    /// - 每项要求: max(0, required - bonus * (held - required))
    /// - 求和后按 5 * 要求数 归一到 [0, 100]
    /// - 无要求 → 0
    /// - 只对合格对调用（held >= required）
    /// - 恰好达标是"不超过"超资格者的成本,而非严格最低;
    ///   bonus = 0 时所有合格持有者成本相同（达标即满足）
    pub fn skill_gap_penalty(&self, task: &Task, holdings: &HoldingIndex) -> f64 {
        if task.required_skills.is_empty() {
            return 0.0;
        }

        let bonus = self.config.overqualification_bonus;
        let total: f64 = task
            .required_skills
            .iter()
            .map(|req| {
                let required = req.required_level as f64;
                let held = holdings
                    .get(&req.skill_id)
                    .copied()
                    .unwrap_or(req.required_level) as f64;
                let surplus = (held - required).max(0.0);
                (required - bonus * surplus).max(0.0)
            })
            .sum();

        let scale = SKILL_LEVEL_MAX as f64 * task.required_skills.len() as f64;
        100.0 * total / scale
    }

    /// 超载惩罚
    ///
    /// # 规则
    /// - r = (current_workload + estimated_hours) / capacity
    /// - r <= 1 → 0
    /// - r > 1 → overload_scale * ((r - 1) + (r - 1)^2)
    pub fn overload_penalty(&self, task: &Task, user: &User) -> f64 {
        let ratio = (user.current_workload + task.estimated_hours) / user.workload_capacity;
        if ratio <= 1.0 {
            return 0.0;
        }
        let excess = ratio - 1.0;
        self.config.overload_scale * (excess + excess * excess)
    }

    /// 优先级项 [0, 100]: Critical → 0, Low → 100
    pub fn priority_term(priority: TaskPriority) -> f64 {
        let max = TaskPriority::MAX_RANK as f64;
        100.0 * (max - priority.rank() as f64) / max
    }

    /// 交期项 [0, 100]
    ///
    /// # 规则
    /// - 无交期 → 50
    /// - 已逾期 → 0
    /// - 否则 min(100, 100 * 剩余天数 / deadline_horizon_days)
    pub fn deadline_term(&self, task: &Task) -> f64 {
        match task.due_date {
            None => NO_DUE_DATE_TERM,
            Some(due) => {
                let days = (due - self.as_of).num_seconds() as f64 / SECONDS_PER_DAY;
                if days <= 0.0 {
                    0.0
                } else {
                    (100.0 * days / self.config.deadline_horizon_days).min(100.0)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CostWeights;
    use chrono::{Duration, TimeZone};

    fn as_of() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap()
    }

    fn only(weights: CostWeights) -> EngineConfig {
        EngineConfig {
            weights,
            ..EngineConfig::default()
        }
    }

    #[test]
    fn test_cost_quantization() {
        assert_eq!(Cost::from_f64(1.2346).unwrap().units(), 1235);
        assert_eq!(Cost::from_f64(0.0).unwrap(), Cost::ZERO);
        assert_eq!(Cost::from_f64(1e300).unwrap().units(), MAX_COST_UNITS);
        assert!(matches!(
            Cost::from_f64(-0.5),
            Err(EngineError::SolverInternalInconsistency(_))
        ));
        assert!(Cost::from_f64(f64::NAN).is_err());
    }

    #[test]
    fn test_ineligible_pairs_get_no_cost() {
        let config = EngineConfig::default();
        let builder = CostMatrixBuilder::new(&config, as_of());
        let task = Task::new(1).require(10, 3);
        let expert = User::new(1).with_skill(10, 4);
        let novice = User::new(2).with_skill(10, 2);

        let matrix = builder.build(&[&task], &[&novice, &expert]).unwrap();
        assert!(matrix.get(0, 0).is_some()); // user 1 (expert) 排在前
        assert_eq!(matrix.get(0, 1), None);
        assert!(matrix.row_has_eligible(0));
    }

    #[test]
    fn test_rows_and_cols_sorted_by_id() {
        let config = EngineConfig::default();
        let builder = CostMatrixBuilder::new(&config, as_of());
        let t3 = Task::new(3);
        let t1 = Task::new(1);
        let u9 = User::new(9);
        let u2 = User::new(2);

        let matrix = builder.build(&[&t3, &t1], &[&u9, &u2]).unwrap();
        assert_eq!(matrix.task_ids(), &[1, 3]);
        assert_eq!(matrix.user_ids(), &[2, 9]);
    }

    #[test]
    fn test_exact_match_never_cheaper_than_overqualified() {
        let config = only(CostWeights::new(1.0, 0.0, 0.0, 0.0));
        let builder = CostMatrixBuilder::new(&config, as_of());
        let task = Task::new(1).require(10, 3);

        let exact = builder.pair_cost(&task, &User::new(1).with_skill(10, 3)).unwrap();
        let over = builder.pair_cost(&task, &User::new(2).with_skill(10, 5)).unwrap();
        assert!((exact - 60.0).abs() < 1e-9);
        assert!(over <= exact);
        assert!(over >= 0.0);
    }

    #[test]
    fn test_zero_bonus_treats_every_holder_as_full_match() {
        let config = EngineConfig {
            overqualification_bonus: 0.0,
            ..only(CostWeights::new(1.0, 0.0, 0.0, 0.0))
        };
        let builder = CostMatrixBuilder::new(&config, as_of());
        let task = Task::new(1).require(10, 3);

        let exact = builder.pair_cost(&task, &User::new(1).with_skill(10, 3)).unwrap();
        let over = builder.pair_cost(&task, &User::new(2).with_skill(10, 5)).unwrap();
        assert_eq!(exact, over);
    }

    #[test]
    fn test_no_requirements_zero_skill_penalty() {
        let config = only(CostWeights::new(1.0, 0.0, 0.0, 0.0));
        let builder = CostMatrixBuilder::new(&config, as_of());
        assert_eq!(builder.pair_cost(&Task::new(1), &User::new(1)), Some(0.0));
    }

    #[test]
    fn test_overload_zero_within_capacity_then_steep() {
        let config = EngineConfig::default();
        let builder = CostMatrixBuilder::new(&config, as_of());
        let task = Task::new(1).with_estimated_hours(10.0);

        let fits = User::new(1).with_capacity(40.0).with_workload(30.0);
        let over_25 = User::new(2).with_capacity(40.0).with_workload(40.0);
        let over_50 = User::new(3).with_capacity(40.0).with_workload(50.0);

        assert_eq!(builder.overload_penalty(&task, &fits), 0.0);
        let p1 = builder.overload_penalty(&task, &over_25);
        let p2 = builder.overload_penalty(&task, &over_50);
        assert!((p1 - 100.0 * (0.25 + 0.0625)).abs() < 1e-9);
        assert!(p2 > 2.0 * p1);
    }

    #[test]
    fn test_urgency_shifts_row_uniformly() {
        let config = EngineConfig::default();
        let builder = CostMatrixBuilder::new(&config, as_of());
        let users = [User::new(1), User::new(2).with_workload(95.0)];
        let low = Task::new(1).with_priority(TaskPriority::Low);
        let critical = Task::new(2).with_priority(TaskPriority::Critical);

        let d0 = builder.pair_cost(&low, &users[0]).unwrap()
            - builder.pair_cost(&critical, &users[0]).unwrap();
        let d1 = builder.pair_cost(&low, &users[1]).unwrap()
            - builder.pair_cost(&critical, &users[1]).unwrap();
        assert!(d0 > 0.0);
        assert!((d0 - d1).abs() < 1e-9);
    }

    #[test]
    fn test_deadline_term() {
        let config = EngineConfig::default();
        let builder = CostMatrixBuilder::new(&config, as_of());

        assert_eq!(builder.deadline_term(&Task::new(1)), 50.0);
        let overdue = Task::new(2).with_due_date(as_of() - Duration::days(1));
        assert_eq!(builder.deadline_term(&overdue), 0.0);
        let soon = Task::new(3).with_due_date(as_of() + Duration::days(2));
        assert!((builder.deadline_term(&soon) - 20.0).abs() < 1e-9);
        let far = Task::new(4).with_due_date(as_of() + Duration::days(60));
        assert_eq!(builder.deadline_term(&far), 100.0);
    }

    #[test]
    fn test_priority_term_bounds() {
        assert_eq!(CostMatrixBuilder::priority_term(TaskPriority::Critical), 0.0);
        assert_eq!(CostMatrixBuilder::priority_term(TaskPriority::Low), 100.0);
    }

    #[test]
    fn test_build_is_deterministic() {
        let config = EngineConfig::default();
        let builder = CostMatrixBuilder::new(&config, as_of());
        let tasks = [
            Task::new(2).require(1, 2).with_estimated_hours(7.5),
            Task::new(1).with_priority(TaskPriority::High),
        ];
        let users = [User::new(5).with_skill(1, 4).with_workload(33.3), User::new(4)];
        let task_refs: Vec<&Task> = tasks.iter().collect();
        let user_refs: Vec<&User> = users.iter().collect();
        let reversed_tasks: Vec<&Task> = tasks.iter().rev().collect();

        let a = builder.build(&task_refs, &user_refs).unwrap();
        let b = builder.build(&reversed_tasks, &user_refs).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_from_rows_shape_mismatch() {
        let err = CostMatrix::from_rows(vec![1], vec![1, 2], vec![vec![None]]).unwrap_err();
        assert!(matches!(err, EngineError::SolverInternalInconsistency(_)));
    }
}
