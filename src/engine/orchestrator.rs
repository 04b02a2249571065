// ==========================================
// 技能任务分派系统 - 引擎编排器
// ==========================================
// 用途: 协调输入守卫 → 资格过滤 → 成本矩阵 → 策略求解 → 结果组装
// 红线: 不做 I/O,不读时钟,不持有任何快照/矩阵
// ==========================================

use crate::config::EngineConfig;
use crate::domain::types::{AssignmentStrategy, UnassignedReason};
use crate::domain::{AssignmentEntry, AssignmentResult, Task, User};
use crate::engine::cost_matrix::{CostMatrix, CostMatrixBuilder};
use crate::engine::error::{EngineError, EngineResult};
use crate::engine::strategy::StrategySelector;
use crate::engine::validator::InputValidator;
use chrono::{DateTime, Utc};
use tracing::{debug, info, instrument};

// ==========================================
// AssignmentEngine - 分派引擎
// ==========================================
#[derive(Debug, Clone)]
pub struct AssignmentEngine {
    config: EngineConfig,
    as_of: DateTime<Utc>,
}

impl AssignmentEngine {
    /// 创建引擎实例
    ///
    /// # 参数
    /// - config: 成本权重与参数
    /// - as_of: 交期计算的参考时刻
    pub fn new(config: EngineConfig, as_of: DateTime<Utc>) -> Self {
        Self { config, as_of }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn as_of(&self) -> DateTime<Utc> {
        self.as_of
    }

    /// 执行一轮分派
    ///
    /// # 参数
    /// - tasks: 待分派任务快照（assignee_id 必须为空）
    /// - users: 用户快照（非活跃用户不参与分派）
    /// - strategy: 调用方显式选择的策略
    ///
    /// # 返回
    /// 每个任务恰好一条记录,按 task_id 升序
    ///
    /// # 错误
    /// - InvalidConfig: 权重为负/非有限等参数问题
    /// - 畸形输入（等级越界/ID 重复/工时非法等）
    /// - SolverInternalInconsistency
    #[instrument(skip_all, fields(tasks = tasks.len(), users = users.len(), strategy = %strategy))]
    pub fn run_assignment(
        &self,
        tasks: &[Task],
        users: &[User],
        strategy: AssignmentStrategy,
    ) -> EngineResult<AssignmentResult> {
        // 配置字段公开,构造后仍可能被改坏
        self.config
            .validate()
            .map_err(|e| EngineError::InvalidConfig(e.to_string()))?;
        InputValidator::validate_tasks(tasks)?;
        InputValidator::validate_users(users)?;

        if tasks.is_empty() {
            info!("无待分派任务,返回空结果");
            return Ok(AssignmentResult::empty(strategy));
        }

        let mut sorted_tasks: Vec<&Task> = tasks.iter().collect();
        sorted_tasks.sort_by_key(|t| t.id);
        let active_users: Vec<&User> = users.iter().filter(|u| u.is_active).collect();
        if active_users.len() < users.len() {
            debug!(
                skipped = users.len() - active_users.len(),
                "已排除非活跃用户"
            );
        }

        let builder = CostMatrixBuilder::new(&self.config, self.as_of);
        let matrix = builder.build(&sorted_tasks, &active_users)?;
        let pairs = StrategySelector::select(strategy, &sorted_tasks, &matrix)?;

        let result = Self::assemble(strategy, &sorted_tasks, &matrix, &pairs);

        info!(
            assigned = result.assigned_count(),
            unassigned = result.unassigned_count(),
            total_cost = result.total_cost(),
            "分派完成"
        );
        Ok(result)
    }

    /// 配对 → 分派结果（含未分派原因）
    fn assemble(
        strategy: AssignmentStrategy,
        tasks: &[&Task],
        matrix: &CostMatrix,
        pairs: &[(usize, usize)],
    ) -> AssignmentResult {
        let mut col_of_row = vec![None; matrix.rows()];
        for &(row, col) in pairs {
            col_of_row[row] = Some(col);
        }

        let entries = tasks
            .iter()
            .enumerate()
            .map(|(row, task)| {
                let assigned = col_of_row[row]
                    .and_then(|col| matrix.get(row, col).map(|cost| (col, cost)));
                match assigned {
                    Some((col, cost)) => AssignmentEntry::assigned(
                        task.id,
                        matrix.user_id(col),
                        cost.as_f64(),
                        task.estimated_hours,
                    ),
                    None => {
                        let reason = if matrix.row_has_eligible(row) {
                            UnassignedReason::CandidatesExhausted
                        } else {
                            UnassignedReason::NoEligibleUser
                        };
                        debug!(task_id = task.id, reason = %reason, "任务未分派");
                        AssignmentEntry::unassigned(task.id, reason, task.estimated_hours)
                    }
                }
            })
            .collect();

        AssignmentResult { strategy, entries }
    }
}
