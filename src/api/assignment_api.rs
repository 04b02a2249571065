// ==========================================
// 技能任务分派系统 - 分派 API
// ==========================================
// 职责: 读取快照 → 执行分派 → 投影负载,供 CLI / 上层服务调用
// 红线: 结果只返回给调用方,写回由调用方在同一事务内完成
// ==========================================

use crate::api::error::ApiResult;
use crate::config::EngineConfig;
use crate::domain::types::AssignmentStrategy;
use crate::domain::{AssignmentResult, Task, User, WorkloadSnapshot};
use crate::engine::{AssignmentEngine, WorkloadProjector};
use crate::repository::SnapshotSource;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

// ==========================================
// AssignmentReport - 单策略报告
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignmentReport {
    pub result: AssignmentResult,
    pub workload: WorkloadSnapshot,
}

// ==========================================
// StrategyComparison - 双策略对比
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyComparison {
    pub optimal: AssignmentReport,
    pub greedy: AssignmentReport,
    /// greedy.total_cost - optimal.total_cost
    pub cost_delta: f64,
    /// greedy.assigned - optimal.assigned
    pub assigned_delta: i64,
}

// ==========================================
// AssignmentApi - 分派 API
// ==========================================
pub struct AssignmentApi<S: SnapshotSource> {
    source: S,
    config: EngineConfig,
}

impl<S: SnapshotSource> AssignmentApi<S> {
    /// 创建新的 AssignmentApi 实例
    pub fn new(source: S, config: EngineConfig) -> ApiResult<Self> {
        config.validate()?;
        Ok(Self { source, config })
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// 读取快照并执行一轮分派
    ///
    /// # 参数
    /// - strategy: 分派策略
    /// - as_of: 交期参考时刻
    #[instrument(skip(self), fields(strategy = %strategy))]
    pub fn assign(
        &self,
        strategy: AssignmentStrategy,
        as_of: DateTime<Utc>,
    ) -> ApiResult<AssignmentReport> {
        let tasks = self.source.fetch_unassigned_tasks()?;
        let users = self.source.fetch_active_users()?;
        let engine = AssignmentEngine::new(self.config.clone(), as_of);
        Self::report(&engine, &tasks, &users, strategy)
    }

    /// 同一快照上分别执行 optimal 与 greedy 并对比
    #[instrument(skip(self))]
    pub fn compare_strategies(&self, as_of: DateTime<Utc>) -> ApiResult<StrategyComparison> {
        let tasks = self.source.fetch_unassigned_tasks()?;
        let users = self.source.fetch_active_users()?;
        let engine = AssignmentEngine::new(self.config.clone(), as_of);

        let optimal = Self::report(&engine, &tasks, &users, AssignmentStrategy::Optimal)?;
        let greedy = Self::report(&engine, &tasks, &users, AssignmentStrategy::Greedy)?;

        let cost_delta = greedy.result.total_cost() - optimal.result.total_cost();
        let assigned_delta =
            greedy.result.assigned_count() as i64 - optimal.result.assigned_count() as i64;

        info!(cost_delta, assigned_delta, "策略对比完成");
        Ok(StrategyComparison {
            optimal,
            greedy,
            cost_delta,
            assigned_delta,
        })
    }

    fn report(
        engine: &AssignmentEngine,
        tasks: &[Task],
        users: &[User],
        strategy: AssignmentStrategy,
    ) -> ApiResult<AssignmentReport> {
        let result = engine.run_assignment(tasks, users, strategy)?;
        let workload = WorkloadProjector::project(&result, users)?;
        Ok(AssignmentReport { result, workload })
    }
}

// ==========================================
// 无状态入口（默认配置）
// ==========================================

/// 对给定快照执行一轮分派（默认均衡权重）
pub fn run_assignment(
    tasks: &[Task],
    users: &[User],
    strategy: AssignmentStrategy,
    as_of: DateTime<Utc>,
) -> ApiResult<AssignmentResult> {
    let engine = AssignmentEngine::new(EngineConfig::default(), as_of);
    Ok(engine.run_assignment(tasks, users, strategy)?)
}

/// 计算分派后的投影负载
pub fn project_workload(result: &AssignmentResult, users: &[User]) -> ApiResult<WorkloadSnapshot> {
    Ok(WorkloadProjector::project(result, users)?)
}
