// ==========================================
// 技能任务分派系统 - 策略选择器
// ==========================================
// 用途：
// - Optimal: 匈牙利算法,全局最小总成本
// - Greedy: 按紧急度逐个选取,供对比/快速试算
// 红线: 由调用方显式选择,引擎不自行切换策略
// ==========================================

use crate::domain::types::AssignmentStrategy;
use crate::domain::Task;
use crate::engine::cost_matrix::CostMatrix;
use crate::engine::error::EngineResult;
use crate::engine::greedy::GreedyAssigner;
use crate::engine::hungarian::HungarianSolver;

pub struct StrategySelector;

impl StrategySelector {
    /// 按策略求解配对
    ///
    /// # 返回
    /// (行, 列) 配对,按行升序,只含合格单元格
    pub fn select(
        strategy: AssignmentStrategy,
        tasks: &[&Task],
        matrix: &CostMatrix,
    ) -> EngineResult<Vec<(usize, usize)>> {
        match strategy {
            AssignmentStrategy::Optimal => Ok(HungarianSolver::solve(matrix)?.pairs),
            AssignmentStrategy::Greedy => Ok(GreedyAssigner::assign(tasks, matrix)),
        }
    }
}
