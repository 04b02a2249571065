// ==========================================
// 技能任务分派系统 - 引擎层
// ==========================================
// 职责: 资格过滤、成本矩阵、最优/贪心求解、负载投影
// 红线: Engine 不拼 SQL、不读时钟、不持久化
// ==========================================

pub mod cost_matrix;
pub mod eligibility;
pub mod error;
pub mod greedy;
pub mod hungarian;
pub mod orchestrator;
pub mod strategy;
pub mod validator;
pub mod workload;

// 重导出核心引擎
pub use cost_matrix::{Cost, CostMatrix, CostMatrixBuilder};
pub use eligibility::EligibilityFilter;
pub use error::{EngineError, EngineResult};
pub use greedy::GreedyAssigner;
pub use hungarian::{HungarianSolver, Matching};
pub use orchestrator::AssignmentEngine;
pub use strategy::StrategySelector;
pub use validator::InputValidator;
pub use workload::WorkloadProjector;
