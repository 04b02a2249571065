// ==========================================
// 技能任务分派系统 - API 层
// ==========================================
// 职责: 提供分派入口与结果导出,供 CLI / 上层服务调用
// ==========================================

pub mod assignment_api;
pub mod error;
pub mod export;

// 重导出核心类型
pub use assignment_api::{
    project_workload, run_assignment, AssignmentApi, AssignmentReport, StrategyComparison,
};
pub use error::{ApiError, ApiResult};
pub use export::{write_json, write_result_csv};
