// ==========================================
// 技能任务分派系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 分派引擎（资格过滤 + 成本矩阵 + 最优匹配）
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 快照读取
pub mod repository;

// 引擎层 - 分派规则与求解
pub mod engine;

// 导入层 - 快照文件
pub mod importer;

// 配置层 - 成本模型参数
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 分派入口与导出
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{AssignmentStrategy, TaskPriority, UnassignedReason};

// 领域实体
pub use domain::{
    AssignmentEntry, AssignmentResult, Skill, SkillHolding, SkillRequirement, Task, User,
    WorkloadSnapshot,
};

// 引擎
pub use engine::{
    AssignmentEngine, CostMatrixBuilder, EligibilityFilter, EngineError, HungarianSolver,
    WorkloadProjector,
};

// 配置
pub use config::{EngineConfig, WeightProfile};

// API
pub use api::{project_workload, run_assignment, AssignmentApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "技能任务分派系统";
