// ==========================================
// 技能任务分派系统 - 快照来源接口
// ==========================================
// 职责: 为引擎提供一次分派所需的只读快照
// 实现: SqliteSnapshotRepository（数据库）/ SnapshotFile（JSON 文件）
// 红线: 快照读取与结果写回的原子性由调用方保证
// ==========================================

use crate::domain::{Skill, Task, User};
use crate::repository::error::RepositoryResult;

pub trait SnapshotSource {
    /// 未分派任务（含技能要求）
    fn fetch_unassigned_tasks(&self) -> RepositoryResult<Vec<Task>>;

    /// 活跃用户（含技能持有）
    fn fetch_active_users(&self) -> RepositoryResult<Vec<User>>;

    /// 技能目录（仅用于展示,不影响分派正确性）
    fn fetch_skill_catalog(&self) -> RepositoryResult<Vec<Skill>>;
}
