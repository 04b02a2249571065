// ==========================================
// 技能任务分派系统 - 快照导入层
// ==========================================
// 职责: 从 JSON 文件读取 / 写出分派快照
// ==========================================

pub mod error;
pub mod snapshot_file;

pub use error::{ImportError, ImportResult};
pub use snapshot_file::SnapshotFile;
