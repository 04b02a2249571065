// ==========================================
// 技能任务分派系统 - JSON 快照文件
// ==========================================
// 支持: .json { skills, tasks, users }
// 用途: 离线试算 / 回放 / 从数据库导出快照
// ==========================================

use crate::domain::{Skill, Task, User};
use crate::importer::error::{ImportError, ImportResult};
use crate::repository::error::RepositoryResult;
use crate::repository::snapshot_source::SnapshotSource;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

// ==========================================
// SnapshotFile - 快照文件
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SnapshotFile {
    #[serde(default)]
    pub skills: Vec<Skill>,
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub users: Vec<User>,
}

impl SnapshotFile {
    /// 从文件读取
    pub fn load(path: &Path) -> ImportResult<Self> {
        if !path.exists() {
            return Err(ImportError::FileNotFound(path.display().to_string()));
        }
        if let Some(ext) = path.extension() {
            if ext != "json" {
                return Err(ImportError::UnsupportedFormat(
                    ext.to_string_lossy().to_string(),
                ));
            }
        }

        let raw = fs::read_to_string(path)
            .map_err(|e| ImportError::FileReadError(format!("{}: {}", path.display(), e)))?;
        let snapshot = Self::from_json_str(&raw)?;

        info!(
            path = %path.display(),
            tasks = snapshot.tasks.len(),
            users = snapshot.users.len(),
            "快照文件已加载"
        );
        Ok(snapshot)
    }

    pub fn from_json_str(raw: &str) -> ImportResult<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// 从任意快照来源抓取一份快照（如数据库）
    pub fn capture(source: &dyn SnapshotSource) -> ImportResult<Self> {
        let wrap = |e: crate::repository::RepositoryError| ImportError::SourceError(e.to_string());
        Ok(Self {
            skills: source.fetch_skill_catalog().map_err(wrap)?,
            tasks: source.fetch_unassigned_tasks().map_err(wrap)?,
            users: source.fetch_active_users().map_err(wrap)?,
        })
    }

    /// 写出为格式化 JSON
    pub fn save(&self, path: &Path) -> ImportResult<()> {
        let raw = serde_json::to_string_pretty(self)?;
        fs::write(path, raw)
            .map_err(|e| ImportError::FileWriteError(format!("{}: {}", path.display(), e)))
    }
}

impl SnapshotSource for SnapshotFile {
    fn fetch_unassigned_tasks(&self) -> RepositoryResult<Vec<Task>> {
        Ok(self
            .tasks
            .iter()
            .filter(|t| t.assignee_id.is_none())
            .cloned()
            .collect())
    }

    fn fetch_active_users(&self) -> RepositoryResult<Vec<User>> {
        Ok(self.users.iter().filter(|u| u.is_active).cloned().collect())
    }

    fn fetch_skill_catalog(&self) -> RepositoryResult<Vec<Skill>> {
        Ok(self.skills.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::TaskPriority;

    const SAMPLE: &str = r#"{
        "skills": [{ "id": 1, "name": "rust" }],
        "tasks": [
            { "id": 10, "title": "parser", "priority": "high", "estimated_hours": 3.0,
              "required_skills": [{ "skill_id": 1, "required_level": 3 }] },
            { "id": 11, "title": "done elsewhere", "assignee_id": 7 }
        ],
        "users": [
            { "id": 7, "username": "ann", "workload_capacity": 40.0,
              "skills": [{ "skill_id": 1, "level": 4 }] },
            { "id": 8, "username": "bob", "is_active": false }
        ]
    }"#;

    #[test]
    fn test_parse_with_defaults() {
        let snapshot = SnapshotFile::from_json_str(SAMPLE).unwrap();
        assert_eq!(snapshot.tasks[0].priority, TaskPriority::High);
        assert_eq!(snapshot.tasks[1].estimated_hours, 1.0);
        assert_eq!(snapshot.users[1].workload_capacity, 100.0);
        assert_eq!(snapshot.skills[0].category, None);
    }

    #[test]
    fn test_source_filters_assigned_and_inactive() {
        let snapshot = SnapshotFile::from_json_str(SAMPLE).unwrap();
        let tasks = snapshot.fetch_unassigned_tasks().unwrap();
        let users = snapshot.fetch_active_users().unwrap();
        assert_eq!(tasks.iter().map(|t| t.id).collect::<Vec<_>>(), vec![10]);
        assert_eq!(users.iter().map(|u| u.id).collect::<Vec<_>>(), vec![7]);
    }

    #[test]
    fn test_rejects_non_json_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snapshot.csv");
        fs::write(&path, "id").unwrap();
        assert!(matches!(
            SnapshotFile::load(&path),
            Err(ImportError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snapshot.json");
        let snapshot = SnapshotFile::from_json_str(SAMPLE).unwrap();
        snapshot.save(&path).unwrap();
        assert_eq!(SnapshotFile::load(&path).unwrap(), snapshot);
    }
}
