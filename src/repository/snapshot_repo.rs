// ==========================================
// 技能任务分派系统 - SQLite 快照仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================
// 职责: 读取未分派任务、活跃用户及其技能
// 口径:
// - 未分派任务: lower(status) = 'todo' AND assignee_id IS NULL
//   (兼容以枚举成员名 'TODO' 存储的库)
// - 活跃用户: is_active = 1
// - 指定 project_id 时: 任务限本项目,用户限项目成员
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::types::{SkillId, TaskPriority, TaskStatus};
use crate::domain::{Skill, SkillHolding, SkillRequirement, Task, User};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::snapshot_source::SnapshotSource;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rusqlite::{params, Connection};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, instrument};

// ==========================================
// SqliteSnapshotRepository - 快照仓储
// ==========================================
pub struct SqliteSnapshotRepository {
    conn: Arc<Mutex<Connection>>,
    project_id: Option<i64>,
}

impl SqliteSnapshotRepository {
    /// 创建新的仓储实例
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            project_id: None,
        })
    }

    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self {
            conn,
            project_id: None,
        }
    }

    /// 限定到某个项目
    pub fn with_project(mut self, project_id: i64) -> Self {
        self.project_id = Some(project_id);
        self
    }

    pub fn project_id(&self) -> Option<i64> {
        self.project_id
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 读取 (owner_id, skill_id, level) 三元组并按 owner 分组
    fn load_levels(
        conn: &Connection,
        sql: &str,
        field: &str,
    ) -> RepositoryResult<BTreeMap<i64, Vec<(SkillId, u8)>>> {
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, i64>(1)?,
                row.get::<_, i64>(2)?,
            ))
        })?;

        let mut grouped: BTreeMap<i64, Vec<(SkillId, u8)>> = BTreeMap::new();
        for row in rows {
            let (owner_id, skill_id, raw_level) = row?;
            let level = u8::try_from(raw_level).map_err(|_| RepositoryError::FieldValueError {
                field: field.to_string(),
                message: format!("owner={}, skill_id={}, level={}", owner_id, skill_id, raw_level),
            })?;
            grouped.entry(owner_id).or_default().push((skill_id, level));
        }
        Ok(grouped)
    }
}

impl SnapshotSource for SqliteSnapshotRepository {
    #[instrument(skip(self), fields(project_id = ?self.project_id))]
    fn fetch_unassigned_tasks(&self) -> RepositoryResult<Vec<Task>> {
        let conn = self.get_conn()?;

        let requirements = Self::load_levels(
            &conn,
            "SELECT task_id, skill_id, required_level FROM task_skill ORDER BY task_id, skill_id",
            "task_skill.required_level",
        )?;

        let mut stmt = conn.prepare(
            r#"
            SELECT id, title, priority, due_date, estimated_hours
            FROM tasks
            WHERE lower(status) = ?2
              AND assignee_id IS NULL
              AND (?1 IS NULL OR project_id = ?1)
            ORDER BY id
            "#,
        )?;
        let rows = stmt.query_map(params![self.project_id, TaskStatus::Todo.as_str()], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, Option<String>>(3)?,
                row.get::<_, f64>(4)?,
            ))
        })?;

        let mut tasks = Vec::new();
        for row in rows {
            let (id, title, priority, due_date, estimated_hours) = row?;
            let priority = priority.parse::<TaskPriority>().map_err(|message| {
                RepositoryError::FieldValueError {
                    field: "tasks.priority".to_string(),
                    message,
                }
            })?;
            let due_date = due_date.as_deref().map(parse_due_date).transpose()?;
            let required_skills = requirements
                .get(&id)
                .map(|reqs| {
                    reqs.iter()
                        .map(|&(skill_id, level)| SkillRequirement::new(skill_id, level))
                        .collect()
                })
                .unwrap_or_default();

            tasks.push(Task {
                id,
                title,
                priority,
                due_date,
                estimated_hours,
                required_skills,
                assignee_id: None,
            });
        }

        debug!(count = tasks.len(), "读取未分派任务");
        Ok(tasks)
    }

    #[instrument(skip(self), fields(project_id = ?self.project_id))]
    fn fetch_active_users(&self) -> RepositoryResult<Vec<User>> {
        let conn = self.get_conn()?;

        let holdings = Self::load_levels(
            &conn,
            "SELECT user_id, skill_id, level FROM user_skill ORDER BY user_id, skill_id",
            "user_skill.level",
        )?;

        let mut stmt = conn.prepare(
            r#"
            SELECT u.id, u.username, u.workload_capacity, u.current_workload
            FROM users u
            WHERE u.is_active = 1
              AND (?1 IS NULL OR EXISTS (
                    SELECT 1 FROM project_user pu
                    WHERE pu.user_id = u.id AND pu.project_id = ?1))
            ORDER BY u.id
            "#,
        )?;
        let rows = stmt.query_map(params![self.project_id], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, f64>(2)?,
                row.get::<_, f64>(3)?,
            ))
        })?;

        let mut users = Vec::new();
        for row in rows {
            let (id, username, workload_capacity, current_workload) = row?;
            let skills = holdings
                .get(&id)
                .map(|hs| {
                    hs.iter()
                        .map(|&(skill_id, level)| SkillHolding::new(skill_id, level))
                        .collect()
                })
                .unwrap_or_default();

            users.push(User {
                id,
                username,
                workload_capacity,
                current_workload,
                skills,
                is_active: true,
            });
        }

        debug!(count = users.len(), "读取活跃用户");
        Ok(users)
    }

    fn fetch_skill_catalog(&self) -> RepositoryResult<Vec<Skill>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare("SELECT id, name, category FROM skills ORDER BY id")?;
        let skills = stmt
            .query_map([], |row| {
                Ok(Skill {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    category: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(skills)
    }
}

/// 解析交期: RFC3339 / "YYYY-MM-DD HH:MM:SS[.ffffff]" / "YYYY-MM-DD"（无时区按 UTC）
fn parse_due_date(raw: &str) -> RepositoryResult<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(dt.and_utc());
        }
    }
    if let Some(dt) = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
    {
        return Ok(dt.and_utc());
    }
    Err(RepositoryError::FieldValueError {
        field: "tasks.due_date".to_string(),
        message: format!("无法解析日期: {}", raw),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_due_date_formats() {
        let expected = Utc.with_ymd_and_hms(2026, 5, 1, 0, 0, 0).unwrap();
        assert_eq!(parse_due_date("2026-05-01").unwrap(), expected);
        assert_eq!(parse_due_date("2026-05-01 00:00:00").unwrap(), expected);
        assert_eq!(parse_due_date("2026-05-01 00:00:00.000000").unwrap(), expected);
        assert_eq!(
            parse_due_date("2026-05-01 00:00:00.250000").unwrap(),
            expected + chrono::Duration::milliseconds(250)
        );
        assert_eq!(parse_due_date("2026-05-01T08:00:00+08:00").unwrap(), expected);
        assert!(parse_due_date("next week").is_err());
    }
}
