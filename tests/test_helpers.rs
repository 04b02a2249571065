// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 提供测试所需的数据库初始化、快照数据生成等功能
// ==========================================
#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use rusqlite::{params, Connection};
use std::error::Error;
use task_assign::db::init_snapshot_schema;
use task_assign::domain::types::TaskPriority;
use task_assign::{Task, User};
use tempfile::NamedTempFile;

/// 固定参考时刻
pub fn as_of() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 5, 9, 0, 0).unwrap()
}

/// 创建临时测试数据库并初始化 schema
///
/// # 返回
/// - NamedTempFile: 临时数据库文件（需要保持存活）
/// - String: 数据库文件路径
pub fn create_test_db() -> Result<(NamedTempFile, String), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file.path().to_str().unwrap().to_string();

    let conn = Connection::open(&db_path)?;
    init_snapshot_schema(&conn)?;

    Ok((temp_file, db_path))
}

// ==========================================
// 数据库夹具
// ==========================================

pub fn insert_skill(conn: &Connection, id: i64, name: &str) {
    conn.execute(
        "INSERT INTO skills (id, name, category) VALUES (?1, ?2, 'engineering')",
        params![id, name],
    )
    .unwrap();
}

pub fn insert_user(conn: &Connection, id: i64, active: bool, capacity: f64, workload: f64) {
    conn.execute(
        r#"
        INSERT INTO users (id, username, is_active, workload_capacity, current_workload)
        VALUES (?1, ?2, ?3, ?4, ?5)
        "#,
        params![id, format!("user{}", id), active as i64, capacity, workload],
    )
    .unwrap();
}

pub fn insert_user_skill(conn: &Connection, user_id: i64, skill_id: i64, level: i64) {
    conn.execute(
        "INSERT INTO user_skill (user_id, skill_id, level) VALUES (?1, ?2, ?3)",
        params![user_id, skill_id, level],
    )
    .unwrap();
}

pub fn insert_project(conn: &Connection, id: i64, members: &[i64]) {
    conn.execute(
        "INSERT INTO projects (id, name) VALUES (?1, ?2)",
        params![id, format!("project{}", id)],
    )
    .unwrap();
    for user_id in members {
        conn.execute(
            "INSERT INTO project_user (user_id, project_id) VALUES (?1, ?2)",
            params![user_id, id],
        )
        .unwrap();
    }
}

#[allow(clippy::too_many_arguments)]
pub fn insert_task(
    conn: &Connection,
    id: i64,
    status: &str,
    priority: &str,
    due_date: Option<&str>,
    hours: f64,
    project_id: Option<i64>,
    assignee_id: Option<i64>,
) {
    conn.execute(
        r#"
        INSERT INTO tasks (id, title, status, priority, due_date, estimated_hours, project_id, assignee_id)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
        "#,
        params![
            id,
            format!("task{}", id),
            status,
            priority,
            due_date,
            hours,
            project_id,
            assignee_id
        ],
    )
    .unwrap();
}

pub fn insert_task_skill(conn: &Connection, task_id: i64, skill_id: i64, level: i64) {
    conn.execute(
        "INSERT INTO task_skill (task_id, skill_id, required_level) VALUES (?1, ?2, ?3)",
        params![task_id, skill_id, level],
    )
    .unwrap();
}

// ==========================================
// 内存快照生成
// ==========================================

/// 线性同余伪随机数（固定种子,结果可复现）
pub struct Lcg(u64);

impl Lcg {
    pub fn new(seed: u64) -> Self {
        Self(seed)
    }

    pub fn next_u32(&mut self) -> u32 {
        self.0 = self
            .0
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        (self.0 >> 33) as u32
    }

    /// [0, bound)
    pub fn below(&mut self, bound: u32) -> u32 {
        self.next_u32() % bound
    }
}

/// 生成随机任务/用户快照
///
/// 技能池 1..=3,等级 1..=5;部分任务无要求,部分用户无技能
pub fn random_snapshot(rng: &mut Lcg, n_tasks: usize, n_users: usize) -> (Vec<Task>, Vec<User>) {
    let priorities = [
        TaskPriority::Low,
        TaskPriority::Medium,
        TaskPriority::High,
        TaskPriority::Critical,
    ];

    let tasks = (0..n_tasks)
        .map(|i| {
            let mut task = Task::new(i as i64 + 1)
                .with_priority(priorities[rng.below(4) as usize])
                .with_estimated_hours(1.0 + rng.below(40) as f64);
            if rng.below(3) > 0 {
                task = task.with_due_date(as_of() + chrono::Duration::hours(rng.below(400) as i64));
            }
            for skill_id in 1..=3 {
                if rng.below(3) == 0 {
                    task = task.require(skill_id, 1 + rng.below(5) as u8);
                }
            }
            task
        })
        .collect();

    let users = (0..n_users)
        .map(|i| {
            let mut user = User::new(i as i64 + 1)
                .with_capacity(20.0 + rng.below(60) as f64)
                .with_workload(rng.below(50) as f64);
            for skill_id in 1..=3 {
                if rng.below(2) == 0 {
                    user = user.with_skill(skill_id, 1 + rng.below(5) as u8);
                }
            }
            user
        })
        .collect();

    (tasks, users)
}
