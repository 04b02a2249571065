// ==========================================
// 技能任务分派系统 - 配置管理器
// ==========================================
// 职责: 从 config_kv 表读取成本模型覆写,组装 EngineConfig
// 存储: config_kv 表 (scope_id + key + value)
// ==========================================

use crate::config::cost_profile::{EngineConfig, WeightProfile};
use crate::config::error::{ConfigError, ConfigResult};
use crate::db::open_sqlite_connection;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> ConfigResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> ConfigResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| ConfigError::LockError(e.to_string()))
    }

    /// 读取 global scope 的配置值
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    pub fn get_global_config_value(&self, key: &str) -> ConfigResult<Option<String>> {
        let conn = self.get_conn()?;
        let value = conn
            .query_row(
                "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    /// 写入 global scope 的配置值（存在则覆盖）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> ConfigResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO config_kv (scope_id, key, value)
            VALUES ('global', ?1, ?2)
            ON CONFLICT(scope_id, key) DO UPDATE SET value = excluded.value
            "#,
            params![key, value],
        )?;
        Ok(())
    }

    /// 获取所有 global 配置的快照（按 key 排序）
    pub fn get_config_snapshot(&self) -> ConfigResult<BTreeMap<String, String>> {
        let conn = self.get_conn()?;
        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut snapshot = BTreeMap::new();
        for row in rows {
            let (key, value) = row?;
            snapshot.insert(key, value);
        }
        Ok(snapshot)
    }

    /// 组装引擎配置
    ///
    /// 规则:
    /// 1) 以 cost_profile 预设权重为基础（缺省 balanced）
    /// 2) 单项权重 / 参数键存在时覆盖
    /// 3) 最终结果必须通过 EngineConfig::validate
    pub fn load_engine_config(&self) -> ConfigResult<EngineConfig> {
        let profile = match self.get_global_config_value(config_keys::COST_PROFILE)? {
            Some(raw) => WeightProfile::from_str(&raw)?,
            None => WeightProfile::default(),
        };
        let mut config = EngineConfig::with_profile(profile);

        if let Some(v) = self.read_f64(config_keys::WEIGHT_SKILL)? {
            config.weights.skill = v;
        }
        if let Some(v) = self.read_f64(config_keys::WEIGHT_LOAD)? {
            config.weights.load = v;
        }
        if let Some(v) = self.read_f64(config_keys::WEIGHT_PRIORITY)? {
            config.weights.priority = v;
        }
        if let Some(v) = self.read_f64(config_keys::WEIGHT_DEADLINE)? {
            config.weights.deadline = v;
        }
        if let Some(v) = self.read_f64(config_keys::OVERQUALIFICATION_BONUS)? {
            config.overqualification_bonus = v;
        }
        if let Some(v) = self.read_f64(config_keys::DEADLINE_HORIZON_DAYS)? {
            config.deadline_horizon_days = v;
        }
        if let Some(v) = self.read_f64(config_keys::OVERLOAD_SCALE)? {
            config.overload_scale = v;
        }

        config.validate()?;
        debug!(profile = %profile, weights = ?config.weights, "已加载引擎配置");
        Ok(config)
    }

    fn read_f64(&self, key: &str) -> ConfigResult<Option<f64>> {
        match self.get_global_config_value(key)? {
            Some(raw) => raw
                .trim()
                .parse::<f64>()
                .map(Some)
                .map_err(|_| ConfigError::Unparsable {
                    key: key.to_string(),
                    value: raw,
                }),
            None => Ok(None),
        }
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 权重方案
    pub const COST_PROFILE: &str = "cost_profile";

    // 单项权重
    pub const WEIGHT_SKILL: &str = "cost_weight_skill";
    pub const WEIGHT_LOAD: &str = "cost_weight_load";
    pub const WEIGHT_PRIORITY: &str = "cost_weight_priority";
    pub const WEIGHT_DEADLINE: &str = "cost_weight_deadline";

    // 成本公式参数
    pub const OVERQUALIFICATION_BONUS: &str = "overqualification_bonus";
    pub const DEADLINE_HORIZON_DAYS: &str = "deadline_horizon_days";
    pub const OVERLOAD_SCALE: &str = "overload_scale";
}
