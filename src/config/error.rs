// ==========================================
// 技能任务分派系统 - 配置层错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// 配置层错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("未知权重方案: {0}（支持 balanced/workload/skills/priority）")]
    UnknownProfile(String),

    #[error("配置值无效 (key={key}): {value}")]
    Unparsable { key: String, value: String },

    #[error("配置参数越界 (field={field}): {message}")]
    InvalidValue { field: String, message: String },

    #[error("配置 JSON 解析失败: {0}")]
    Json(#[from] serde_json::Error),

    #[error("配置读取失败: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("数据库锁获取失败: {0}")]
    LockError(String),
}

/// Result 类型别名
pub type ConfigResult<T> = Result<T, ConfigError>;
