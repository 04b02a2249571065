// ==========================================
// 技能任务分派系统 - API层错误类型
// ==========================================
// 职责: 汇总引擎/仓储/导入/配置错误,转换为调用方可读的错误消息
// ==========================================

use crate::config::ConfigError;
use crate::engine::EngineError;
use crate::importer::ImportError;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 输入错误
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("资源未找到: {0}")]
    NotFound(String),

    #[error("数据验证失败: {0}")]
    ValidationError(String),

    #[error("配置错误: {0}")]
    ConfigError(String),

    // ==========================================
    // 数据访问错误
    // ==========================================
    #[error("数据库错误: {0}")]
    DatabaseError(String),

    #[error("数据库连接失败: {0}")]
    DatabaseConnectionError(String),

    #[error("快照导入失败: {0}")]
    ImportError(String),

    #[error("结果导出失败: {0}")]
    ExportError(String),

    // ==========================================
    // 引擎故障
    // ==========================================
    #[error("分派引擎故障: {0}")]
    EngineFault(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ==========================================
// 从 EngineError 转换
// 畸形输入 → ValidationError;求解器不变量违反 → EngineFault
// ==========================================
impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::SolverInternalInconsistency(_) => ApiError::EngineFault(err.to_string()),
            EngineError::UnknownUser(_) => ApiError::InvalidInput(err.to_string()),
            EngineError::InvalidConfig(msg) => ApiError::ConfigError(msg),
            _ => ApiError::ValidationError(err.to_string()),
        }
    }
}

// ==========================================
// 从 RepositoryError 转换
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{}(id={})不存在", entity, id))
            }
            RepositoryError::DatabaseConnectionError(msg) => ApiError::DatabaseConnectionError(msg),
            RepositoryError::LockError(msg) => {
                ApiError::DatabaseConnectionError(format!("数据库锁获取失败: {}", msg))
            }
            RepositoryError::DatabaseQueryError(msg) => ApiError::DatabaseError(msg),
            RepositoryError::UniqueConstraintViolation(msg) => {
                ApiError::DatabaseError(format!("唯一约束违反: {}", msg))
            }
            RepositoryError::ForeignKeyViolation(msg) => {
                ApiError::DatabaseError(format!("外键约束违反: {}", msg))
            }
            RepositoryError::FieldValueError { field, message } => {
                ApiError::InvalidInput(format!("字段{}错误: {}", field, message))
            }
        }
    }
}

impl From<ImportError> for ApiError {
    fn from(err: ImportError) -> Self {
        match err {
            ImportError::FileNotFound(path) => ApiError::NotFound(format!("快照文件 {}", path)),
            other => ApiError::ImportError(other.to_string()),
        }
    }
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_error_mapping() {
        let fault: ApiError = EngineError::SolverInternalInconsistency("x".to_string()).into();
        assert!(matches!(fault, ApiError::EngineFault(_)));

        let invalid: ApiError = EngineError::DuplicateTaskId(3).into();
        assert!(matches!(invalid, ApiError::ValidationError(msg) if msg.contains("task_id=3")));

        let config: ApiError = EngineError::InvalidConfig("weights.load".to_string()).into();
        assert!(matches!(config, ApiError::ConfigError(_)));
    }

    #[test]
    fn test_repository_error_mapping() {
        let err: ApiError = RepositoryError::LockError("poisoned".to_string()).into();
        assert!(matches!(err, ApiError::DatabaseConnectionError(_)));
    }
}
