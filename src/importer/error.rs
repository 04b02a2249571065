// ==========================================
// 技能任务分派系统 - 快照文件错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// 导入模块错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 文件相关错误 =====
    #[error("文件不存在: {0}")]
    FileNotFound(String),

    #[error("文件格式不支持: {0}（仅支持 .json）")]
    UnsupportedFormat(String),

    #[error("文件读取失败: {0}")]
    FileReadError(String),

    #[error("文件写入失败: {0}")]
    FileWriteError(String),

    // ===== 内容错误 =====
    #[error("JSON 解析失败: {0}")]
    JsonParseError(#[from] serde_json::Error),

    #[error("快照来源读取失败: {0}")]
    SourceError(String),
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;
