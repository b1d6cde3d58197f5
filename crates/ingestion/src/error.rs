//! Ingestion 错误类型

use contracts::ReplayError;
use thiserror::Error;

/// Ingestion 错误
#[derive(Debug, Error)]
pub enum IngestionError {
    /// 工作线程异常退出 (panic 或被中止)
    #[error("resample worker failed: {message}")]
    WorkerFailed {
        /// 错误消息
        message: String,
    },

    /// 调用方取消
    #[error("resampling cancelled")]
    Cancelled,
}

impl From<IngestionError> for ReplayError {
    fn from(err: IngestionError) -> Self {
        match err {
            IngestionError::Cancelled => ReplayError::Cancelled,
            other => ReplayError::Other(other.to_string()),
        }
    }
}

/// Ingestion Result 类型别名
pub type Result<T> = std::result::Result<T, IngestionError>;
