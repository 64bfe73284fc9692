// ==========================================
// 仓库订单看板 - API层错误类型
// ==========================================
// 职责: 定义API层错误类型，转换Repository错误为调用方可读的错误消息
// ==========================================

use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 数据读取错误
    // ==========================================
    /// 数据源不可用（重试耗尽后仍失败），看板应显示不可用状态
    #[error("订单数据读取失败: {0}")]
    RetrievalFailed(#[from] RepositoryError),

    // ==========================================
    // 输入 / 配置错误
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    /// 看板配置读取失败（config_kv 不可读）
    #[error("配置错误: {0}")]
    ConfigError(String),
}

impl ApiError {
    /// 是否为数据源不可用
    pub fn is_retrieval_failure(&self) -> bool {
        matches!(self, ApiError::RetrievalFailed(_))
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_error_conversion() {
        let repo_err = RepositoryError::RetryExhausted {
            operation: "fetch_orders_in_range".to_string(),
            attempts: 3,
            last: Box::new(RepositoryError::DatabaseConnectionError("refused".to_string())),
        };
        let api_err: ApiError = repo_err.into();
        assert!(api_err.is_retrieval_failure());
        assert!(api_err.to_string().contains("fetch_orders_in_range"));
    }

    #[test]
    fn test_invalid_input_is_not_retrieval_failure() {
        let err = ApiError::InvalidInput("start > end".to_string());
        assert!(!err.is_retrieval_failure());
    }
}
