//! 领域层错误定义

use thiserror::Error;

/// 协作方（持久化、目录、文件存储）返回的错误。
///
/// 本核心自身的纯内存操作不会失败，失败只可能来自外部协作方。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// 后端访问失败
    #[error("repository backend error: {0}")]
    Backend(String),
}

impl RepositoryError {
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend(message.into())
    }
}

/// 协作方调用结果类型
pub type RepositoryResult<T> = Result<T, RepositoryError>;
