use domain::RepositoryError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApplicationError {
    /// 消息路由时引用的聊天室、发送者或文件不存在。
    #[error("{resource} not found: {id}")]
    NotFound { resource: &'static str, id: String },
    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),
}

impl ApplicationError {
    pub fn not_found(resource: &'static str, id: impl ToString) -> Self {
        ApplicationError::NotFound {
            resource,
            id: id.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ApplicationError::NotFound { .. })
    }
}
