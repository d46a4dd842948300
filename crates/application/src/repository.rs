//! 外部协作方接口。
//!
//! 聊天室、用户、文件和消息的持久化都不归本核心管，这里只按调用边界
//! 声明需要的能力。实现方见 infrastructure crate。

use async_trait::async_trait;
use domain::{ChatMessage, FileRef, RepositoryResult, RoomId, UserIdentity};

/// 用户的展示视图，来自用户协作方。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatUser {
    pub identity: UserIdentity,
    pub username: String,
}

/// 聊天室协作方：路由消息前校验聊天室存在。
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait ChatroomStore: Send + Sync {
    async fn exists(&self, id: RoomId) -> RepositoryResult<bool>;
}

/// 用户目录：把用户身份解析为人类可读的展示名。
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn display_name(&self, identity: UserIdentity) -> RepositoryResult<Option<String>>;
}

/// 用户协作方：按身份解析发送者。
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn by_id(&self, identity: UserIdentity) -> RepositoryResult<Option<ChatUser>>;
}

/// 文件协作方：解析消息附带的文件引用。
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait FileStore: Send + Sync {
    async fn by_id(&self, id: i64) -> RepositoryResult<Option<FileRef>>;
}

/// 消息持久化协作方。
///
/// 消息ID和发送时间由实现方在保存时分配，保存后的消息归实现方所有。
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait MessageStore: Send + Sync {
    async fn save(
        &self,
        text: String,
        room_id: RoomId,
        sender: UserIdentity,
        file: Option<FileRef>,
    ) -> RepositoryResult<ChatMessage>;
}
