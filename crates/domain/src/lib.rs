//! 聊天系统在线状态与消息分发核心的领域模型
//!
//! 包含聊天室、用户身份、连接等标识类型，消息实体与在线状态事件，
//! 以及相关的错误定义。

pub mod errors;
pub mod message;
pub mod presence;
pub mod value_objects;

pub use errors::{RepositoryError, RepositoryResult};
pub use message::{ChatMessage, FileRef};
pub use presence::{PresenceEvent, PresenceEventKind};
pub use value_objects::{ConnectionId, MessageId, RoomId, Timestamp, UserIdentity};
