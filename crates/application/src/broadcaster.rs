use async_trait::async_trait;
use domain::{ChatMessage, MessageId, PresenceEvent, RoomId, UserIdentity};
use thiserror::Error;

/// 发布到聊天室消息主题的载荷。
///
/// 字段名沿用线上协议：`fromId`、`chatroomId` 为 camelCase，
/// 没有附件时不输出 `filename` 字段。
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutboundChatMessage {
    pub id: MessageId,
    /// 发送者展示名
    pub from: String,
    /// 发送者稳定身份
    pub from_id: UserIdentity,
    pub text: String,
    /// "HH:mm" 格式的发送时间，仅用于前端展示
    pub time: String,
    pub chatroom_id: RoomId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
}

impl OutboundChatMessage {
    /// 用持久化后的消息和发送者展示名构造外发载荷。
    pub fn from_saved(message: &ChatMessage, from: String) -> Self {
        Self {
            id: message.id,
            from,
            from_id: message.sender.clone(),
            text: message.text.clone(),
            time: format!("{:02}:{:02}", message.sent_at.hour(), message.sent_at.minute()),
            chatroom_id: message.room_id,
            filename: message.file.as_ref().map(|file| file.filename.clone()),
        }
    }
}

#[derive(Debug, Error)]
pub enum BroadcastError {
    #[error("broadcast failed: {0}")]
    Failed(String),
}

impl BroadcastError {
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}

/// 发布订阅传输：每个聊天室各有一个在线状态主题和一个消息主题。
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait TopicPublisher: Send + Sync {
    async fn publish_presence(
        &self,
        room_id: RoomId,
        event: PresenceEvent,
    ) -> Result<(), BroadcastError>;

    async fn publish_message(
        &self,
        room_id: RoomId,
        message: OutboundChatMessage,
    ) -> Result<(), BroadcastError>;
}
