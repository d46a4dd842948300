use crate::value_objects::{MessageId, RoomId, Timestamp, UserIdentity};

/// 消息附带的文件引用，由文件协作方解析得到。
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FileRef {
    pub id: i64,
    pub filename: String,
}

/// 已持久化的聊天消息。
///
/// 由持久化协作方在保存时创建并分配ID和时间戳，创建之后本核心不再修改。
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ChatMessage {
    pub id: MessageId,
    pub text: String,
    pub sender: UserIdentity,
    pub room_id: RoomId,
    pub sent_at: Timestamp,
    pub file: Option<FileRef>,
}
