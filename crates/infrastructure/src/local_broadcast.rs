// 进程内的本地主题传输
use async_trait::async_trait;
use domain::{PresenceEvent, RoomId};
use tokio::sync::broadcast;

use application::broadcaster::{BroadcastError, OutboundChatMessage, TopicPublisher};

use crate::config::BroadcastConfig;

/// 一个聊天室主题上投递的载荷：在线状态通知或聊天消息。
#[derive(Debug, Clone, PartialEq)]
pub enum TopicPayload {
    Presence(PresenceEvent),
    Message(OutboundChatMessage),
}

#[derive(Debug, Clone)]
struct TopicBroadcast {
    room_id: RoomId,
    payload: TopicPayload,
}

/// 基于 tokio broadcast 的本地发布器。
///
/// 单进程部署时的传输实现；所有聊天室共用一条通道，订阅端按
/// 聊天室过滤，等价于"每个聊天室每种载荷一个主题"的对外语义。
#[derive(Clone)]
pub struct LocalTopicPublisher {
    sender: broadcast::Sender<TopicBroadcast>,
}

impl LocalTopicPublisher {
    pub fn new() -> Self {
        Self::with_config(&BroadcastConfig::default())
    }

    pub fn with_config(config: &BroadcastConfig) -> Self {
        let (sender, _) = broadcast::channel(config.buffer);
        Self { sender }
    }

    /// 订阅某个聊天室的全部载荷。
    pub fn subscribe(&self, room_id: RoomId) -> TopicStream {
        TopicStream {
            receiver: self.sender.subscribe(),
            room_id,
        }
    }

    fn send(&self, room_id: RoomId, payload: TopicPayload) {
        // send 只在没有任何订阅者时失败，此时丢弃载荷正是扇出语义
        if self
            .sender
            .send(TopicBroadcast { room_id, payload })
            .is_err()
        {
            tracing::debug!(room_id = %room_id, "没有订阅者，载荷被丢弃");
        }
    }
}

impl Default for LocalTopicPublisher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TopicPublisher for LocalTopicPublisher {
    async fn publish_presence(
        &self,
        room_id: RoomId,
        event: PresenceEvent,
    ) -> Result<(), BroadcastError> {
        self.send(room_id, TopicPayload::Presence(event));
        Ok(())
    }

    async fn publish_message(
        &self,
        room_id: RoomId,
        message: OutboundChatMessage,
    ) -> Result<(), BroadcastError> {
        self.send(room_id, TopicPayload::Message(message));
        Ok(())
    }
}

/// 单个聊天室的订阅流。
pub struct TopicStream {
    receiver: broadcast::Receiver<TopicBroadcast>,
    room_id: RoomId,
}

impl TopicStream {
    /// 收取下一条属于本聊天室的载荷；通道关闭后返回 `None`。
    pub async fn recv(&mut self) -> Option<TopicPayload> {
        loop {
            match self.receiver.recv().await {
                Ok(broadcast) => {
                    if broadcast.room_id == self.room_id {
                        return Some(broadcast.payload);
                    }
                }
                // 落后导致的Lagged：跳过被丢弃的消息继续收
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}
