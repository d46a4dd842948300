use std::sync::Arc;

use domain::{RoomId, UserIdentity};

use crate::broadcaster::{OutboundChatMessage, TopicPublisher};
use crate::error::ApplicationError;
use crate::repository::{ChatroomStore, FileStore, MessageStore, UserStore};

/// 来自消息传输层的聊天消息提交。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundChatMessage {
    pub text: String,
    pub room_id: RoomId,
    pub sender: UserIdentity,
    pub file_id: Option<i64>,
}

pub struct MessageRouterDependencies {
    pub chatrooms: Arc<dyn ChatroomStore>,
    pub users: Arc<dyn UserStore>,
    pub files: Arc<dyn FileStore>,
    pub messages: Arc<dyn MessageStore>,
    pub publisher: Arc<dyn TopicPublisher>,
}

/// 把入站聊天提交变成已持久化、已充实、已广播的消息。
pub struct MessageRouter {
    deps: MessageRouterDependencies,
}

impl MessageRouter {
    pub fn new(deps: MessageRouterDependencies) -> Self {
        Self { deps }
    }

    /// 校验、持久化并广播一条聊天消息。
    ///
    /// 校验阶段（聊天室、发送者、文件）任何一步失败都会在持久化和
    /// 广播之前中止整个操作，不留下任何部分状态。持久化之后的广播
    /// 失败只记日志：消息已存在于存储中但从未被公告，这是规格允许
    /// 且不做恢复的状态。
    pub async fn route(
        &self,
        inbound: InboundChatMessage,
    ) -> Result<OutboundChatMessage, ApplicationError> {
        if !self.deps.chatrooms.exists(inbound.room_id).await? {
            return Err(ApplicationError::not_found("chatroom", inbound.room_id));
        }

        let sender = self
            .deps
            .users
            .by_id(inbound.sender.clone())
            .await?
            .ok_or_else(|| ApplicationError::not_found("sender", &inbound.sender))?;

        let file = match inbound.file_id {
            Some(file_id) => Some(
                self.deps
                    .files
                    .by_id(file_id)
                    .await?
                    .ok_or_else(|| ApplicationError::not_found("file", file_id))?,
            ),
            None => None,
        };

        let saved = self
            .deps
            .messages
            .save(inbound.text, inbound.room_id, inbound.sender, file)
            .await?;

        tracing::info!(
            room_id = %saved.room_id,
            message_id = %saved.id,
            sender = %saved.sender,
            "消息已持久化"
        );

        let outbound = OutboundChatMessage::from_saved(&saved, sender.username);

        if let Err(error) = self
            .deps
            .publisher
            .publish_message(saved.room_id, outbound.clone())
            .await
        {
            tracing::error!(
                room_id = %saved.room_id,
                message_id = %saved.id,
                error = %error,
                "消息已持久化但广播失败"
            );
        }

        Ok(outbound)
    }
}

#[cfg(test)]
mod tests {
    use domain::{ChatMessage, FileRef, MessageId, RepositoryError};
    use mockall::predicate::eq;
    use time::macros::datetime;

    use super::*;
    use crate::broadcaster::MockTopicPublisher;
    use crate::repository::{
        ChatUser, MockChatroomStore, MockFileStore, MockMessageStore, MockUserStore,
    };

    fn user(id: &str) -> UserIdentity {
        UserIdentity::from(id)
    }

    struct Mocks {
        chatrooms: MockChatroomStore,
        users: MockUserStore,
        files: MockFileStore,
        messages: MockMessageStore,
        publisher: MockTopicPublisher,
    }

    impl Mocks {
        fn new() -> Self {
            Self {
                chatrooms: MockChatroomStore::new(),
                users: MockUserStore::new(),
                files: MockFileStore::new(),
                messages: MockMessageStore::new(),
                publisher: MockTopicPublisher::new(),
            }
        }

        fn into_router(self) -> MessageRouter {
            MessageRouter::new(MessageRouterDependencies {
                chatrooms: Arc::new(self.chatrooms),
                users: Arc::new(self.users),
                files: Arc::new(self.files),
                messages: Arc::new(self.messages),
                publisher: Arc::new(self.publisher),
            })
        }
    }

    fn inbound(file_id: Option<i64>) -> InboundChatMessage {
        InboundChatMessage {
            text: "hi".to_owned(),
            room_id: RoomId(7),
            sender: user("u1"),
            file_id,
        }
    }

    #[tokio::test]
    async fn routes_message_and_publishes_exactly_once() {
        let mut mocks = Mocks::new();
        mocks
            .chatrooms
            .expect_exists()
            .with(eq(RoomId(7)))
            .returning(|_| Ok(true));
        mocks.users.expect_by_id().with(eq(user("u1"))).returning(|identity| {
            Ok(Some(ChatUser {
                identity,
                username: "Alice".to_owned(),
            }))
        });
        mocks
            .messages
            .expect_save()
            .withf(|text, room_id, sender, file| {
                text.as_str() == "hi"
                    && *room_id == RoomId(7)
                    && *sender == UserIdentity::from("u1")
                    && file.is_none()
            })
            .times(1)
            .returning(|text, room_id, sender, file| {
                Ok(ChatMessage {
                    id: MessageId(41),
                    text,
                    sender,
                    room_id,
                    sent_at: datetime!(2024-05-04 09:07 UTC),
                    file,
                })
            });
        mocks
            .publisher
            .expect_publish_message()
            .withf(|room_id, outbound| {
                *room_id == RoomId(7) && outbound.id == MessageId(41) && outbound.time == "09:07"
            })
            .times(1)
            .returning(|_, _| Ok(()));

        let outbound = mocks.into_router().route(inbound(None)).await.unwrap();

        assert_eq!(outbound.id, MessageId(41));
        assert_eq!(outbound.from, "Alice");
        assert_eq!(outbound.from_id, user("u1"));
        assert_eq!(outbound.time, "09:07");
        assert_eq!(outbound.filename, None);
    }

    #[tokio::test]
    async fn missing_chatroom_aborts_before_any_side_effect() {
        let mut mocks = Mocks::new();
        mocks.chatrooms.expect_exists().returning(|_| Ok(false));
        // 其余mock不设期望：任何调用都会panic，证明没有副作用

        let error = mocks.into_router().route(inbound(None)).await.unwrap_err();
        assert!(error.is_not_found());
    }

    #[tokio::test]
    async fn missing_sender_aborts_before_persistence() {
        let mut mocks = Mocks::new();
        mocks.chatrooms.expect_exists().returning(|_| Ok(true));
        mocks.users.expect_by_id().returning(|_| Ok(None));

        let error = mocks.into_router().route(inbound(None)).await.unwrap_err();
        assert!(error.is_not_found());
    }

    #[tokio::test]
    async fn missing_file_aborts_before_persistence() {
        let mut mocks = Mocks::new();
        mocks.chatrooms.expect_exists().returning(|_| Ok(true));
        mocks.users.expect_by_id().returning(|identity| {
            Ok(Some(ChatUser {
                identity,
                username: "Alice".to_owned(),
            }))
        });
        mocks.files.expect_by_id().with(eq(9)).returning(|_| Ok(None));

        let error = mocks.into_router().route(inbound(Some(9))).await.unwrap_err();
        assert!(error.is_not_found());
    }

    #[tokio::test]
    async fn attached_file_name_flows_into_outbound_payload() {
        let mut mocks = Mocks::new();
        mocks.chatrooms.expect_exists().returning(|_| Ok(true));
        mocks.users.expect_by_id().returning(|identity| {
            Ok(Some(ChatUser {
                identity,
                username: "Alice".to_owned(),
            }))
        });
        mocks.files.expect_by_id().with(eq(9)).returning(|id| {
            Ok(Some(FileRef {
                id,
                filename: "notes.pdf".to_owned(),
            }))
        });
        mocks
            .messages
            .expect_save()
            .returning(|text, room_id, sender, file| {
                Ok(ChatMessage {
                    id: MessageId(42),
                    text,
                    sender,
                    room_id,
                    sent_at: datetime!(2024-05-04 18:30 UTC),
                    file,
                })
            });
        mocks
            .publisher
            .expect_publish_message()
            .times(1)
            .returning(|_, _| Ok(()));

        let outbound = mocks.into_router().route(inbound(Some(9))).await.unwrap();
        assert_eq!(outbound.filename.as_deref(), Some("notes.pdf"));
        assert_eq!(outbound.time, "18:30");
    }

    #[tokio::test]
    async fn repository_failure_propagates() {
        let mut mocks = Mocks::new();
        mocks
            .chatrooms
            .expect_exists()
            .returning(|_| Err(RepositoryError::backend("db down")));

        let error = mocks.into_router().route(inbound(None)).await.unwrap_err();
        assert!(matches!(error, ApplicationError::Repository(_)));
    }

    #[tokio::test]
    async fn publish_failure_does_not_fail_the_route() {
        let mut mocks = Mocks::new();
        mocks.chatrooms.expect_exists().returning(|_| Ok(true));
        mocks.users.expect_by_id().returning(|identity| {
            Ok(Some(ChatUser {
                identity,
                username: "Alice".to_owned(),
            }))
        });
        mocks
            .messages
            .expect_save()
            .returning(|text, room_id, sender, file| {
                Ok(ChatMessage {
                    id: MessageId(43),
                    text,
                    sender,
                    room_id,
                    sent_at: datetime!(2024-05-04 09:07 UTC),
                    file,
                })
            });
        mocks
            .publisher
            .expect_publish_message()
            .returning(|_, _| Err(crate::broadcaster::BroadcastError::failed("buffer full")));

        // 消息已持久化，广播失败不回滚也不上抛
        let outbound = mocks.into_router().route(inbound(None)).await.unwrap();
        assert_eq!(outbound.id, MessageId(43));
    }
}
