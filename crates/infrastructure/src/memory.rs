//! 内存版协作方实现，用于组装和集成测试。

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use application::clock::Clock;
use application::repository::{ChatUser, ChatroomStore, FileStore, MessageStore, UserDirectory, UserStore};
use domain::{ChatMessage, FileRef, MessageId, RepositoryResult, RoomId, UserIdentity};

/// 内存聊天室存储：只记录哪些聊天室存在。
#[derive(Debug, Default)]
pub struct MemoryChatroomStore {
    rooms: RwLock<HashSet<RoomId>>,
}

impl MemoryChatroomStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_room(&self, id: RoomId) {
        self.rooms.write().await.insert(id);
    }
}

#[async_trait]
impl ChatroomStore for MemoryChatroomStore {
    async fn exists(&self, id: RoomId) -> RepositoryResult<bool> {
        Ok(self.rooms.read().await.contains(&id))
    }
}

/// 内存用户存储，同时充当用户目录。
#[derive(Debug, Default)]
pub struct MemoryUserStore {
    users: RwLock<HashMap<UserIdentity, ChatUser>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_user(&self, identity: UserIdentity, username: impl Into<String>) {
        let user = ChatUser {
            identity: identity.clone(),
            username: username.into(),
        };
        self.users.write().await.insert(identity, user);
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn by_id(&self, identity: UserIdentity) -> RepositoryResult<Option<ChatUser>> {
        Ok(self.users.read().await.get(&identity).cloned())
    }
}

#[async_trait]
impl UserDirectory for MemoryUserStore {
    async fn display_name(&self, identity: UserIdentity) -> RepositoryResult<Option<String>> {
        Ok(self
            .users
            .read()
            .await
            .get(&identity)
            .map(|user| user.username.clone()))
    }
}

/// 内存文件存储。
#[derive(Debug, Default)]
pub struct MemoryFileStore {
    files: RwLock<HashMap<i64, FileRef>>,
}

impl MemoryFileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_file(&self, file: FileRef) {
        self.files.write().await.insert(file.id, file);
    }
}

#[async_trait]
impl FileStore for MemoryFileStore {
    async fn by_id(&self, id: i64) -> RepositoryResult<Option<FileRef>> {
        Ok(self.files.read().await.get(&id).cloned())
    }
}

/// 内存消息存储：保存时分配自增ID和当前时间。
pub struct MemoryMessageStore {
    clock: Arc<dyn Clock>,
    next_id: AtomicI64,
    messages: RwLock<Vec<ChatMessage>>,
}

impl MemoryMessageStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            next_id: AtomicI64::new(1),
            messages: RwLock::new(Vec::new()),
        }
    }

    /// 目前已保存的全部消息（测试用）。
    pub async fn saved(&self) -> Vec<ChatMessage> {
        self.messages.read().await.clone()
    }
}

#[async_trait]
impl MessageStore for MemoryMessageStore {
    async fn save(
        &self,
        text: String,
        room_id: RoomId,
        sender: UserIdentity,
        file: Option<FileRef>,
    ) -> RepositoryResult<ChatMessage> {
        let message = ChatMessage {
            id: MessageId(self.next_id.fetch_add(1, Ordering::Relaxed)),
            text,
            sender,
            room_id,
            sent_at: self.clock.now(),
            file,
        };
        self.messages.write().await.push(message.clone());
        Ok(message)
    }
}
