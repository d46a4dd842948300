//! 基础设施层：协作方接口的进程内实现。
//!
//! 提供基于 tokio broadcast 的本地主题传输，以及内存版的聊天室、
//! 用户、文件和消息存储，用于组装和集成测试。

pub mod config;
pub mod local_broadcast;
pub mod memory;

pub use config::BroadcastConfig;
pub use local_broadcast::{LocalTopicPublisher, TopicPayload, TopicStream};
pub use memory::{MemoryChatroomStore, MemoryFileStore, MemoryMessageStore, MemoryUserStore};
