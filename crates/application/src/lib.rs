//! 在线状态与消息分发核心的应用层。
//!
//! 这里提供连接注册表、在线状态通知、消息路由和最近访问记录四个组件，
//! 以及对外部协作方（聊天室、用户、文件、持久化、发布订阅传输）的抽象。

pub mod broadcaster;
pub mod clock;
pub mod error;
pub mod events;
pub mod notifier;
pub mod recent;
pub mod registry;
pub mod repository;
pub mod router;

pub use broadcaster::{BroadcastError, OutboundChatMessage, TopicPublisher};
pub use clock::{Clock, SystemClock};
pub use error::ApplicationError;
pub use events::{ConnectionEvent, PresenceService};
pub use notifier::PresenceNotifier;
pub use recent::RecentRoomsTracker;
pub use registry::ConnectionRegistry;
pub use repository::{ChatUser, ChatroomStore, FileStore, MessageStore, UserDirectory, UserStore};
pub use router::{InboundChatMessage, MessageRouter, MessageRouterDependencies};
