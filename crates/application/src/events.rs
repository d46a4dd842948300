use std::collections::HashSet;
use std::sync::Arc;

use domain::{ConnectionId, PresenceEventKind, RoomId, UserIdentity};

use crate::notifier::PresenceNotifier;
use crate::registry::ConnectionRegistry;

/// 来自消息传输层的连接生命周期事件。
///
/// 每种事件一个固定形状的变体，在进入注册表之前就完成校验，
/// 不用松散的键值载荷。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionEvent {
    /// 物理连接建立；聊天室和身份通过连接元数据传入，可能缺失。
    Connect {
        connection_id: ConnectionId,
        identity: Option<UserIdentity>,
        room_id: Option<RoomId>,
    },
    /// 已建立的连接显式加入某个聊天室。
    Join {
        connection_id: ConnectionId,
        identity: Option<UserIdentity>,
        room_id: RoomId,
    },
    /// 物理连接关闭，只携带连接标识。
    Disconnect { connection_id: ConnectionId },
}

/// 连接事件的入口：先改注册表，再发在线状态通知。
///
/// 每个事件由传输层在各自的任务里投递，这里不做任何排队；
/// 注册表自身保证复合修改的原子性。
pub struct PresenceService {
    registry: Arc<ConnectionRegistry>,
    notifier: Arc<PresenceNotifier>,
}

impl PresenceService {
    pub fn new(registry: Arc<ConnectionRegistry>, notifier: Arc<PresenceNotifier>) -> Self {
        Self { registry, notifier }
    }

    pub fn registry(&self) -> &ConnectionRegistry {
        &self.registry
    }

    /// 处理一条连接生命周期事件。
    ///
    /// 缺少身份或聊天室的 connect/join 属于畸形事件：静默忽略，
    /// 不改注册表也不发通知。这条信号通道本来就是尽力而为的，
    /// 没有错误可上报。
    pub async fn handle_connection_event(&self, event: ConnectionEvent) {
        match event {
            ConnectionEvent::Connect {
                connection_id,
                identity: Some(identity),
                room_id: Some(room_id),
            }
            | ConnectionEvent::Join {
                connection_id,
                identity: Some(identity),
                room_id,
            } => {
                self.registry
                    .connect(connection_id, identity.clone(), room_id);
                self.notifier
                    .announce(room_id, &identity, PresenceEventKind::Join)
                    .await;
            }
            ConnectionEvent::Connect { connection_id, .. }
            | ConnectionEvent::Join { connection_id, .. } => {
                tracing::debug!(
                    connection_id = %connection_id,
                    "连接事件缺少身份或聊天室，忽略"
                );
            }
            ConnectionEvent::Disconnect { connection_id } => {
                if let Some((room_id, identity)) = self.registry.disconnect(&connection_id) {
                    self.notifier
                        .announce(room_id, &identity, PresenceEventKind::Leave)
                        .await;
                }
            }
        }
    }

    /// 某个聊天室当前在线用户的身份快照。
    pub fn online_users(&self, room_id: RoomId) -> HashSet<UserIdentity> {
        self.registry.online_users(room_id)
    }

    /// 在线用户的展示名集合，供在线状态查询端点使用。
    ///
    /// 逐个走目录解析，解析不到的身份降级为占位名。
    pub async fn online_display_names(&self, room_id: RoomId) -> HashSet<String> {
        let mut names = HashSet::new();
        for identity in self.registry.online_users(room_id) {
            names.insert(self.notifier.resolve_display_name(&identity).await);
        }
        names
    }
}
