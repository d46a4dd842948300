use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, PoisonError};

use domain::{ConnectionId, RoomId, UserIdentity};

/// 两张表必须在同一次加锁内一起修改，所以放进同一个结构体。
#[derive(Debug, Default)]
struct RegistryState {
    /// 每个聊天室当前在线的用户身份集合。
    room_users: HashMap<RoomId, HashSet<UserIdentity>>,
    /// 每条连接归属的聊天室和认证身份。
    connections: HashMap<ConnectionId, (RoomId, UserIdentity)>,
}

/// 连接注册表：进程内的在线状态真相来源。
///
/// 所有状态只存在于内存中，随进程消亡；空聊天室的条目会被立即清理，
/// 避免无限增长。连接、断开都是跨两张表的复合修改，必须在一把锁内
/// 完成，临界区只有几次哈希表操作，从不挂起。
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    state: Mutex<RegistryState>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> std::sync::MutexGuard<'_, RegistryState> {
        // 临界区内不会panic，即使中毒也直接恢复内部状态
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// 将一条连接登记到聊天室，并把对应用户加入在线集合。
    ///
    /// 幂等：同一用户重复登记不会产生重复条目。若该连接此前已登记到
    /// 别的聊天室，旧映射被直接覆盖，不会为旧聊天室补发 LEAVE 通知
    /// （与原系统一致的已知简化）。
    pub fn connect(&self, connection_id: ConnectionId, identity: UserIdentity, room_id: RoomId) {
        let mut state = self.state();

        if let Some((previous_room, _)) = state.connections.get(&connection_id) {
            if *previous_room != room_id {
                tracing::debug!(
                    connection_id = %connection_id,
                    previous_room = %previous_room,
                    room_id = %room_id,
                    "连接切换聊天室，覆盖旧映射"
                );
            }
        }

        state
            .room_users
            .entry(room_id)
            .or_default()
            .insert(identity.clone());
        state
            .connections
            .insert(connection_id.clone(), (room_id, identity.clone()));

        tracing::info!(
            connection_id = %connection_id,
            identity = %identity,
            room_id = %room_id,
            "用户连接到聊天室"
        );
    }

    /// 注销一条连接，返回它此前归属的聊天室和用户身份。
    ///
    /// 对应用户会从聊天室在线集合中移除；集合空了就删掉整个聊天室
    /// 条目。未知连接是空操作，返回 `None`。
    pub fn disconnect(&self, connection_id: &ConnectionId) -> Option<(RoomId, UserIdentity)> {
        let mut state = self.state();

        let (room_id, identity) = state.connections.remove(connection_id)?;

        if let Some(users) = state.room_users.get_mut(&room_id) {
            users.remove(&identity);
            if users.is_empty() {
                state.room_users.remove(&room_id);
            }
        }

        tracing::info!(
            connection_id = %connection_id,
            identity = %identity,
            room_id = %room_id,
            "用户从聊天室断开"
        );

        Some((room_id, identity))
    }

    /// 某个聊天室当前在线用户的不可变快照。
    ///
    /// 不存在的聊天室返回空集合，而不是错误。
    pub fn online_users(&self, room_id: RoomId) -> HashSet<UserIdentity> {
        let state = self.state();
        state.room_users.get(&room_id).cloned().unwrap_or_default()
    }

    /// 注册表当前是否跟踪着任何聊天室（测试用）。
    pub fn is_empty(&self) -> bool {
        let state = self.state();
        state.room_users.is_empty() && state.connections.is_empty()
    }
}
