use std::collections::VecDeque;

use domain::RoomId;

/// 最近访问列表的容量上限。
const RECENT_ROOMS_CAPACITY: usize = 10;

/// 每个用户会话一份的最近访问聊天室记录，最新的在最前面，无重复。
///
/// 纯同步、无失败路径；随会话创建和销毁，由持有它的会话自行决定
/// 怎么做并发包装。
#[derive(Debug, Clone, Default)]
pub struct RecentRoomsTracker {
    rooms: VecDeque<RoomId>,
}

impl RecentRoomsTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录一次聊天室访问：已在列表里就先移除，再插到最前面，
    /// 超出容量时丢弃最旧的一项。
    pub fn visit(&mut self, room_id: RoomId) {
        self.rooms.retain(|id| *id != room_id);
        self.rooms.push_front(room_id);
        self.rooms.truncate(RECENT_ROOMS_CAPACITY);
    }

    /// 从新到旧的当前列表副本。
    pub fn snapshot(&self) -> Vec<RoomId> {
        self.rooms.iter().copied().collect()
    }
}
