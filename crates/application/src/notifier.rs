use std::sync::Arc;

use domain::{PresenceEvent, PresenceEventKind, RoomId, UserIdentity};

use crate::broadcaster::TopicPublisher;
use crate::repository::UserDirectory;

/// 目录解析失败或查不到用户时使用的占位展示名。
const UNKNOWN_USER: &str = "Unknown User";

/// 把注册表的状态变化变成 JOIN/LEAVE 通知。
///
/// 必须在对应的注册表修改完成之后调用，这样收到通知的一方再来查询
/// 在线列表时看到的已经是新状态。
pub struct PresenceNotifier {
    directory: Arc<dyn UserDirectory>,
    publisher: Arc<dyn TopicPublisher>,
}

impl PresenceNotifier {
    pub fn new(directory: Arc<dyn UserDirectory>, publisher: Arc<dyn TopicPublisher>) -> Self {
        Self {
            directory,
            publisher,
        }
    }

    /// 向聊天室的在线状态主题发布一条 JOIN/LEAVE 通知。
    ///
    /// 发布失败只记日志，不重试也不向触发连接事件的调用方传播，
    /// 在线状态通知本来就是尽力而为的信号通道。
    pub async fn announce(&self, room_id: RoomId, identity: &UserIdentity, kind: PresenceEventKind) {
        let username = self.resolve_display_name(identity).await;
        let event = PresenceEvent { username, kind };

        if let Err(error) = self.publisher.publish_presence(room_id, event).await {
            tracing::warn!(
                room_id = %room_id,
                identity = %identity,
                error = %error,
                "在线状态通知发布失败，忽略"
            );
        }
    }

    /// 解析展示名，目录出错或查不到时降级为占位名。
    pub async fn resolve_display_name(&self, identity: &UserIdentity) -> String {
        match self.directory.display_name(identity.clone()).await {
            Ok(Some(name)) => name,
            Ok(None) => UNKNOWN_USER.to_owned(),
            Err(error) => {
                tracing::warn!(
                    identity = %identity,
                    error = %error,
                    "展示名解析失败，使用占位名"
                );
                UNKNOWN_USER.to_owned()
            }
        }
    }
}
