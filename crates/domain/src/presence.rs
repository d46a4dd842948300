use serde::{Deserialize, Serialize};

/// 在线状态变化的类型。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PresenceEventKind {
    #[serde(rename = "JOIN")]
    Join,
    #[serde(rename = "LEAVE")]
    Leave,
}

/// 发布到聊天室在线状态主题的通知。
///
/// 每次通知临时创建，不做持久化。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresenceEvent {
    pub username: String,
    #[serde(rename = "type")]
    pub kind: PresenceEventKind,
}

impl PresenceEvent {
    pub fn join(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            kind: PresenceEventKind::Join,
        }
    }

    pub fn leave(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            kind: PresenceEventKind::Leave,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presence_event_uses_wire_field_names() {
        let event = PresenceEvent::join("alice");
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["username"], "alice");
        assert_eq!(json["type"], "JOIN");

        let event = PresenceEvent::leave("bob");
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "LEAVE");
    }
}
