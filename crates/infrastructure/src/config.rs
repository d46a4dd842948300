use serde::Deserialize;

/// 本地广播传输的配置。
#[derive(Debug, Clone, Deserialize)]
pub struct BroadcastConfig {
    /// broadcast 通道的缓冲容量；订阅者落后超过这个数量会丢最旧的消息。
    #[serde(default = "default_buffer")]
    pub buffer: usize,
}

fn default_buffer() -> usize {
    1000
}

impl Default for BroadcastConfig {
    fn default() -> Self {
        Self {
            buffer: default_buffer(),
        }
    }
}
