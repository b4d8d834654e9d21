//! Ports towards the transport layer.

use async_trait::async_trait;
use nightfall_shared::ServerEvent;

/// Connection-layer callback used to push results without knowing about the
/// network transport. Room targets are resolved by the implementation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BroadcastPort: Send + Sync {
    async fn broadcast(&self, events: Vec<ServerEvent>);
}
