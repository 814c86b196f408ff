use anyhow::Result;
use async_trait::async_trait;

use crate::conversation::Message;

/// Boundary to a remote chat-completion endpoint.
///
/// One call per turn: the full ordered history goes out, the top choice's
/// text content comes back. Any failure (network, non-success status,
/// malformed payload) surfaces as a single descriptive error; the core
/// never retries.
#[async_trait]
pub trait Provider: Send + Sync {
    async fn complete(&self, messages: &[Message]) -> Result<String>;
}

#[async_trait]
impl<P: Provider + ?Sized> Provider for std::sync::Arc<P> {
    async fn complete(&self, messages: &[Message]) -> Result<String> {
        (**self).complete(messages).await
    }
}
