use async_trait::async_trait;
use crate::types::OutgoingEmail;
use crate::Result;

#[async_trait]
pub trait EmailDispatcher: Send + Sync {
    /// Deliver a fully rendered message
    async fn send(&self, email: &OutgoingEmail) -> Result<()>;
}
