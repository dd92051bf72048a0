//! Publisher trait

use crate::error::Result;
use crate::types::{Platform, PublishContext, PublishReport};

/// Uploads every matrix cell's artifact to one platform
///
/// Implementations stop at the first failure; nothing is retried.
#[async_trait::async_trait]
pub trait Publisher: Send + Sync {
    /// Display name
    fn name(&self) -> &str;

    /// Target platform
    fn platform(&self) -> Platform;

    /// Upload every cell of the context's matrix
    async fn publish(&self, ctx: &PublishContext<'_>) -> Result<PublishReport>;
}
