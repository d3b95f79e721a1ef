use async_trait::async_trait;

use crate::core::error::ResolveError;
use crate::models::media::ResolvedMedia;

#[async_trait]
pub trait MediaResolver: Send + Sync {
    fn name(&self) -> &str;
    async fn resolve(&self, url: &str) -> Result<ResolvedMedia, ResolveError>;
}
