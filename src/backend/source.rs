use super::types::Photo;
use super::Result;
use std::future::Future;

/// Anything that can serve the photo listing one page at a time.
pub trait PhotoSource: Send + Sync + 'static {
    fn photos(&self, page: u32, per_page: u32) -> impl Future<Output = Result<Vec<Photo>>> + Send;
}
