use super::types::FeedState;
use super::PhotoSource;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Owns the feed state and fetches one page at a time into it.
///
/// Subscribers observe every change through a [`watch::Receiver`]. At most one
/// fetch is outstanding: [`FeedLoader::load_more`] is a no-op while `busy`.
pub struct FeedLoader<S> {
    source: Arc<S>,
    per_page: u32,
    tx: Arc<watch::Sender<FeedState>>,
}

impl<S> FeedLoader<S>
where
    S: PhotoSource,
{
    pub fn new(source: Arc<S>, per_page: u32) -> Self {
        let (tx, _) = watch::channel(FeedState::default());
        Self {
            source,
            per_page,
            tx: Arc::new(tx),
        }
    }
    pub fn subscribe(&self) -> watch::Receiver<FeedState> {
        self.tx.subscribe()
    }
    /// Starts fetching the next page unless a fetch is already in flight.
    ///
    /// The returned handle resolves once the state has been updated; callers
    /// that only care about the subscription can drop it.
    pub fn load_more(&self) -> Option<JoinHandle<()>> {
        let mut next = None;
        self.tx.send_if_modified(|state| {
            if state.busy {
                return false;
            }
            state.busy = true;
            next = Some(state.page);
            true
        });
        let Some(page) = next else {
            log::debug!("fetch already in flight");
            return None;
        };
        let (source, per_page) = (self.source.clone(), self.per_page);
        let busy = BusyGuard(self.tx.clone());
        Some(tokio::spawn(async move {
            log::debug!("fetch page {page} ({per_page} per page)");
            match source.photos(page, per_page).await {
                Ok(photos) => {
                    log::info!("fetched {} photos from page {page}", photos.len());
                    busy.0.send_modify(|state| state.append(photos));
                }
                Err(e) => {
                    log::error!("failed to fetch page {page}: {e}");
                }
            }
        }))
    }
}

/// Clears `busy` when the fetch task ends, however it ends.
struct BusyGuard(Arc<watch::Sender<FeedState>>);

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0
            .send_if_modified(|state| std::mem::replace(&mut state.busy, false));
    }
}
