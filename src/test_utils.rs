use crate::backend::types::{Photo, PhotoUrls, PhotoUser};
use crate::backend::{PhotoSource, Result};
use std::collections::VecDeque;
use std::future::Future;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

pub(crate) fn photos(n: usize, prefix: &str) -> Vec<Photo> {
    (0..n)
        .map(|i| Photo {
            urls: PhotoUrls {
                regular: format!("https://images.test/{prefix}-{i}"),
            },
            description: Some(format!("{prefix} photo {i}")),
            alt_description: None,
            user: Some(PhotoUser {
                name: format!("Photographer {prefix}"),
            }),
        })
        .collect()
}

/// In-memory photo source replaying scripted responses.
#[derive(Default)]
pub(crate) struct FakeSource {
    responses: Mutex<VecDeque<Result<Vec<Photo>>>>,
    requests: Mutex<Vec<(u32, u32)>>,
    gate: Option<Arc<Notify>>,
}

impl FakeSource {
    pub fn new(responses: impl IntoIterator<Item = Result<Vec<Photo>>>) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().collect()),
            ..Default::default()
        }
    }
    /// Each fetch waits for one `notify_one` on the gate before answering.
    pub fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }
    pub fn requests(&self) -> Vec<(u32, u32)> {
        self.requests.lock().expect("poisoned").clone()
    }
}

impl PhotoSource for FakeSource {
    fn photos(&self, page: u32, per_page: u32) -> impl Future<Output = Result<Vec<Photo>>> + Send {
        async move {
            self.requests
                .lock()
                .expect("poisoned")
                .push((page, per_page));
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            self.responses
                .lock()
                .expect("poisoned")
                .pop_front()
                .unwrap_or_else(|| Ok(Vec::new()))
        }
    }
}
