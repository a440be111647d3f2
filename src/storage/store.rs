use std::sync::Arc;

use tokio::sync::RwLock;

use crate::ingest::Dataset;

/// Holds the latest uploaded dataset. Each upload replaces it wholesale.
///
/// Readers get an `Arc` snapshot, so a reader never sees a dataset that is
/// half built. Concurrent uploads are last-write-wins.
#[derive(Debug, Default)]
pub struct DatasetStore {
    current: RwLock<Option<Arc<Dataset>>>,
}

impl DatasetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Swap in `dataset`, returning whatever was held before.
    pub async fn replace(&self, dataset: Dataset) -> Option<Arc<Dataset>> {
        let next = Arc::new(dataset);
        let mut guard = self.current.write().await;
        guard.replace(next)
    }

    /// `None` until the first successful upload.
    pub async fn current(&self) -> Option<Arc<Dataset>> {
        self.current.read().await.clone()
    }

    pub async fn is_loaded(&self) -> bool {
        self.current.read().await.is_some()
    }
}
